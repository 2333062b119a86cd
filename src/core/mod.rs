//! Core conversion logic and abstractions

pub mod config;
pub mod conversion;
pub mod converter;
pub mod currency;
pub mod error;
pub mod format;
pub mod log;
pub mod prefs;
pub mod retry;

// Re-export main types for cleaner imports
pub use conversion::{ConversionRequest, ConversionResult, RateProvider};
pub use converter::{ConversionOutcome, ConversionService};
pub use currency::{CurrencyCode, CurrencyListSource, RateQuote, RateSource};
pub use error::{ConvertError, SourceFailure, SourceFailureKind};
