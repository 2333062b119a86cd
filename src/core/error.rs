//! Error types for conversions and rate sources.

use thiserror::Error;

/// Why a single rate source could not serve a rate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceFailureKind {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("failed to parse response: {0}")]
    Malformed(String),
    #[error("exchange rate not available for {from} to {to}")]
    MissingRate { from: String, to: String },
}

impl SourceFailureKind {
    /// Transport failures mean the request never got an answer.
    pub fn is_network(&self) -> bool {
        matches!(self, SourceFailureKind::Transport(_))
    }
}

/// A failure of one rate source. Always recovered by trying the next source.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{source_name}: {kind}")]
pub struct SourceFailure {
    pub source_name: String,
    pub kind: SourceFailureKind,
}

impl SourceFailure {
    pub fn new(source_name: impl Into<String>, kind: SourceFailureKind) -> Self {
        Self {
            source_name: source_name.into(),
            kind,
        }
    }
}

/// Coarse grouping used to pick the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Network,
    Unavailable,
    Other,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConvertError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("You appear to be offline. Please check your internet connection.")]
    Offline,
    #[error(
        "All currency APIs are unavailable. Please check your internet connection and try again."
    )]
    RateUnavailable { failures: Vec<SourceFailure> },
}

impl ConvertError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConvertError::InvalidInput(msg.into())
    }

    pub fn category(&self) -> FailureCategory {
        match self {
            ConvertError::Offline => FailureCategory::Network,
            ConvertError::RateUnavailable { failures } if failures.is_empty() => {
                FailureCategory::Other
            }
            ConvertError::RateUnavailable { failures } => {
                if failures.iter().all(|f| f.kind.is_network()) {
                    FailureCategory::Network
                } else {
                    FailureCategory::Unavailable
                }
            }
            ConvertError::InvalidInput(_) => FailureCategory::Other,
        }
    }

    /// Human readable message for the terminal.
    pub fn user_message(&self) -> String {
        match self {
            ConvertError::InvalidInput(msg) => msg.clone(),
            ConvertError::Offline => self.to_string(),
            ConvertError::RateUnavailable { .. } => match self.category() {
                FailureCategory::Network => {
                    "Conversion failed. Please check your internet connection and try again."
                        .to_string()
                }
                FailureCategory::Unavailable => {
                    "Conversion failed. Currency exchange services are temporarily unavailable."
                        .to_string()
                }
                FailureCategory::Other => format!("Conversion failed. {self}"),
            },
        }
    }
}
