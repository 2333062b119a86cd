//! Currency codes and rate source abstractions

use crate::core::error::{ConvertError, SourceFailure};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// A three letter ISO 4217 style code, always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code.to_ascii_uppercase()))
        } else {
            Err(ConvertError::invalid(format!("Invalid currency code: {s}")))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> String {
        code.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rate as reported by one source.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub rate: f64,
    /// `None` when the source omitted the date or sent one we could not read.
    pub date: Option<NaiveDate>,
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short identifier used in logs and results.
    fn name(&self) -> &str;

    async fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<RateQuote, SourceFailure>;
}

#[async_trait]
pub trait CurrencyListSource: Send + Sync {
    async fn fetch_currencies(&self) -> Result<BTreeMap<String, String>>;
}

const FALLBACK_CURRENCIES: [(&str, &str); 25] = [
    ("USD", "United States Dollar"),
    ("EUR", "Euro"),
    ("JPY", "Japanese Yen"),
    ("GBP", "British Pound Sterling"),
    ("AUD", "Australian Dollar"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("SEK", "Swedish Krona"),
    ("NZD", "New Zealand Dollar"),
    ("MXN", "Mexican Peso"),
    ("SGD", "Singapore Dollar"),
    ("HKD", "Hong Kong Dollar"),
    ("NOK", "Norwegian Krone"),
    ("KRW", "South Korean Won"),
    ("TRY", "Turkish Lira"),
    ("RUB", "Russian Ruble"),
    ("INR", "Indian Rupee"),
    ("BRL", "Brazilian Real"),
    ("ZAR", "South African Rand"),
    ("IDR", "Indonesian Rupiah"),
    ("MYR", "Malaysian Ringgit"),
    ("THB", "Thai Baht"),
    ("PHP", "Philippine Peso"),
    ("VND", "Vietnamese Dong"),
];

/// Built-in list used whenever the currency list cannot be fetched.
pub fn fallback_currencies() -> BTreeMap<String, String> {
    FALLBACK_CURRENCIES
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
}

/// Fetches the currency list, substituting the built-in list on any failure.
pub async fn load_currencies(source: &dyn CurrencyListSource) -> BTreeMap<String, String> {
    match source.fetch_currencies().await {
        Ok(map) if !map.is_empty() => map,
        Ok(_) => {
            warn!("Currency list was empty, using fallback");
            fallback_currencies()
        }
        Err(e) => {
            warn!(error = %e, "Primary currency API failed, using fallback");
            fallback_currencies()
        }
    }
}
