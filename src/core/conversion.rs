//! Conversion requests and the fallback rate provider.

use crate::core::currency::{CurrencyCode, RateSource};
use crate::core::error::ConvertError;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl ConversionRequest {
    pub fn new(amount: f64, from: CurrencyCode, to: CurrencyCode) -> Result<Self, ConvertError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ConvertError::invalid("Enter a valid amount (0 or more)."));
        }
        Ok(Self { amount, from, to })
    }

    /// Builds a request from raw user input. An empty amount means zero.
    pub fn parse(
        amount: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Self, ConvertError> {
        let amount = parse_amount(amount)?;
        let (from, to) = match (from, to) {
            (Some(f), Some(t)) if !f.trim().is_empty() && !t.trim().is_empty() => (f, t),
            _ => return Err(ConvertError::invalid("Please select both currencies.")),
        };
        Self::new(amount, from.parse()?, to.parse()?)
    }

    pub fn swapped(&self) -> Self {
        Self {
            amount: self.amount,
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

fn parse_amount(input: &str) -> Result<f64, ConvertError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| ConvertError::invalid("Enter a valid amount (0 or more)."))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub converted_amount: f64,
    pub rate: f64,
    pub as_of: NaiveDate,
    /// Source that served the rate; `None` for same-currency conversions.
    pub source: Option<String>,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Tries each rate source in order until one yields a usable rate.
#[derive(Clone)]
pub struct RateProvider {
    sources: Vec<Arc<dyn RateSource>>,
}

impl RateProvider {
    pub fn new(sources: Vec<Arc<dyn RateSource>>) -> Self {
        Self { sources }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    #[instrument(
        name = "RateLookup",
        skip(self, request),
        fields(from = %request.from, to = %request.to)
    )]
    pub async fn get_rate(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConvertError> {
        if request.is_identity() {
            return Ok(ConversionResult {
                converted_amount: request.amount,
                rate: 1.0,
                as_of: today(),
                source: None,
            });
        }

        let mut failures = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            debug!("Trying rate source {}", source.name());
            match source.fetch_rate(&request.from, &request.to).await {
                Ok(quote) => {
                    debug!(rate = quote.rate, "Rate source {} succeeded", source.name());
                    return Ok(ConversionResult {
                        converted_amount: request.amount * quote.rate,
                        rate: quote.rate,
                        as_of: quote.date.unwrap_or_else(today),
                        source: Some(source.name().to_string()),
                    });
                }
                Err(failure) => {
                    warn!(error = %failure, "Rate source failed, trying next");
                    failures.push(failure);
                }
            }
        }

        Err(ConvertError::RateUnavailable { failures })
    }
}
