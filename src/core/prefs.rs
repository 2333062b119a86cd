//! Persisted user state: preferences, history, usage stats and theme.

use crate::core::conversion::{ConversionRequest, ConversionResult};
use crate::core::currency::CurrencyCode;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// Number of history entries kept in the store.
pub const HISTORY_LIMIT: usize = 10;

/// Last used currency pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub from: Option<CurrencyCode>,
    pub to: Option<CurrencyCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub result: f64,
    pub rate: f64,
}

impl HistoryEntry {
    pub fn new(request: &ConversionRequest, result: &ConversionResult) -> Self {
        Self {
            // Stored as epoch milliseconds.
            timestamp: Utc::now().trunc_subsecs(3),
            amount: request.amount,
            from: request.from.clone(),
            to: request.to.clone(),
            result: result.converted_amount,
            rate: result.rate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub currencies: BTreeMap<String, u64>,
}

impl UsageStats {
    pub fn record(&mut self, from: &CurrencyCode) {
        self.conversions += 1;
        *self.currencies.entry(from.to_string()).or_insert(0) += 1;
    }

    pub fn count_for(&self, code: &str) -> u64 {
        self.currencies.get(code).copied().unwrap_or(0)
    }

    /// Most used source currency. Ties go to the alphabetically first code.
    pub fn most_used(&self) -> Option<&str> {
        self.currencies
            .iter()
            .fold(None, |best: Option<(&String, u64)>, (code, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((code, count)),
            })
            .map(|(code, _)| code.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow::anyhow!("Invalid theme: {}", s)),
        }
    }
}
