pub mod connectivity;
pub mod exchangerate_api;
pub mod frankfurter;

use crate::core::config::SourceConfig;
use crate::core::currency::{CurrencyCode, RateQuote, RateSource};
use crate::core::error::SourceFailureKind;
use anyhow::Result;
use chrono::NaiveDate;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("cconv/", env!("CARGO_PKG_VERSION"));

pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Builds rate sources in the configured priority order.
pub fn build_sources(
    configs: &[SourceConfig],
    timeout: Duration,
) -> Result<Vec<Arc<dyn RateSource>>> {
    let client = http_client(timeout)?;
    Ok(configs
        .iter()
        .map(|config| -> Arc<dyn RateSource> {
            match config {
                SourceConfig::Frankfurter { base_url } => Arc::new(
                    frankfurter::FrankfurterProvider::with_client(base_url, client.clone()),
                ),
                SourceConfig::ExchangerateApi { base_url } => Arc::new(
                    exchangerate_api::ExchangeRateApiProvider::with_client(
                        base_url,
                        client.clone(),
                    ),
                ),
            }
        })
        .collect())
}

/// Shape shared by both rate APIs: a `rates` map keyed by target code and a `date`.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: HashMap<String, Option<f64>>,
    date: Option<String>,
}

pub(crate) async fn get_body(client: &Client, url: &str) -> Result<String, SourceFailureKind> {
    debug!("Requesting {}", url);
    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| SourceFailureKind::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(SourceFailureKind::Status(response.status().as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| SourceFailureKind::Transport(e.to_string()))
}

pub(crate) fn parse_rates_body(
    body: &str,
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Result<RateQuote, SourceFailureKind> {
    let data: RatesResponse =
        serde_json::from_str(body).map_err(|e| SourceFailureKind::Malformed(e.to_string()))?;

    let rate = data
        .rates
        .get(to.as_str())
        .copied()
        .flatten()
        .filter(|r| r.is_finite() && *r > 0.0)
        .ok_or_else(|| SourceFailureKind::MissingRate {
            from: from.to_string(),
            to: to.to_string(),
        })?;

    let date = data.date.as_deref().and_then(|d| {
        NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .inspect_err(|e| debug!("Could not parse rate date '{}': {}", d, e))
            .ok()
    });

    Ok(RateQuote { rate, date })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_rates_body() {
        let body = r#"{"amount": 1.0, "base": "USD", "date": "2024-01-01", "rates": {"IDR": 15750}}"#;
        let quote = parse_rates_body(body, &code("USD"), &code("IDR")).unwrap();
        assert_eq!(quote.rate, 15750.0);
        assert_eq!(quote.date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_missing_zero_and_null_rates() {
        for body in [
            r#"{"rates": {"EUR": 0.9}}"#,
            r#"{"rates": {"IDR": 0}}"#,
            r#"{"rates": {"IDR": null}}"#,
            r#"{"date": "2024-01-01"}"#,
        ] {
            let err = parse_rates_body(body, &code("USD"), &code("IDR")).unwrap_err();
            assert_eq!(
                err,
                SourceFailureKind::MissingRate {
                    from: "USD".into(),
                    to: "IDR".into()
                }
            );
        }
    }

    #[test]
    fn test_unreadable_date_is_dropped() {
        let body = r#"{"date": "yesterday", "rates": {"EUR": 0.9}}"#;
        let quote = parse_rates_body(body, &code("USD"), &code("EUR")).unwrap();
        assert!(quote.date.is_none());
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_rates_body("<html>", &code("USD"), &code("EUR")).unwrap_err();
        assert!(matches!(err, SourceFailureKind::Malformed(_)));
    }

    #[test]
    fn test_build_sources_keeps_order() {
        let configs = vec![
            SourceConfig::ExchangerateApi {
                base_url: "http://localhost:1".into(),
            },
            SourceConfig::Frankfurter {
                base_url: "http://localhost:2".into(),
            },
        ];
        let sources = build_sources(&configs, Duration::from_secs(1)).unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["exchangerate-api", "frankfurter"]);
    }
}
