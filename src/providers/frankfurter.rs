use super::{get_body, http_client, parse_rates_body};
use crate::core::currency::{CurrencyCode, CurrencyListSource, RateQuote, RateSource};
use crate::core::error::{SourceFailure, SourceFailureKind};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

pub const NAME: &str = "frankfurter";

/// Primary rate source and currency list, served by the Frankfurter API.
pub struct FrankfurterProvider {
    base_url: String,
    client: Client,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(base_url, http_client(timeout)?))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl RateSource for FrankfurterProvider {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(
        name = "FrankfurterRate",
        skip(self, from, to),
        fields(from = %from, to = %to)
    )]
    async fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<RateQuote, SourceFailure> {
        let url = format!("{}/latest?from={}&to={}", self.base_url, from, to);
        let quote = async {
            let body = get_body(&self.client, &url).await?;
            parse_rates_body(&body, from, to)
        }
        .await
        .map_err(|kind: SourceFailureKind| SourceFailure::new(NAME, kind))?;
        debug!(rate = quote.rate, "Received Frankfurter rate");
        Ok(quote)
    }
}

#[async_trait]
impl CurrencyListSource for FrankfurterProvider {
    async fn fetch_currencies(&self) -> Result<BTreeMap<String, String>> {
        let url = format!("{}/currencies", self.base_url);
        let body = get_body(&self.client, &url)
            .await
            .map_err(|kind| anyhow!("Currency list request failed: {kind}"))?;
        serde_json::from_str(&body).context("Failed to parse currency list")
    }
}
