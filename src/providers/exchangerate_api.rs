use super::{get_body, http_client, parse_rates_body};
use crate::core::currency::{CurrencyCode, RateQuote, RateSource};
use crate::core::error::{SourceFailure, SourceFailureKind};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const NAME: &str = "exchangerate-api";

/// Secondary rate source. Returns every rate for the base currency in one document.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: Client,
}

impl ExchangeRateApiProvider {
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
impl RateSource for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<RateQuote, SourceFailure> {
        let url = format!("{}/latest/{}", self.base_url, from);
        async {
            let body = get_body(&self.client, &url).await?;
            parse_rates_body(&body, from, to)
        }
        .await
        .map_err(|kind: SourceFailureKind| SourceFailure::new(NAME, kind))
    }
}
