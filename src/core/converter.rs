//! Runs a conversion end to end and records successful ones.

use crate::core::conversion::{ConversionRequest, ConversionResult, RateProvider};
use crate::core::error::ConvertError;
use crate::core::prefs::{HistoryEntry, Preferences, UsageStats};
use crate::core::retry::RetryPolicy;
use crate::providers::connectivity::ConnectivityCheck;
use crate::store::PreferenceStore;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ConversionOutcome {
    pub result: ConversionResult,
    pub history: Vec<HistoryEntry>,
    pub stats: UsageStats,
}

pub struct ConversionService {
    provider: RateProvider,
    retry: RetryPolicy,
    connectivity: Arc<dyn ConnectivityCheck>,
    store: PreferenceStore,
}

impl ConversionService {
    pub fn new(
        provider: RateProvider,
        retry: RetryPolicy,
        connectivity: Arc<dyn ConnectivityCheck>,
        store: PreferenceStore,
    ) -> Self {
        Self {
            provider,
            retry,
            connectivity,
            store,
        }
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    /// Fetches a result with retries but writes nothing to the store.
    pub async fn quote(
        &self,
        request: &ConversionRequest,
        on_retry: impl FnMut(u32, u32),
    ) -> Result<ConversionResult, ConvertError> {
        if !request.is_identity() && !self.connectivity.is_online().await {
            return Err(ConvertError::Offline);
        }

        debug!(
            "Converting {} {} to {}",
            request.amount, request.from, request.to
        );
        self.retry
            .run(|| self.provider.get_rate(request), on_retry)
            .await
    }

    /// Converts and, on success, updates preferences, history and stats.
    pub async fn convert(
        &self,
        request: &ConversionRequest,
        on_retry: impl FnMut(u32, u32),
    ) -> Result<ConversionOutcome, ConvertError> {
        let result = self.quote(request, on_retry).await?;
        info!(
            rate = result.rate,
            source = ?result.source,
            "Conversion successful"
        );

        self.store
            .save_prefs(&Preferences {
                from: Some(request.from.clone()),
                to: Some(request.to.clone()),
            })
            .await;
        let history = self
            .store
            .push_history(HistoryEntry::new(request, &result))
            .await;
        let stats = self.store.record_conversion(&request.from).await;

        Ok(ConversionOutcome {
            result,
            history,
            stats,
        })
    }
}
