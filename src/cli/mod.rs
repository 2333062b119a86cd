pub mod convert;
pub mod currencies;
pub mod favorites;
pub mod history;
pub mod setup;
pub mod stats;
pub mod theme;
pub mod ui;

use crate::core::config::AppConfig;
use crate::core::format::Locale;
use crate::core::prefs::Theme;
use crate::core::{ConversionService, RateProvider};
use crate::providers::connectivity::{AssumeOnline, ConnectivityCheck, TcpProbe};
use crate::providers::{self, frankfurter::FrankfurterProvider};
use crate::store::PreferenceStore;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Everything a command needs, built once from the configuration.
pub struct AppContext {
    pub config: AppConfig,
    pub service: ConversionService,
    pub currency_list: FrankfurterProvider,
    pub locale: Locale,
    pub theme: Theme,
}

impl AppContext {
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let sources = providers::build_sources(&config.sources, timeout)?;
        let provider = RateProvider::new(sources);
        debug!(sources = ?provider.source_names(), "Configured rate sources");

        let connectivity: Arc<dyn ConnectivityCheck> = if config.check_connectivity {
            Arc::new(TcpProbe::for_urls(
                config.sources.first().map(|s| s.base_url()),
                PROBE_TIMEOUT,
            ))
        } else {
            Arc::new(AssumeOnline)
        };

        let store = PreferenceStore::open(&config.default_data_path()?);
        let theme = store.load_theme().await;
        let locale = config
            .locale
            .as_deref()
            .map(Locale::parse)
            .unwrap_or_else(Locale::detect);
        let currency_list = FrankfurterProvider::new(config.currency_list_url(), timeout)?;

        Ok(Self {
            service: ConversionService::new(provider, config.retry, connectivity, store),
            currency_list,
            locale,
            theme,
            config,
        })
    }

    pub fn store(&self) -> &PreferenceStore {
        self.service.store()
    }

    pub fn style(&self, text: &str, style_type: ui::StyleType) -> String {
        ui::style_text(text, style_type, self.theme)
    }
}
