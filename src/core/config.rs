use crate::core::retry::RetryPolicy;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const FRANKFURTER_URL: &str = "https://api.frankfurter.app";
pub const EXCHANGERATE_API_URL: &str = "https://api.exchangerate-api.com/v4";

/// One entry in the ordered list of rate sources.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Frankfurter { base_url: String },
    ExchangerateApi { base_url: String },
}

impl SourceConfig {
    pub fn base_url(&self) -> &str {
        match self {
            SourceConfig::Frankfurter { base_url } | SourceConfig::ExchangerateApi { base_url } => {
                base_url
            }
        }
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::Frankfurter {
            base_url: FRANKFURTER_URL.to_string(),
        },
        SourceConfig::ExchangerateApi {
            base_url: EXCHANGERATE_API_URL.to_string(),
        },
    ]
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_from() -> String {
    "USD".to_string()
}

fn default_to() -> String {
    "IDR".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    /// Where to fetch the currency list. Defaults to the first Frankfurter source.
    #[serde(default)]
    pub currency_list_url: Option<String>,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub check_connectivity: bool,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default = "default_from")]
    pub default_from: String,
    #[serde(default = "default_to")]
    pub default_to: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            currency_list_url: None,
            retry: RetryPolicy::default(),
            request_timeout_secs: default_timeout_secs(),
            check_connectivity: true,
            locale: None,
            data_path: None,
            default_from: default_from(),
            default_to: default_to(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "cconv", "cconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "cconv", "cconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn currency_list_url(&self) -> &str {
        self.currency_list_url.as_deref().unwrap_or_else(|| {
            self.sources
                .iter()
                .find(|s| matches!(s, SourceConfig::Frankfurter { .. }))
                .map_or(FRANKFURTER_URL, |s| s.base_url())
        })
    }
}
