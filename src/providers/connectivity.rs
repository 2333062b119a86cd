use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

#[async_trait]
pub trait ConnectivityCheck: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Reports online when a TCP connection to any target succeeds.
pub struct TcpProbe {
    targets: Vec<String>,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(targets: Vec<String>, timeout: Duration) -> Self {
        Self { targets, timeout }
    }

    /// Probes the host behind each URL that can be parsed.
    pub fn for_urls<'a>(urls: impl IntoIterator<Item = &'a str>, timeout: Duration) -> Self {
        let targets = urls
            .into_iter()
            .filter_map(|raw| {
                let url = Url::parse(raw).ok()?;
                let host = url.host_str()?.to_string();
                let port = url.port_or_known_default()?;
                Some(format!("{host}:{port}"))
            })
            .collect();
        Self::new(targets, timeout)
    }
}

#[async_trait]
impl ConnectivityCheck for TcpProbe {
    async fn is_online(&self) -> bool {
        if self.targets.is_empty() {
            return true;
        }
        for target in &self.targets {
            match timeout(self.timeout, TcpStream::connect(target.as_str())).await {
                Ok(Ok(_)) => return true,
                Ok(Err(e)) => debug!("Connectivity probe to {} failed: {}", target, e),
                Err(_) => debug!("Connectivity probe to {} timed out", target),
            }
        }
        false
    }
}

/// Skips the probe entirely.
pub struct AssumeOnline;

#[async_trait]
impl ConnectivityCheck for AssumeOnline {
    async fn is_online(&self) -> bool {
        true
    }
}
