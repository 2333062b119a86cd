use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Linear retry: a fixed number of total attempts with a fixed pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total runs, including the first one.
    pub max_attempts: u32,
    /// Milliseconds to wait after a failed attempt.
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Runs `operation` until it succeeds or the attempts are used up.
    ///
    /// `on_retry(attempt, max_attempts)` is called before each pause, with the
    /// number of attempts made so far. The last error is returned unchanged.
    pub async fn run<F, Fut, T, E>(
        &self,
        mut operation: F,
        mut on_retry: impl FnMut(u32, u32),
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(val) => return Ok(val),
                Err(err) => {
                    if attempt >= max_attempts {
                        return Err(err);
                    }
                    debug!(
                        "Attempt {}/{} failed: {}. Retrying...",
                        attempt, max_attempts, err
                    );
                    on_retry(attempt, max_attempts);
                    attempt += 1;
                    tokio::time::sleep(self.delay()).await;
                }
            }
        }
    }
}
