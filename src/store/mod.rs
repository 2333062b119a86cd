//! Local preference store.
//!
//! Reads never fail: absent or unreadable records come back as their default
//! value. Writes are best-effort and storage errors are only logged.

pub mod disk;
pub mod memory;

use crate::core::currency::CurrencyCode;
use crate::core::prefs::{HISTORY_LIMIT, HistoryEntry, Preferences, Theme, UsageStats};
use anyhow::Result;
use async_trait::async_trait;
use disk::DiskCollection;
use memory::MemoryCollection;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub const PREFS_KEY: &str = "cc_prefs_v2";
pub const HISTORY_KEY: &str = "cc_history_v2";
pub const STATS_KEY: &str = "cc_stats_v2";
pub const THEME_KEY: &str = "theme";

const PARTITION: &str = "cconv";

/// Raw byte storage behind the preference store.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct PreferenceStore {
    collection: Arc<dyn KeyValueCollection>,
}

impl PreferenceStore {
    pub fn new(collection: Arc<dyn KeyValueCollection>) -> Self {
        Self { collection }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCollection::new()))
    }

    /// Opens the on-disk store, falling back to memory when it cannot be opened.
    pub fn open(data_path: &Path) -> Self {
        match DiskCollection::open(&data_path.join("store"), PARTITION) {
            Ok(collection) => Self::new(Arc::new(collection)),
            Err(e) => {
                warn!(error = %e, "Local store unavailable, changes will not be saved");
                Self::in_memory()
            }
        }
    }

    async fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let res: Result<Option<T>> = async {
            match self.collection.get(key).await? {
                Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
                None => Ok(None),
            }
        }
        .await;

        match res {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                debug!("Store read error for key {}: {}", key, e);
                T::default()
            }
        }
    }

    async fn write_best_effort<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let res: Result<()> = async {
            let bytes = serde_json::to_vec(value)?;
            self.collection.put(key, bytes).await
        }
        .await;
        if let Err(e) = res {
            debug!("Store write error for key {}: {}", key, e);
        }
    }

    pub async fn load_prefs(&self) -> Preferences {
        self.read_or_default(PREFS_KEY).await
    }

    pub async fn save_prefs(&self, prefs: &Preferences) {
        self.write_best_effort(PREFS_KEY, prefs).await
    }

    /// Conversion history, most recent first.
    pub async fn load_history(&self) -> Vec<HistoryEntry> {
        self.read_or_default(HISTORY_KEY).await
    }

    /// Persists at most the first `HISTORY_LIMIT` entries.
    pub async fn save_history(&self, history: &[HistoryEntry]) {
        let kept = &history[..history.len().min(HISTORY_LIMIT)];
        self.write_best_effort(HISTORY_KEY, kept).await
    }

    pub async fn push_history(&self, entry: HistoryEntry) -> Vec<HistoryEntry> {
        let mut history = self.load_history().await;
        history.insert(0, entry);
        history.truncate(HISTORY_LIMIT);
        self.save_history(&history).await;
        history
    }

    pub async fn clear_history(&self) {
        self.save_history(&[]).await
    }

    pub async fn load_stats(&self) -> UsageStats {
        self.read_or_default(STATS_KEY).await
    }

    pub async fn record_conversion(&self, from: &CurrencyCode) -> UsageStats {
        let mut stats = self.load_stats().await;
        stats.record(from);
        self.write_best_effort(STATS_KEY, &stats).await;
        stats
    }

    pub async fn reset_stats(&self) {
        if let Err(e) = self.collection.remove(STATS_KEY).await {
            debug!("Store remove error for key {}: {}", STATS_KEY, e);
        }
    }

    pub async fn load_theme(&self) -> Theme {
        self.read_or_default(THEME_KEY).await
    }

    pub async fn save_theme(&self, theme: Theme) {
        self.write_best_effort(THEME_KEY, &theme).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    /// Collection whose writes always fail, like a full browser quota.
    pub(crate) struct FullCollection;

    #[async_trait]
    impl KeyValueCollection for FullCollection {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn put(&self, _key: &str, _value: Vec<u8>) -> Result<()> {
            Err(anyhow!("quota exceeded"))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(anyhow!("quota exceeded"))
        }
    }

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    fn entry(n: i64) -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc::now() + Duration::seconds(n),
            amount: n as f64,
            from: code("USD"),
            to: code("IDR"),
            result: n as f64 * 15750.0,
            rate: 15750.0,
        }
    }

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let store = PreferenceStore::in_memory();
        assert_eq!(store.load_prefs().await, Preferences::default());
        assert!(store.load_history().await.is_empty());
        assert_eq!(store.load_stats().await, UsageStats::default());
        assert_eq!(store.load_theme().await, Theme::Dark);
    }

    #[tokio::test]
    async fn test_prefs_are_overwritten() {
        let store = PreferenceStore::in_memory();
        store
            .save_prefs(&Preferences {
                from: Some(code("USD")),
                to: Some(code("IDR")),
            })
            .await;
        store
            .save_prefs(&Preferences {
                from: Some(code("EUR")),
                to: Some(code("JPY")),
            })
            .await;

        let prefs = store.load_prefs().await;
        assert_eq!(prefs.from, Some(code("EUR")));
        assert_eq!(prefs.to, Some(code("JPY")));
    }

    #[tokio::test]
    async fn test_history_keeps_ten_newest_first() {
        let store = PreferenceStore::in_memory();
        for n in 1..=11 {
            store.push_history(entry(n)).await;
        }

        let history = store.load_history().await;
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].amount, 11.0);
        assert_eq!(history[9].amount, 2.0);
        assert!(history.iter().all(|e| e.amount != 1.0));
    }

    #[tokio::test]
    async fn test_save_history_truncates() {
        let store = PreferenceStore::in_memory();
        let many: Vec<_> = (0..15).map(entry).collect();
        store.save_history(&many).await;

        let history = store.load_history().await;
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].amount, 0.0);
    }

    #[tokio::test]
    async fn test_clear_history() {
        let store = PreferenceStore::in_memory();
        store.push_history(entry(1)).await;
        store.clear_history().await;
        assert!(store.load_history().await.is_empty());
    }

    #[tokio::test]
    async fn test_stats_count_conversions() {
        let store = PreferenceStore::in_memory();
        for _ in 0..5 {
            store.record_conversion(&code("USD")).await;
        }

        let stats = store.load_stats().await;
        assert_eq!(stats.conversions, 5);
        assert_eq!(stats.count_for("USD"), 5);

        store.reset_stats().await;
        assert_eq!(store.load_stats().await, UsageStats::default());
    }

    #[tokio::test]
    async fn test_corrupted_records_read_as_default() {
        let collection = Arc::new(MemoryCollection::new());
        collection
            .put(HISTORY_KEY, b"not json".to_vec())
            .await
            .unwrap();
        collection
            .put(STATS_KEY, br#"{"conversions": "many"}"#.to_vec())
            .await
            .unwrap();
        collection
            .put(PREFS_KEY, br#"{"from": "DOLLARS"}"#.to_vec())
            .await
            .unwrap();
        let store = PreferenceStore::new(collection);

        assert!(store.load_history().await.is_empty());
        assert_eq!(store.load_stats().await, UsageStats::default());
        assert_eq!(store.load_prefs().await, Preferences::default());
    }

    #[tokio::test]
    async fn test_write_failures_are_swallowed() {
        let store = PreferenceStore::new(Arc::new(FullCollection));

        store.save_prefs(&Preferences::default()).await;
        let history = store.push_history(entry(1)).await;
        let stats = store.record_conversion(&code("EUR")).await;
        store.reset_stats().await;

        // Callers still get the computed values back.
        assert_eq!(history.len(), 1);
        assert_eq!(stats.conversions, 1);
        assert!(store.load_history().await.is_empty());
    }

    #[tokio::test]
    async fn test_theme_persists_on_disk() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::open(dir.path());

        store.save_theme(Theme::Light).await;
        assert_eq!(store.load_theme().await, Theme::Light);
    }
}
