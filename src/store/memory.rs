use super::KeyValueCollection;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory collection, used when the disk store is unavailable and in tests.
#[derive(Default)]
pub struct MemoryCollection {
    inner: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueCollection for MemoryCollection {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let map = self.inner.lock().await;
        Ok(map.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut map = self.inner.lock().await;
        debug!("Store PUT for key: {}", key);
        map.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.inner.lock().await;
        map.remove(key);
        debug!("Store REMOVE for key: {}", key);
        Ok(())
    }
}
