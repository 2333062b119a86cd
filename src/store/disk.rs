use super::KeyValueCollection;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

/// A collection backed by a fjall partition on disk.
pub struct DiskCollection {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn open(path: &Path, name: &str) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
        debug!("Opened disk store {} at {}", name, path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl KeyValueCollection for DiskCollection {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.partition.get(key)?.map(|value| value.to_vec()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.partition.insert(key, value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for key: {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.partition.remove(key)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store REMOVE for key: {}", key);
        Ok(())
    }
}
