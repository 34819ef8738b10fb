use crate::core::cache::{CacheError, RateCacheEntry, RateKey, RateStore};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use std::path::Path;
use tracing::debug;

const RATES_PARTITION: &str = "rates";

/// Rate store persisted in a fjall partition. Entries are stored as JSON
/// under the `BASE/TARGET` key.
pub struct DiskRateStore {
    _keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskRateStore {
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        std::fs::create_dir_all(path).map_err(|e| CacheError::Storage(e.to_string()))?;
        let keyspace = Config::new(path).open()?;
        let partition = keyspace.open_partition(RATES_PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened rate store at {}", path.display());
        Ok(Self {
            _keyspace: keyspace,
            partition,
        })
    }
}

#[async_trait]
impl RateStore for DiskRateStore {
    async fn get(&self, key: &RateKey) -> Result<Option<RateCacheEntry>, CacheError> {
        match self.partition.get(key.to_string())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, entry: RateCacheEntry) -> Result<(), CacheError> {
        let value = serde_json::to_vec(&entry)?;
        self.partition.insert(entry.key().to_string().into_bytes(), value)?;
        Ok(())
    }
}
