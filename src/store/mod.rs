pub mod disk;
pub mod memory;

use crate::core::cache::RateStore;
use crate::core::config::AppConfig;
use disk::DiskRateStore;
use memory::MemoryRateStore;
use std::sync::Arc;
use tracing::warn;

/// Picks the rate store configured by `cache.persist`. A persistent store
/// that cannot be opened falls back to memory, since the cache is never
/// allowed to fail a lookup.
pub fn open_rate_store(config: &AppConfig) -> Arc<dyn RateStore> {
    if !config.cache.persist {
        return Arc::new(MemoryRateStore::new());
    }

    let opened = config
        .default_data_path()
        .map_err(|e| e.to_string())
        .and_then(|path| DiskRateStore::open(&path.join("cache")).map_err(|e| e.to_string()));

    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Failed to open persistent rate store, using memory");
            Arc::new(MemoryRateStore::new())
        }
    }
}
