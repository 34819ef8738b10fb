use crate::core::cache::{CacheError, RateCacheEntry, RateKey, RateStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory rate store using a HashMap behind a tokio Mutex
#[derive(Clone, Default)]
pub struct MemoryRateStore {
    inner: Arc<Mutex<HashMap<RateKey, RateCacheEntry>>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn get(&self, key: &RateKey) -> Result<Option<RateCacheEntry>, CacheError> {
        Ok(self.inner.lock().await.get(key).cloned())
    }

    async fn upsert(&self, entry: RateCacheEntry) -> Result<(), CacheError> {
        self.inner.lock().await.insert(entry.key(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::DEFAULT_TTL;
    use crate::core::currency::{EUR, USD, ZAR};
    use chrono::Utc;

    #[tokio::test]
    async fn test_memory_store_get_upsert() {
        let store = MemoryRateStore::new();
        let key = RateKey::new(USD, ZAR);

        // Initially, store is empty
        assert!(store.get(&key).await.unwrap().is_none());
        assert!(store.is_empty().await);

        store
            .upsert(RateCacheEntry::new(key, 18.5, Utc::now(), DEFAULT_TTL))
            .await
            .unwrap();
        assert_eq!(store.get(&key).await.unwrap().unwrap().rate, 18.5);

        // Get a non-existent key
        assert!(store.get(&RateKey::new(EUR, ZAR)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_concurrent_upserts_keep_one_entry() {
        let store = MemoryRateStore::new();
        let key = RateKey::new(USD, ZAR);

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let rate = 18.0 + f64::from(i);
                store
                    .upsert(RateCacheEntry::new(key, rate, Utc::now(), DEFAULT_TTL))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await, 1);
        let rate = store.get(&key).await.unwrap().unwrap().rate;
        assert!((18.0..34.0).contains(&rate));
        assert_eq!(rate.fract(), 0.0);
    }
}
