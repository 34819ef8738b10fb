//! Time-boxed rate cache over a pluggable key-value store.

use crate::core::currency::CurrencyCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache storage error: {0}")]
    Storage(String),
}

impl From<fjall::Error> for CacheError {
    fn from(e: fjall::Error) -> Self {
        CacheError::Storage(e.to_string())
    }
}

/// Ordered (base, target) pair. `USD/ZAR` and `ZAR/USD` are different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateKey {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
}

impl RateKey {
    pub fn new(base: CurrencyCode, target: CurrencyCode) -> Self {
        Self { base, target }
    }
}

impl Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCacheEntry {
    pub base_currency: CurrencyCode,
    pub target_currency: CurrencyCode,
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RateCacheEntry {
    pub fn new(key: RateKey, rate: f64, fetched_at: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::milliseconds(ttl.as_millis().min(i64::MAX as u128) as i64);
        Self {
            base_currency: key.base,
            target_currency: key.target,
            rate,
            fetched_at,
            expires_at: fetched_at + ttl,
        }
    }

    pub fn key(&self) -> RateKey {
        RateKey::new(self.base_currency, self.target_currency)
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Backing store for rate entries. Implementations must make `upsert` a
/// single atomic write per key; concurrent writers race and the last wins.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn get(&self, key: &RateKey) -> Result<Option<RateCacheEntry>, CacheError>;
    async fn upsert(&self, entry: RateCacheEntry) -> Result<(), CacheError>;
}

/// Freshness policy on top of a [`RateStore`]. Entries expire passively:
/// staleness is checked on read and nothing is ever purged.
pub struct RateCache {
    store: Arc<dyn RateStore>,
    ttl: Duration,
}

impl RateCache {
    pub fn new(store: Arc<dyn RateStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the entry only while it is fresh. Store failures read as a miss.
    pub async fn lookup(&self, base: CurrencyCode, target: CurrencyCode) -> Option<RateCacheEntry> {
        let key = RateKey::new(base, target);
        match self.store.get(&key).await {
            Ok(Some(entry)) if entry.is_fresh_at(Utc::now()) => {
                debug!("Cache HIT for key: {}", key);
                Some(entry)
            }
            Ok(Some(_)) => {
                debug!("Cache entry expired for key: {}", key);
                None
            }
            Ok(None) => {
                debug!("Cache MISS for key: {}", key);
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Writes `rate` for the exact ordered pair, overwriting any prior entry.
    pub async fn store(
        &self,
        base: CurrencyCode,
        target: CurrencyCode,
        rate: f64,
    ) -> Result<RateCacheEntry, CacheError> {
        let entry = RateCacheEntry::new(RateKey::new(base, target), rate, Utc::now(), self.ttl);
        self.store.upsert(entry.clone()).await?;
        debug!("Cache PUT for key: {}", entry.key());
        Ok(entry)
    }
}
