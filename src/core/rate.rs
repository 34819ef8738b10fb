//! Rate quotes and the upstream provider abstraction

use crate::core::currency::CurrencyCode;
use crate::core::error::HubResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// A resolved rate as handed to callers. Only ever persisted through the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateQuote {
    pub base_currency: CurrencyCode,
    pub target_currency: CurrencyCode,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &str;

    /// All rates quoted from `base`: one unit of `base` in each counter currency.
    async fn fetch_batch_from_base(&self, base: CurrencyCode) -> HubResult<HashMap<CurrencyCode, f64>>;

    /// One unit of `base` expressed in `target`.
    async fn fetch_pair(&self, base: CurrencyCode, target: CurrencyCode) -> HubResult<f64>;
}
