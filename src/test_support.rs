//! Fakes shared by unit tests.

use crate::core::cache::{CacheError, RateCacheEntry, RateKey, RateStore};
use crate::core::currency::{CurrencyCode, HOME_CURRENCY};
use crate::core::error::{HubError, HubResult};
use crate::core::llm::{LanguageModel, ModelError, Sampling};
use crate::core::query_log::{QueryLog, QueryLogRecord};
use crate::core::rate::RateProvider;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Provider with canned answers. Without a batch, or while `batch_down` is
/// set, batch calls fail; pairs not registered are reported missing.
#[derive(Default)]
pub struct FakeProvider {
    batch: Option<HashMap<CurrencyCode, f64>>,
    pairs: HashMap<(CurrencyCode, CurrencyCode), f64>,
    pub batch_down: AtomicBool,
    pub batch_calls: AtomicUsize,
    pub pair_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(mut self, rates: &[(CurrencyCode, f64)]) -> Self {
        self.batch = Some(rates.iter().copied().collect());
        self
    }

    pub fn with_pair(mut self, base: CurrencyCode, target: CurrencyCode, rate: f64) -> Self {
        self.pairs.insert((base, target), rate);
        self
    }
}

#[async_trait]
impl RateProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_batch_from_base(&self, base: CurrencyCode) -> HubResult<HashMap<CurrencyCode, f64>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.batch_down.load(Ordering::SeqCst) {
            return Err(HubError::ProviderUnavailable("batch endpoint down".to_string()));
        }
        match &self.batch {
            Some(rates) if base == HOME_CURRENCY => Ok(rates.clone()),
            _ => Err(HubError::ProviderUnavailable("batch endpoint down".to_string())),
        }
    }

    async fn fetch_pair(&self, base: CurrencyCode, target: CurrencyCode) -> HubResult<f64> {
        self.pair_calls.fetch_add(1, Ordering::SeqCst);
        self.pairs
            .get(&(base, target))
            .copied()
            .ok_or(HubError::RateNotFound { base, target })
    }
}

pub enum FakeReply {
    Text(String),
    Fail,
    Slow(Duration),
}

/// Model returning one canned reply, recording prompts it was given.
pub struct FakeModel {
    reply: FakeReply,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(FakeReply::Text(text.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn generate(&self, prompt: &str, _sampling: Option<Sampling>) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Fail => Err(ModelError::Transport("connection refused".to_string())),
            FakeReply::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("finally awake".to_string())
            }
        }
    }
}

/// Store whose writes always fail and which never has anything.
pub struct FailingStore;

#[async_trait]
impl RateStore for FailingStore {
    async fn get(&self, _key: &RateKey) -> Result<Option<RateCacheEntry>, CacheError> {
        Ok(None)
    }

    async fn upsert(&self, _entry: RateCacheEntry) -> Result<(), CacheError> {
        Err(CacheError::Storage("disk full".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingQueryLog {
    pub records: Mutex<Vec<QueryLogRecord>>,
}

impl QueryLog for RecordingQueryLog {
    fn record(&self, record: QueryLogRecord) {
        self.records.lock().unwrap().push(record);
    }
}
