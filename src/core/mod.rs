//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod llm;
pub mod log;
pub mod query_log;
pub mod rate;

// Re-export main types for cleaner imports
pub use cache::{RateCache, RateCacheEntry, RateKey, RateStore};
pub use currency::{CurrencyCode, HOME_CURRENCY};
pub use error::{HubError, HubResult};
pub use llm::{LanguageModel, ModelError};
pub use query_log::{QueryLog, QueryLogRecord, QueryType};
pub use rate::{RateProvider, RateQuote};
