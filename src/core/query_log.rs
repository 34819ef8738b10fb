//! Outcome records handed to the query log after each lookup.

use crate::core::currency::CurrencyCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Direct,
    Nlp,
    Historical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryLogRecord {
    pub query_type: QueryType,
    /// Free text for NLP lookups
    pub query: Option<String>,
    pub base_currency: Option<CurrencyCode>,
    pub target_currency: Option<CurrencyCode>,
    pub rate: Option<f64>,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl QueryLogRecord {
    pub fn new(query_type: QueryType) -> Self {
        Self {
            query_type,
            query: None,
            base_currency: None,
            target_currency: None,
            rate: None,
            success: false,
            error: None,
            timestamp: Utc::now(),
        }
    }
}

/// Sink for query outcomes. Write-only: nothing in the hub reads it back,
/// and a sink cannot fail the lookup it records.
pub trait QueryLog: Send + Sync {
    fn record(&self, record: QueryLogRecord);
}

/// Emits each record as a structured tracing event. Fields that are `None`
/// are left off the event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingQueryLog;

impl QueryLog for TracingQueryLog {
    fn record(&self, record: QueryLogRecord) {
        info!(
            target: "zarhub::query_log",
            query_type = ?record.query_type,
            query = record.query.as_deref(),
            base = record.base_currency.map(|c| c.code()),
            target = record.target_currency.map(|c| c.code()),
            rate = record.rate,
            success = record.success,
            error = record.error.as_deref(),
            "Query processed"
        );
    }
}
