//! The hub facade: wires extractor, resolver and responder into the
//! dashboard's request/response contracts.

use crate::core::cache::RateCache;
use crate::core::config::AppConfig;
use crate::core::currency::{CurrencyCode, HOME_CURRENCY};
use crate::core::error::{HubError, HubResult};
use crate::core::llm::LanguageModel;
use crate::core::query_log::{QueryLog, QueryLogRecord, QueryType, TracingQueryLog};
use crate::core::rate::RateProvider;
use crate::historical::{DEFAULT_HISTORY_DAYS, HistoricalSeriesGenerator};
use crate::nlp::{CurrencyIntentExtractor, FriendlyResponder, SUPPORTED_CURRENCIES};
use crate::payload::{
    CURRENCY_NOT_RECOGNIZED, CurrencyListResponse, DirectRateRequest, DirectRateResponse,
    ErrorResponse, HistoricalRequest, HistoricalResponse, NlpAnswer, NlpRequest, NlpResponse,
};
use crate::providers::{ExchangeRateApiProvider, OllamaModel};
use crate::resolver::RateResolver;
use crate::store::open_rate_store;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

fn required_code(value: Option<&str>, field: &str) -> HubResult<CurrencyCode> {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => CurrencyCode::parse(raw),
        _ => Err(HubError::Validation(format!("{field} is required"))),
    }
}

pub struct ExchangeHub {
    resolver: Arc<RateResolver>,
    history: HistoricalSeriesGenerator,
    extractor: CurrencyIntentExtractor,
    responder: FriendlyResponder,
    query_log: Arc<dyn QueryLog>,
}

/// Everything the hub needs from outside. Tests swap in fakes here.
pub struct HubParts {
    pub provider: Arc<dyn RateProvider>,
    pub model: Arc<dyn LanguageModel>,
    pub cache: Arc<RateCache>,
    pub query_log: Arc<dyn QueryLog>,
    pub extract_timeout: Duration,
    pub describe_timeout: Duration,
}

impl ExchangeHub {
    pub fn new(parts: HubParts) -> Self {
        let resolver = Arc::new(RateResolver::new(parts.provider, parts.cache));
        Self {
            history: HistoricalSeriesGenerator::new(Arc::clone(&resolver)),
            resolver,
            extractor: CurrencyIntentExtractor::new(Arc::clone(&parts.model), parts.extract_timeout),
            responder: FriendlyResponder::new(parts.model, parts.describe_timeout),
            query_log: parts.query_log,
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let exchange = &config.providers.exchange_rate;
        let provider = ExchangeRateApiProvider::new(&exchange.base_url, exchange.timeout())
            .context("Failed to create exchange rate provider")?;

        let ollama = &config.providers.ollama;
        let model = OllamaModel::new(&ollama.base_url, &ollama.model)
            .context("Failed to create Ollama client")?;

        let cache = Arc::new(RateCache::new(open_rate_store(config), config.cache.ttl()));

        Ok(Self::new(HubParts {
            provider: Arc::new(provider),
            model: Arc::new(model),
            cache,
            query_log: Arc::new(TracingQueryLog),
            extract_timeout: ollama.extract_timeout(),
            describe_timeout: ollama.describe_timeout(),
        }))
    }

    pub fn currencies(&self) -> CurrencyListResponse {
        CurrencyListResponse::all()
    }

    #[instrument(skip(self))]
    pub async fn direct_lookup(&self, request: &DirectRateRequest) -> HubResult<DirectRateResponse> {
        let mut record = QueryLogRecord::new(QueryType::Direct);
        let result = self.direct(request, &mut record).await;
        self.log(record, &result);
        result
    }

    async fn direct(
        &self,
        request: &DirectRateRequest,
        record: &mut QueryLogRecord,
    ) -> HubResult<DirectRateResponse> {
        let base = required_code(request.base_currency.as_deref(), "base_currency")?;
        record.base_currency = Some(base);
        let target = match request.target_currency.as_deref() {
            Some(raw) => CurrencyCode::parse(raw)?,
            None => HOME_CURRENCY,
        };
        record.target_currency = Some(target);

        let quote = self.resolver.quote(base, Some(target)).await?;
        record.rate = Some(quote.rate);
        Ok(quote.into())
    }

    #[instrument(skip(self))]
    pub async fn historical(&self, request: &HistoricalRequest) -> HubResult<HistoricalResponse> {
        let mut record = QueryLogRecord::new(QueryType::Historical);
        let result = self.history_series(request, &mut record).await;
        self.log(record, &result);
        result
    }

    async fn history_series(
        &self,
        request: &HistoricalRequest,
        record: &mut QueryLogRecord,
    ) -> HubResult<HistoricalResponse> {
        let base = required_code(Some(request.base_currency.as_str()), "base_currency")?;
        let target = required_code(Some(request.target_currency.as_str()), "target_currency")?;
        record.base_currency = Some(base);
        record.target_currency = Some(target);

        let days = request.days.unwrap_or(DEFAULT_HISTORY_DAYS);
        let data = self.history.generate(base, target, days).await?;
        record.rate = data.last().map(|p| p.rate);
        Ok(HistoricalResponse {
            base_currency: base,
            target_currency: target,
            data,
        })
    }

    /// Answers a free-text query against the home currency. Unrecognized
    /// currencies and resolution failures come back as an
    /// [`NlpResponse::Error`]; only an empty query is an `Err`.
    #[instrument(skip(self))]
    pub async fn natural_language(&self, request: &NlpRequest) -> HubResult<NlpResponse> {
        let mut record = QueryLogRecord::new(QueryType::Nlp);
        record.query = Some(request.query.clone());
        let result = self.answer(request, &mut record).await;
        self.log(record, &result);
        result
    }

    async fn answer(&self, request: &NlpRequest, record: &mut QueryLogRecord) -> HubResult<NlpResponse> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(HubError::Validation("query must not be empty".to_string()));
        }

        let Some(base) = self.extractor.extract(query).await else {
            record.error = Some(CURRENCY_NOT_RECOGNIZED.to_string());
            let message = self
                .responder
                .describe_unsupported(query, &SUPPORTED_CURRENCIES)
                .await;
            return Ok(NlpResponse::Error(ErrorResponse::currency_not_recognized(
                message,
                &SUPPORTED_CURRENCIES,
            )));
        };
        record.base_currency = Some(base);
        record.target_currency = Some(HOME_CURRENCY);

        let quote = match self.resolver.quote(base, Some(HOME_CURRENCY)).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(error = %e, "Rate lookup failed for NLP query");
                record.error = Some(e.to_string());
                return Ok(NlpResponse::Error(ErrorResponse::server_error(&SUPPORTED_CURRENCIES)));
            }
        };
        record.rate = Some(quote.rate);

        let friendly_response = self
            .responder
            .describe(base, HOME_CURRENCY, quote.rate)
            .await;
        Ok(NlpResponse::Answer(NlpAnswer {
            base_currency: base,
            target_currency: HOME_CURRENCY,
            target_currency_amount: quote.rate,
            friendly_response,
            timestamp: quote.timestamp,
        }))
    }

    fn log<T>(&self, mut record: QueryLogRecord, result: &HubResult<T>) {
        if let Err(e) = result {
            record.error = Some(e.to_string());
        }
        record.success = record.error.is_none();
        self.query_log.record(record);
    }
}
