use crate::core::currency::CurrencyCode;
use crate::core::error::{HubError, HubResult};
use crate::core::rate::RateProvider;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Quotes from the exchangerate-api v4 `latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> HubResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent("zarhub/1.0")
            .timeout(timeout)
            .build()
            .map_err(|e| HubError::ProviderUnavailable(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_latest(&self, base: CurrencyCode) -> HubResult<HashMap<String, f64>> {
        let url = format!("{}/latest/{}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            HubError::ProviderUnavailable(format!("Request error: {e} for base currency: {base}"))
        })?;

        if !response.status().is_success() {
            return Err(HubError::ProviderUnavailable(format!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            )));
        }

        let text = response.text().await.map_err(|e| {
            HubError::ProviderUnavailable(format!("Failed to read response for {base}: {e}"))
        })?;

        let data: LatestRatesResponse = serde_json::from_str(&text).map_err(|e| {
            HubError::ProviderUnavailable(format!("Failed to parse JSON response for {base}: {e}"))
        })?;

        Ok(data.rates)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        "exchangerate-api"
    }

    #[instrument(name = "BatchRateFetch", skip(self), fields(base = %base))]
    async fn fetch_batch_from_base(&self, base: CurrencyCode) -> HubResult<HashMap<CurrencyCode, f64>> {
        let rates = self.fetch_latest(base).await?;
        // Codes outside the registry are dropped
        let batch: HashMap<_, _> = rates
            .into_iter()
            .filter_map(|(code, rate)| CurrencyCode::parse(&code).ok().map(|c| (c, rate)))
            .collect();
        debug!("Received {} registry rates from {}", batch.len(), base);
        Ok(batch)
    }

    #[instrument(name = "PairRateFetch", skip(self), fields(base = %base, target = %target))]
    async fn fetch_pair(&self, base: CurrencyCode, target: CurrencyCode) -> HubResult<f64> {
        let rates = self.fetch_latest(base).await?;
        rates
            .get(target.code())
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or(HubError::RateNotFound { base, target })
    }
}
