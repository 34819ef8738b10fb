//! Rate resolution: cache first, then an ordered list of fetch strategies.

use crate::core::cache::{RateCache, RateKey};
use crate::core::currency::{CurrencyCode, HOME_CURRENCY};
use crate::core::error::{HubError, HubResult, StrategyFailure};
use crate::core::rate::{RateProvider, RateQuote};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Ways of getting a rate from the provider, tried in [`STRATEGY_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// The home currency's batch of quotes, inverted. The batch is fetched
    /// once and shared by every base while it is fresh; if a refresh fails
    /// the last batch is served with a [`Warning::StaleHomeBatch`].
    /// Applies only when the target is the home currency. Fails when there
    /// is no batch at all, the base is missing from it, or the quoted value
    /// is not positive.
    HomeBatch,
    /// A single `base -> target` call. Always applies. Fails when the
    /// provider errors or the target is missing from the payload.
    DirectPair,
}

pub const STRATEGY_ORDER: [FetchStrategy; 2] = [FetchStrategy::HomeBatch, FetchStrategy::DirectPair];

impl FetchStrategy {
    pub fn applies_to(&self, target: CurrencyCode) -> bool {
        match self {
            FetchStrategy::HomeBatch => target == HOME_CURRENCY,
            FetchStrategy::DirectPair => true,
        }
    }
}

impl Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchStrategy::HomeBatch => "home batch",
            FetchStrategy::DirectPair => "direct pair",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Cache,
    Fetched(FetchStrategy),
}

/// Something went wrong that must not affect the result.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    CacheWriteFailed {
        key: RateKey,
        reason: String,
    },
    /// The rate came from an expired home batch because refreshing it failed.
    StaleHomeBatch {
        fetched_at: DateTime<Utc>,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub quote: RateQuote,
    pub source: RateSource,
    pub warnings: Vec<Warning>,
}

/// Last batch of `home -> X` quotes.
struct HomeBatch {
    rates: Arc<HashMap<CurrencyCode, f64>>,
    fetched_at: DateTime<Utc>,
}

impl HomeBatch {
    fn is_fresh(&self, ttl: Duration) -> bool {
        // A fetch time in the future (clock step) counts as fresh
        (Utc::now() - self.fetched_at)
            .to_std()
            .map_or(true, |age| age < ttl)
    }
}

pub struct RateResolver {
    provider: Arc<dyn RateProvider>,
    cache: Arc<RateCache>,
    home_batch: Mutex<Option<HomeBatch>>,
}

impl RateResolver {
    pub fn new(provider: Arc<dyn RateProvider>, cache: Arc<RateCache>) -> Self {
        Self {
            provider,
            cache,
            home_batch: Mutex::new(None),
        }
    }

    /// Resolves `base -> target`, reporting where the rate came from and any
    /// non-fatal warnings. A fresh cache entry short-circuits all network
    /// calls. There is no retry beyond the strategy list.
    #[instrument(
        skip(self),
        fields(base = %base, target = %target, provider = self.provider.name())
    )]
    pub async fn resolve(&self, base: CurrencyCode, target: CurrencyCode) -> HubResult<Resolution> {
        if let Some(entry) = self.cache.lookup(base, target).await {
            return Ok(Resolution {
                quote: RateQuote {
                    base_currency: base,
                    target_currency: target,
                    rate: entry.rate,
                    timestamp: Utc::now(),
                },
                source: RateSource::Cache,
                warnings: Vec::new(),
            });
        }

        let mut failures = Vec::new();
        for strategy in STRATEGY_ORDER {
            if !strategy.applies_to(target) {
                continue;
            }

            match self.attempt(strategy, base, target).await {
                Ok((rate, mut warnings)) => {
                    debug!(%strategy, rate, "Resolved rate");
                    warnings.extend(self.write_through(base, target, rate).await);
                    return Ok(Resolution {
                        quote: RateQuote {
                            base_currency: base,
                            target_currency: target,
                            rate,
                            timestamp: Utc::now(),
                        },
                        source: RateSource::Fetched(strategy),
                        warnings,
                    });
                }
                Err(e) => {
                    debug!(%strategy, error = %e, "Fetch strategy failed");
                    failures.push(StrategyFailure {
                        strategy,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(HubError::RateResolutionFailed {
            base,
            target,
            failures,
        })
    }

    /// Rate for `base -> target`, defaulting the target to the home currency.
    pub async fn get_rate(&self, base: CurrencyCode, target: Option<CurrencyCode>) -> HubResult<f64> {
        self.quote(base, target).await.map(|q| q.rate)
    }

    pub async fn quote(&self, base: CurrencyCode, target: Option<CurrencyCode>) -> HubResult<RateQuote> {
        let target = target.unwrap_or(HOME_CURRENCY);
        self.resolve(base, target).await.map(|r| r.quote)
    }

    async fn attempt(
        &self,
        strategy: FetchStrategy,
        base: CurrencyCode,
        target: CurrencyCode,
    ) -> HubResult<(f64, Vec<Warning>)> {
        match strategy {
            FetchStrategy::HomeBatch => {
                let (rates, stale) = self.home_batch().await?;
                // rates hold home -> X, we want base -> home
                match rates.get(&base).copied() {
                    Some(home_to_base) if home_to_base.is_finite() && home_to_base > 0.0 => {
                        Ok((1.0 / home_to_base, stale.into_iter().collect()))
                    }
                    _ => Err(HubError::RateNotFound {
                        base: HOME_CURRENCY,
                        target: base,
                    }),
                }
            }
            FetchStrategy::DirectPair => {
                let rate = self.provider.fetch_pair(base, target).await?;
                Ok((rate, Vec::new()))
            }
        }
    }

    /// The shared home batch: memoized for the cache TTL, refetched once
    /// expired, and served stale when a refetch fails. The lock is not held
    /// across the fetch; concurrent refreshes may both hit the provider.
    async fn home_batch(&self) -> HubResult<(Arc<HashMap<CurrencyCode, f64>>, Option<Warning>)> {
        {
            let memo = self.home_batch.lock().await;
            if let Some(batch) = memo.as_ref()
                && batch.is_fresh(self.cache.ttl())
            {
                debug!("Using memoized home batch from {}", batch.fetched_at);
                return Ok((Arc::clone(&batch.rates), None));
            }
        }

        match self.provider.fetch_batch_from_base(HOME_CURRENCY).await {
            Ok(rates) => {
                let rates = Arc::new(rates);
                *self.home_batch.lock().await = Some(HomeBatch {
                    rates: Arc::clone(&rates),
                    fetched_at: Utc::now(),
                });
                Ok((rates, None))
            }
            Err(e) => {
                let memo = self.home_batch.lock().await;
                match memo.as_ref() {
                    Some(batch) => {
                        warn!(
                            error = %e,
                            fetched_at = %batch.fetched_at,
                            "Batch refresh failed, serving stale batch"
                        );
                        Ok((
                            Arc::clone(&batch.rates),
                            Some(Warning::StaleHomeBatch {
                                fetched_at: batch.fetched_at,
                                reason: e.to_string(),
                            }),
                        ))
                    }
                    None => Err(e),
                }
            }
        }
    }

    async fn write_through(&self, base: CurrencyCode, target: CurrencyCode, rate: f64) -> Vec<Warning> {
        match self.cache.store(base, target, rate).await {
            Ok(_) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to cache rate {}/{}", base, target);
                vec![Warning::CacheWriteFailed {
                    key: RateKey::new(base, target),
                    reason: e.to_string(),
                }]
            }
        }
    }
}
