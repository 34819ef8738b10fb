//! Synthetic rate history.
//!
//! None of this is real market data. The series is fabricated from the
//! current rate with bounded noise and a trend term that decays to zero at
//! today, so charts have something plausible to draw.

use crate::core::currency::CurrencyCode;
use crate::core::error::{HubError, HubResult};
use crate::resolver::RateResolver;
use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_HISTORY_DAYS: u32 = 30;
/// Ten years of daily points
pub const MAX_HISTORY_DAYS: u32 = 3650;

/// Half-width of the per-point noise band.
const NOISE_BAND: f64 = 0.05;
/// Scale of the trend term at the oldest point.
const TREND_SCALE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

pub struct HistoricalSeriesGenerator {
    resolver: Arc<RateResolver>,
}

impl HistoricalSeriesGenerator {
    pub fn new(resolver: Arc<RateResolver>) -> Self {
        Self { resolver }
    }

    /// `days + 1` points ending today, oldest first. The current rate is
    /// resolved once. Downsampling long ranges is left to the consumer.
    pub async fn generate(
        &self,
        base: CurrencyCode,
        target: CurrencyCode,
        days: u32,
    ) -> HubResult<Vec<HistoricalPoint>> {
        if days > MAX_HISTORY_DAYS {
            return Err(HubError::Validation(format!(
                "days must be at most {MAX_HISTORY_DAYS}, got {days}"
            )));
        }

        let current_rate = self.resolver.get_rate(base, Some(target)).await?;
        debug!(%base, %target, days, current_rate, "Synthesizing history");

        let today = Utc::now().date_naive();
        let mut rng = rand::thread_rng();
        Ok(synthesize(current_rate, days, today, &mut rng))
    }
}

/// Builds the series for offsets `days..=0` (0 is `today`):
/// `round4(current * (1 + variation) * (1 + u * 0.2 * i / max(days, 1)))`
/// with `variation` uniform in ±5% and `u` uniform in ±0.5.
pub fn synthesize<R: Rng + ?Sized>(
    current_rate: f64,
    days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<HistoricalPoint> {
    let span = f64::from(days.max(1));
    (0..=days)
        .rev()
        .map(|offset| {
            let variation = rng.gen_range(-NOISE_BAND..=NOISE_BAND);
            let u = rng.gen_range(-0.5..=0.5);
            let trend_factor = 1.0 + u * TREND_SCALE * (f64::from(offset) / span);
            HistoricalPoint {
                date: today - Duration::days(i64::from(offset)),
                rate: round4(current_rate * (1.0 + variation) * trend_factor),
            }
        })
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::{DEFAULT_TTL, RateCache};
    use crate::core::currency::{USD, ZAR};
    use crate::store::memory::MemoryRateStore;
    use crate::test_support::FakeProvider;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zero_days_is_a_single_point_today() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = day(2026, 10, 19);
        let series = synthesize(18.5, 0, today, &mut rng);

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, today);
    }

    #[test]
    fn test_thirty_days_ascending_unique_dates() {
        let mut rng = StdRng::seed_from_u64(42);
        let today = day(2026, 3, 2);
        let series = synthesize(18.5, 30, today, &mut rng);

        assert_eq!(series.len(), 31);
        assert_eq!(series.first().unwrap().date, day(2026, 1, 31));
        assert_eq!(series.last().unwrap().date, today);
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        let unique: HashSet<_> = series.iter().map(|p| p.date).collect();
        assert_eq!(unique.len(), 31);
    }

    #[test]
    fn test_points_stay_within_noise_and_trend_bounds() {
        let current = 18.5;
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let series = synthesize(current, 30, day(2026, 10, 19), &mut rng);

            // Trend has decayed to nothing today, only the noise band is left
            let today = series.last().unwrap().rate;
            assert!((today - current).abs() <= current * NOISE_BAND + 1e-4);

            // Oldest point carries the full trend: (1 ± 0.05) * (1 ± 0.1)
            let oldest = series.first().unwrap().rate;
            assert!(oldest >= current * 0.95 * 0.9 - 1e-4);
            assert!(oldest <= current * 1.05 * 1.1 + 1e-4);

            for point in &series {
                assert!(point.rate > 0.0);
                assert_eq!(round4(point.rate), point.rate);
            }
        }
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(18.123_449), 18.1234);
        assert_eq!(round4(18.123_451), 18.1235);
    }

    #[tokio::test]
    async fn test_generate_resolves_current_rate_once() {
        let provider = Arc::new(FakeProvider::new().with_batch(&[(USD, 0.05)]));
        let cache = Arc::new(RateCache::new(Arc::new(MemoryRateStore::new()), DEFAULT_TTL));
        let resolver = Arc::new(RateResolver::new(provider.clone(), cache));
        let generator = HistoricalSeriesGenerator::new(resolver);

        let series = generator.generate(USD, ZAR, 7).await.unwrap();
        assert_eq!(series.len(), 8);
        assert_eq!(series.last().unwrap().date, Utc::now().date_naive());
        assert!((series.last().unwrap().rate - 20.0).abs() <= 20.0 * NOISE_BAND + 1e-4);
        assert_eq!(
            provider.batch_calls.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn test_generate_rejects_oversized_range() {
        let provider = Arc::new(FakeProvider::new());
        let cache = Arc::new(RateCache::new(Arc::new(MemoryRateStore::new()), DEFAULT_TTL));
        let generator = HistoricalSeriesGenerator::new(Arc::new(RateResolver::new(provider, cache)));

        let err = generator.generate(USD, ZAR, MAX_HISTORY_DAYS + 1).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_generate_propagates_resolution_failure() {
        let provider = Arc::new(FakeProvider::new());
        let cache = Arc::new(RateCache::new(Arc::new(MemoryRateStore::new()), DEFAULT_TTL));
        let generator = HistoricalSeriesGenerator::new(Arc::new(RateResolver::new(provider, cache)));

        assert!(matches!(
            generator.generate(USD, ZAR, 30).await,
            Err(HubError::RateResolutionFailed { .. })
        ));
    }
}
