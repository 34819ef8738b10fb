//! Error types shared by the rate engine.

use crate::core::currency::CurrencyCode;
use crate::resolver::FetchStrategy;
use std::fmt::{self, Display};
use thiserror::Error;

/// Why a single fetch strategy did not produce a rate.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyFailure {
    pub strategy: FetchStrategy,
    pub reason: String,
}

impl Display for StrategyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.reason)
    }
}

fn join_failures(failures: &[StrategyFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum HubError {
    /// A required field is missing or malformed. Correctable by the caller.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The upstream quote service errored, timed out or sent garbage.
    #[error("Rate provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The upstream payload did not contain a usable rate for the target.
    #[error("Rate for {target} not found in response for {base}")]
    RateNotFound {
        base: CurrencyCode,
        target: CurrencyCode,
    },

    /// Every applicable fetch strategy failed.
    #[error("Failed to resolve rate {base}->{target}: {}", join_failures(.failures))]
    RateResolutionFailed {
        base: CurrencyCode,
        target: CurrencyCode,
        failures: Vec<StrategyFailure>,
    },
}

impl HubError {
    pub fn is_validation(&self) -> bool {
        matches!(self, HubError::Validation(_))
    }
}

pub type HubResult<T> = Result<T, HubError>;
