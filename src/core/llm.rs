//! Language model abstraction used by the NLP components

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Any way the model can let us down. Callers always absorb these into a
/// deterministic fallback.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    Transport(String),

    #[error("Model returned HTTP {0}")]
    Status(u16),

    #[error("Model reply could not be parsed: {0}")]
    Malformed(String),

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),
}

/// Sampling knobs passed through to the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sampling {
    pub temperature: f32,
    pub top_p: f32,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the raw completion for `prompt`.
    async fn generate(&self, prompt: &str, sampling: Option<Sampling>) -> Result<String, ModelError>;
}

/// Runs one generation bounded by `timeout`. On expiry the in-flight request
/// future is dropped, which aborts it.
pub async fn generate_within(
    model: &dyn LanguageModel,
    prompt: &str,
    sampling: Option<Sampling>,
    timeout: Duration,
) -> Result<String, ModelError> {
    tokio::time::timeout(timeout, model.generate(prompt, sampling))
        .await
        .map_err(|_| ModelError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowModel;

    #[async_trait]
    impl LanguageModel for SlowModel {
        async fn generate(&self, _prompt: &str, _sampling: Option<Sampling>) -> Result<String, ModelError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn generate(&self, prompt: &str, _sampling: Option<Sampling>) -> Result<String, ModelError> {
            Ok(prompt.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_generate_within_times_out() {
        let result = generate_within(&SlowModel, "hi", None, Duration::from_millis(20)).await;
        assert!(matches!(result, Err(ModelError::Timeout(d)) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_generate_within_passes_reply_through() {
        let reply = generate_within(&EchoModel, "usd", None, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(reply, "USD");
    }
}
