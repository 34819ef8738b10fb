use crate::core::llm::{LanguageModel, ModelError, Sampling};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Local model served by Ollama's `/api/generate` endpoint, non-streaming.
pub struct OllamaModel {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaModel {
    pub fn new(base_url: &str, model: &str) -> Result<Self, ModelError> {
        // No client-side timeout: callers bound each call themselves
        let client = reqwest::Client::builder()
            .user_agent("zarhub/1.0")
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Sampling>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[async_trait]
impl LanguageModel for OllamaModel {
    #[instrument(name = "OllamaGenerate", skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, sampling: Option<Sampling>) -> Result<String, ModelError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: sampling,
        };
        debug!("Requesting completion from {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ModelError::Status(response.status().as_u16()));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(e.to_string()))?;
        Ok(data.response)
    }
}
