use crate::core::currency::{CurrencyCode, HOME_CURRENCY};
use crate::core::llm::{LanguageModel, Sampling, generate_within};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Ways of producing prose. The model is tried first; the template never
/// fails, so there is always text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStrategy {
    /// Model completion. Fails on timeout, transport/status error or an
    /// empty reply.
    Model,
    /// Deterministic text built locally.
    Template,
}

const DESCRIBE_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    top_p: 0.9,
};

const UNSUPPORTED_SAMPLING: Sampling = Sampling {
    temperature: 0.8,
    top_p: 0.9,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendlyResponse {
    pub text: String,
    pub strategy: ResponseStrategy,
}

/// Rate to 4 dp with worked conversions of 100 and 1000 units of `base`.
pub fn rate_template(base: CurrencyCode, target: CurrencyCode, rate: f64) -> String {
    format!(
        "The current exchange rate is {rate:.4} {target} per 1 {base}. \
         For example, 100 {base} is about {:.2} {target} and 1000 {base} is about {:.2} {target}.",
        rate * 100.0,
        rate * 1000.0,
    )
}

pub fn unsupported_template(supported: &[CurrencyCode]) -> String {
    let supported_list = supported
        .iter()
        .map(|c| format!("{} ({})", c, c.name()))
        .collect::<Vec<_>>()
        .join(", ");
    let example = supported.first().map_or("USD", |c| c.code());
    format!(
        "I couldn't identify a supported currency in your query. \
         Currently, I can help you with exchange rates for: {supported_list}. \
         Try asking something like 'What is the {example} to {HOME_CURRENCY} rate?'"
    )
}

fn describe_prompt(base: CurrencyCode, target: CurrencyCode, rate: f64) -> String {
    let base_name = base.name();
    let target_name = target.name();
    format!(
        "You are a helpful currency exchange assistant. Explain this exchange rate in a friendly, conversational way.

Exchange Rate Information:
- 1 {base_name} ({base}) = {rate:.4} {target_name} ({target})
- This is the current, live exchange rate

Instructions:
- Give a clear, friendly response in 2-3 sentences
- Mention what this rate means for someone converting money
- Be conversational and helpful, like you're talking to a friend
- Don't use technical jargon or overly formal language
- Start with something like \"Right now, one {base_name}...\" or \"Based on the latest rates...\"
- Give a practical example (like converting 100 or 1000 units)

Response:"
    )
}

fn unsupported_prompt(query: &str, supported: &[CurrencyCode]) -> String {
    let bullets = supported
        .iter()
        .map(|c| format!("- {} ({})", c, c.name()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a helpful currency exchange assistant. A user asked: \"{query}\"

However, you can only provide exchange rates for these currencies against the {home_name} ({HOME_CURRENCY}):
{bullets}

Your task:
1. Politely explain you can't help with their specific currency
2. List the currencies you DO support in a friendly way
3. Encourage them to ask about one of the supported currencies
4. Give an example of how they could ask

Keep your response to 2-3 sentences. Make it feel natural and encouraging, not robotic.

Response:",
        home_name = HOME_CURRENCY.name(),
    )
}

pub struct FriendlyResponder {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl FriendlyResponder {
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Prose explaining `rate`. Always returns usable text.
    pub async fn describe(&self, base: CurrencyCode, target: CurrencyCode, rate: f64) -> String {
        self.describe_detailed(base, target, rate).await.text
    }

    pub async fn describe_detailed(
        &self,
        base: CurrencyCode,
        target: CurrencyCode,
        rate: f64,
    ) -> FriendlyResponse {
        self.respond(
            &describe_prompt(base, target, rate),
            DESCRIBE_SAMPLING,
            rate_template(base, target, rate),
        )
        .await
    }

    /// Guidance for a query no supported currency could be extracted from.
    pub async fn describe_unsupported(&self, query: &str, supported: &[CurrencyCode]) -> String {
        self.describe_unsupported_detailed(query, supported).await.text
    }

    pub async fn describe_unsupported_detailed(
        &self,
        query: &str,
        supported: &[CurrencyCode],
    ) -> FriendlyResponse {
        self.respond(
            &unsupported_prompt(query, supported),
            UNSUPPORTED_SAMPLING,
            unsupported_template(supported),
        )
        .await
    }

    async fn respond(&self, prompt: &str, sampling: Sampling, template: String) -> FriendlyResponse {
        match generate_within(self.model.as_ref(), prompt, Some(sampling), self.timeout).await {
            Ok(reply) if !reply.trim().is_empty() => {
                debug!("Using model response");
                return FriendlyResponse {
                    text: reply.trim().to_string(),
                    strategy: ResponseStrategy::Model,
                };
            }
            Ok(_) => warn!("Model returned an empty reply, using template"),
            Err(e) => warn!(error = %e, "Model unavailable, using template"),
        }

        FriendlyResponse {
            text: template,
            strategy: ResponseStrategy::Template,
        }
    }
}
