use crate::core::currency::{CurrencyCode, EUR, GBP, USD};
use crate::core::llm::{LanguageModel, generate_within};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Currencies natural-language queries can resolve to.
pub const SUPPORTED_CURRENCIES: [CurrencyCode; 3] = [USD, EUR, GBP];

/// Ordered keyword table. The first entry with a matching keyword wins.
const KEYWORDS: [(CurrencyCode, &[&str]); 3] = [
    (USD, &["USD", "DOLLAR"]),
    (EUR, &["EUR", "EURO"]),
    (GBP, &["GBP", "POUND", "STERLING"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    Keyword,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub code: CurrencyCode,
    pub stage: ExtractionStage,
}

/// Case-insensitive substring match against the keyword table.
pub fn match_keywords(query: &str) -> Option<CurrencyCode> {
    let query = query.to_uppercase();
    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| query.contains(k)))
        .map(|(code, _)| *code)
}

/// Accepts a model reply only if, trimmed and upper-cased, it is exactly one
/// of the supported codes.
pub fn parse_model_reply(reply: &str) -> Option<CurrencyCode> {
    let reply = reply.trim().to_uppercase();
    SUPPORTED_CURRENCIES
        .iter()
        .find(|code| code.code() == reply)
        .copied()
}

fn extraction_prompt(query: &str) -> String {
    let options = SUPPORTED_CURRENCIES
        .iter()
        .map(|c| c.code())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Extract the currency code from this query.\n\
         Valid options: {options}\n\
         Query: \"{query}\"\n\
         Reply with ONLY the 3-letter currency code, nothing else."
    )
}

pub struct CurrencyIntentExtractor {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl CurrencyIntentExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Resolves `query` to a supported currency, or `None`. Never fails.
    pub async fn extract(&self, query: &str) -> Option<CurrencyCode> {
        self.extract_detailed(query).await.map(|e| e.code)
    }

    /// Like [`extract`](Self::extract), also reporting which stage decided.
    /// The model is only consulted when no keyword matches, and only once.
    pub async fn extract_detailed(&self, query: &str) -> Option<Extraction> {
        if let Some(code) = match_keywords(query) {
            debug!(%code, "Currency matched by keyword");
            return Some(Extraction {
                code,
                stage: ExtractionStage::Keyword,
            });
        }

        let prompt = extraction_prompt(query);
        match generate_within(self.model.as_ref(), &prompt, None, self.timeout).await {
            Ok(reply) => {
                let code = parse_model_reply(&reply);
                debug!(reply = %reply.trim(), accepted = code.is_some(), "Model extraction reply");
                code.map(|code| Extraction {
                    code,
                    stage: ExtractionStage::Model,
                })
            }
            Err(e) => {
                warn!(error = %e, "Currency extraction model call failed");
                None
            }
        }
    }
}
