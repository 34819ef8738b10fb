//! Natural-language front end: currency extraction and friendly prose.

pub mod extractor;
pub mod responder;

pub use extractor::{CurrencyIntentExtractor, Extraction, ExtractionStage, SUPPORTED_CURRENCIES};
pub use responder::{FriendlyResponder, FriendlyResponse, ResponseStrategy};
