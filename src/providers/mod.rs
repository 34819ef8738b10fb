pub mod exchange_rate_api;
pub mod ollama;

pub use exchange_rate_api::ExchangeRateApiProvider;
pub use ollama::OllamaModel;
