//! Request and response payloads exchanged with the dashboard.

use crate::core::currency::{CurrencyCode, CurrencyInfo};
use crate::core::rate::RateQuote;
use crate::historical::HistoricalPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CURRENCY_NOT_RECOGNIZED: &str = "currency_not_recognized";
pub const SERVER_ERROR: &str = "server_error";

pub const EXAMPLE_QUERIES: [&str; 3] = [
    "What is the USD to ZAR rate?",
    "Convert EUR to ZAR",
    "How much is the British pound in rands?",
];

/// Codes arrive as raw strings so validation happens in one place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectRateRequest {
    pub base_currency: Option<String>,
    /// Defaults to the home currency
    pub target_currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectRateResponse {
    pub base_currency: CurrencyCode,
    pub target_currency: CurrencyCode,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<RateQuote> for DirectRateResponse {
    fn from(quote: RateQuote) -> Self {
        Self {
            base_currency: quote.base_currency,
            target_currency: quote.target_currency,
            rate: quote.rate,
            timestamp: quote.timestamp,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalRequest {
    pub base_currency: String,
    pub target_currency: String,
    pub days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalResponse {
    pub base_currency: CurrencyCode,
    pub target_currency: CurrencyCode,
    pub data: Vec<HistoricalPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NlpRequest {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NlpAnswer {
    pub base_currency: CurrencyCode,
    pub target_currency: CurrencyCode,
    pub target_currency_amount: f64,
    pub friendly_response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_currencies: Option<Vec<CurrencyCode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn currency_not_recognized(message: String, supported: &[CurrencyCode]) -> Self {
        Self {
            error: CURRENCY_NOT_RECOGNIZED.to_string(),
            message,
            supported_currencies: Some(supported.to_vec()),
            examples: Some(EXAMPLE_QUERIES.iter().map(ToString::to_string).collect()),
        }
    }

    pub fn server_error(supported: &[CurrencyCode]) -> Self {
        Self {
            error: SERVER_ERROR.to_string(),
            message: "An unexpected error occurred while processing your request. Please try again."
                .to_string(),
            supported_currencies: Some(supported.to_vec()),
            examples: None,
        }
    }
}

/// Either an answer or a structured, user-presentable error. Serialized
/// without a tag; the two shapes are told apart by their fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NlpResponse {
    Answer(NlpAnswer),
    Error(ErrorResponse),
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyListResponse {
    pub currencies: Vec<CurrencyInfo>,
}

impl CurrencyListResponse {
    pub fn all() -> Self {
        Self {
            currencies: CurrencyCode::all().map(|c| *c.info()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::{EUR, GBP, USD, ZAR};
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    #[test]
    fn test_direct_request_target_is_optional() {
        let request: DirectRateRequest = serde_json::from_value(json!({"base_currency": "USD"})).unwrap();
        assert_eq!(request.base_currency.as_deref(), Some("USD"));
        assert!(request.target_currency.is_none());
    }

    #[test]
    fn test_direct_response_shape() {
        let response = DirectRateResponse {
            base_currency: USD,
            target_currency: ZAR,
            rate: 18.5,
            timestamp: Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "base_currency": "USD",
                "target_currency": "ZAR",
                "rate": 18.5,
                "timestamp": "2026-10-19T08:30:00Z"
            })
        );
    }

    #[test]
    fn test_historical_points_serialize_calendar_days() {
        let response = HistoricalResponse {
            base_currency: EUR,
            target_currency: ZAR,
            data: vec![HistoricalPoint {
                date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                rate: 20.1234,
            }],
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["data"][0], json!({"date": "2026-10-19", "rate": 20.1234}));
    }

    #[test]
    fn test_unrecognized_currency_shape() {
        let error = ErrorResponse::currency_not_recognized("nope".to_string(), &[USD, EUR, GBP]);
        let value = serde_json::to_value(NlpResponse::Error(error)).unwrap();
        assert_eq!(value["error"], "currency_not_recognized");
        assert_eq!(value["supported_currencies"], json!(["USD", "EUR", "GBP"]));
        assert_eq!(value["examples"].as_array().unwrap().len(), 3);
        assert!(value.get("friendly_response").is_none());
    }

    #[test]
    fn test_server_error_omits_examples() {
        let value = serde_json::to_value(ErrorResponse::server_error(&[USD])).unwrap();
        assert_eq!(value["error"], "server_error");
        assert!(value.get("examples").is_none());
    }

    #[test]
    fn test_currency_listing_has_display_metadata() {
        let value = serde_json::to_value(CurrencyListResponse::all()).unwrap();
        let currencies = value["currencies"].as_array().unwrap();
        assert_eq!(currencies.len(), 29);
        assert_eq!(
            currencies[3],
            json!({"code": "ZAR", "name": "South African Rand", "symbol": "R", "flag": "🇿🇦"})
        );
    }
}
