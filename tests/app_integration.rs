use serde_json::json;
use std::fs;
use tempfile::NamedTempFile;
use zarhub::core::config::AppConfig;
use zarhub::core::currency::{GBP, USD, ZAR};
use zarhub::payload::{DirectRateRequest, HistoricalRequest, NlpRequest, NlpResponse};
use zarhub::service::ExchangeHub;

const ZAR_RATES: &str = r#"{
    "base": "ZAR",
    "date": "2026-10-19",
    "rates": {"ZAR": 1, "USD": 0.054, "EUR": 0.05, "GBP": 0.043}
}"#;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_rates_mock_server(base: &str, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/latest/{base}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub async fn create_ollama_mock_server(status: u16, reply: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({"model": "llama3:8b", "response": reply, "done": true})),
            )
            .mount(&mock_server)
            .await;
        mock_server
    }
}

fn write_config(rates_url: &str, ollama_url: &str, extra: &str) -> NamedTempFile {
    let config_file = NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!(
        r#"
providers:
  exchange_rate:
    base_url: "{rates_url}"
    timeout_secs: 2
  ollama:
    base_url: "{ollama_url}"
    extract_timeout_secs: 2
    describe_timeout_secs: 2
{extra}
"#
    );
    fs::write(config_file.path(), config_content).expect("Failed to write config file");
    config_file
}

fn hub_for(config_file: &NamedTempFile) -> ExchangeHub {
    let config = AppConfig::load_from_path(config_file.path()).expect("Failed to load config");
    ExchangeHub::from_config(&config).expect("Failed to build hub")
}

#[test_log::test(tokio::test)]
async fn test_rate_command_with_mock() {
    let rates = test_utils::create_rates_mock_server("ZAR", ZAR_RATES).await;
    let ollama = test_utils::create_ollama_mock_server(200, "unused").await;
    let config_file = write_config(&rates.uri(), &ollama.uri(), "");

    let result = zarhub::run_command(
        zarhub::AppCommand::Rate {
            base: "usd".to_string(),
            target: None,
        },
        Some(config_file.path().to_str().unwrap()),
        false,
    )
    .await;
    assert!(result.is_ok(), "Rate command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_rate_command_rejects_unknown_currency() {
    let rates = test_utils::create_rates_mock_server("ZAR", ZAR_RATES).await;
    let ollama = test_utils::create_ollama_mock_server(200, "unused").await;
    let config_file = write_config(&rates.uri(), &ollama.uri(), "");

    let result = zarhub::run_command(
        zarhub::AppCommand::Rate {
            base: "XYZ".to_string(),
            target: None,
        },
        Some(config_file.path().to_str().unwrap()),
        true,
    )
    .await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Unsupported currency code"));
}

#[test_log::test(tokio::test)]
async fn test_currencies_and_history_commands() {
    let rates = test_utils::create_rates_mock_server("ZAR", ZAR_RATES).await;
    let ollama = test_utils::create_ollama_mock_server(200, "unused").await;
    let config_file = write_config(&rates.uri(), &ollama.uri(), "");
    let config_path = config_file.path().to_str().unwrap();

    zarhub::run_command(zarhub::AppCommand::Currencies, Some(config_path), true)
        .await
        .expect("Currencies command failed");

    zarhub::run_command(
        zarhub::AppCommand::History {
            base: "EUR".to_string(),
            target: "ZAR".to_string(),
            days: Some(7),
        },
        Some(config_path),
        false,
    )
    .await
    .expect("History command failed");
}

#[test_log::test(tokio::test)]
async fn test_ask_command_with_mock_model() {
    let rates = test_utils::create_rates_mock_server("ZAR", ZAR_RATES).await;
    let ollama = test_utils::create_ollama_mock_server(200, "Right now, one Euro is about R20.").await;
    let config_file = write_config(&rates.uri(), &ollama.uri(), "");

    let result = zarhub::run_command(
        zarhub::AppCommand::Ask {
            query: "Convert EUR to ZAR".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
        false,
    )
    .await;
    assert!(result.is_ok(), "Ask command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_direct_lookups_share_the_cache() {
    let rates = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/latest/ZAR"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(ZAR_RATES))
        .expect(1)
        .mount(&rates)
        .await;
    let ollama = test_utils::create_ollama_mock_server(200, "unused").await;
    let config_file = write_config(&rates.uri(), &ollama.uri(), "");
    let hub = hub_for(&config_file);

    let request = DirectRateRequest {
        base_currency: Some("USD".to_string()),
        target_currency: Some("ZAR".to_string()),
    };
    let first = hub.direct_lookup(&request).await.unwrap();
    let second = hub.direct_lookup(&request).await.unwrap();

    assert_eq!(first.base_currency, USD);
    assert_eq!(first.target_currency, ZAR);
    assert!((first.rate - 1.0 / 0.054).abs() < 1e-9);
    assert_eq!(first.rate, second.rate);
}

#[test_log::test(tokio::test)]
async fn test_history_has_one_point_per_day() {
    let rates = test_utils::create_rates_mock_server("ZAR", ZAR_RATES).await;
    let ollama = test_utils::create_ollama_mock_server(200, "unused").await;
    let hub = hub_for(&write_config(&rates.uri(), &ollama.uri(), ""));

    let response = hub
        .historical(&HistoricalRequest {
            base_currency: "USD".to_string(),
            target_currency: "ZAR".to_string(),
            days: Some(30),
        })
        .await
        .unwrap();

    assert_eq!(response.data.len(), 31);
    assert_eq!(
        response.data.last().unwrap().date,
        chrono::Utc::now().date_naive()
    );
}

#[test_log::test(tokio::test)]
async fn test_nlp_answer_end_to_end() {
    let rates = test_utils::create_rates_mock_server("ZAR", ZAR_RATES).await;
    let ollama =
        test_utils::create_ollama_mock_server(200, "Right now, one British Pound is about R23.26.").await;
    let hub = hub_for(&write_config(&rates.uri(), &ollama.uri(), ""));

    let response = hub
        .natural_language(&NlpRequest {
            query: "How much is the British pound in rands?".to_string(),
        })
        .await
        .unwrap();

    let NlpResponse::Answer(answer) = response else {
        panic!("expected an answer, got {response:?}");
    };
    assert_eq!(answer.base_currency, GBP);
    assert_eq!(answer.target_currency, ZAR);
    assert!((answer.target_currency_amount - 1.0 / 0.043).abs() < 1e-9);
    assert_eq!(
        answer.friendly_response,
        "Right now, one British Pound is about R23.26."
    );
}

#[test_log::test(tokio::test)]
async fn test_nlp_unsupported_currency_end_to_end() {
    let rates = test_utils::create_rates_mock_server("ZAR", ZAR_RATES).await;
    // The same reply serves extraction (rejected) and the guidance prose
    let ollama = test_utils::create_ollama_mock_server(200, "JPY").await;
    let hub = hub_for(&write_config(&rates.uri(), &ollama.uri(), ""));

    let response = hub
        .natural_language(&NlpRequest {
            query: "How many yen for a rand?".to_string(),
        })
        .await
        .unwrap();

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["error"], "currency_not_recognized");
    assert_eq!(value["supported_currencies"], json!(["USD", "EUR", "GBP"]));
    assert_eq!(value["examples"].as_array().unwrap().len(), 3);
}

#[test_log::test(tokio::test)]
async fn test_nlp_falls_back_to_template_when_model_is_down() {
    let rates = test_utils::create_rates_mock_server("ZAR", ZAR_RATES).await;
    let ollama = test_utils::create_ollama_mock_server(500, "").await;
    let hub = hub_for(&write_config(&rates.uri(), &ollama.uri(), ""));

    let response = hub
        .natural_language(&NlpRequest {
            query: "What is the USD to ZAR rate?".to_string(),
        })
        .await
        .unwrap();

    let NlpResponse::Answer(answer) = response else {
        panic!("expected an answer, got {response:?}");
    };
    assert!(
        answer
            .friendly_response
            .starts_with("The current exchange rate is 18.5185 ZAR per 1 USD.")
    );
}

#[test_log::test(tokio::test)]
async fn test_nlp_rate_failure_is_server_error() {
    let rates = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(wiremock::ResponseTemplate::new(503))
        .mount(&rates)
        .await;
    let ollama = test_utils::create_ollama_mock_server(200, "unused").await;
    let hub = hub_for(&write_config(&rates.uri(), &ollama.uri(), ""));

    let response = hub
        .natural_language(&NlpRequest {
            query: "euro".to_string(),
        })
        .await
        .unwrap();

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["error"], "server_error");
}

#[test_log::test(tokio::test)]
async fn test_persistent_cache_under_data_path() {
    let rates = test_utils::create_rates_mock_server("ZAR", ZAR_RATES).await;
    let ollama = test_utils::create_ollama_mock_server(200, "unused").await;
    let data_dir = tempfile::tempdir().unwrap();
    let extra = format!(
        "cache:\n  persist: true\ndata_path: \"{}\"\n",
        data_dir.path().display()
    );
    let hub = hub_for(&write_config(&rates.uri(), &ollama.uri(), &extra));

    let response = hub
        .direct_lookup(&DirectRateRequest {
            base_currency: Some("GBP".to_string()),
            target_currency: None,
        })
        .await
        .unwrap();

    assert_eq!(response.target_currency, ZAR);
    assert!(data_dir.path().join("cache").exists());
}
