use cconv::AppCommand;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_utils {
    use super::*;

    pub async fn frankfurter_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub async fn exchangerate_server(from: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v4/latest/{from}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    /// Writes a config that points at the given servers and keeps data in `dir`.
    pub fn write_config(dir: &Path, frankfurter: &str, exchangerate: &str) -> String {
        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
sources:
  - kind: frankfurter
    base_url: "{frankfurter}"
  - kind: exchangerate_api
    base_url: "{exchangerate}/v4"
retry:
  max_attempts: 3
  delay_ms: 1
request_timeout_secs: 5
check_connectivity: false
locale: "en-US"
data_path: "{}"
"#,
            dir.join("data").display()
        );
        fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path.to_str().unwrap().to_string()
    }
}

fn convert(amount: &str, from: &str, to: &str) -> AppCommand {
    AppCommand::Convert {
        amount: amount.to_string(),
        from: Some(from.to_string()),
        to: Some(to.to_string()),
        swap: false,
        json: false,
    }
}

#[test_log::test(tokio::test)]
async fn test_convert_then_replay_from_history() {
    let frankfurter = test_utils::frankfurter_server(
        200,
        r#"{"amount":1.0,"base":"USD","date":"2024-01-01","rates":{"IDR":15750.0}}"#,
    )
    .await;
    let exchangerate = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_utils::write_config(temp_dir.path(), &frankfurter.uri(), &exchangerate.uri());

    let result = cconv::run_command(convert("100", "USD", "IDR"), Some(&config)).await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let result = cconv::run_command(
        AppCommand::History {
            clear: false,
            replay: Some(1),
        },
        Some(&config),
    )
    .await;
    assert!(result.is_ok(), "Replay failed with: {:?}", result.err());

    let result = cconv::run_command(AppCommand::Stats { reset: false }, Some(&config)).await;
    assert!(result.is_ok());

    let requests = frankfurter.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(exchangerate.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_secondary_source_used_when_primary_fails() {
    let frankfurter = test_utils::frankfurter_server(503, "Service Unavailable").await;
    let exchangerate = test_utils::exchangerate_server(
        "EUR",
        200,
        r#"{"base":"EUR","date":"2024-01-02","rates":{"EUR":1,"JPY":160.5}}"#,
    )
    .await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_utils::write_config(temp_dir.path(), &frankfurter.uri(), &exchangerate.uri());

    let command = AppCommand::Convert {
        amount: "2".to_string(),
        from: Some("EUR".to_string()),
        to: Some("JPY".to_string()),
        swap: false,
        json: true,
    };
    let result = cconv::run_command(command, Some(&config)).await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    // One attempt was enough, so the primary was asked exactly once.
    assert_eq!(frankfurter.received_requests().await.unwrap().len(), 1);
    assert_eq!(exchangerate.received_requests().await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_all_sources_failing_reports_unavailable() {
    let frankfurter = test_utils::frankfurter_server(500, "boom").await;
    let exchangerate = test_utils::exchangerate_server("USD", 502, "bad gateway").await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_utils::write_config(temp_dir.path(), &frankfurter.uri(), &exchangerate.uri());

    let err = cconv::run_command(convert("10", "USD", "EUR"), Some(&config))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Conversion failed. Currency exchange services are temporarily unavailable."
    );
    assert_eq!(frankfurter.received_requests().await.unwrap().len(), 3);
    assert_eq!(exchangerate.received_requests().await.unwrap().len(), 3);

    // Nothing was recorded, so there is no entry to replay.
    let replay = cconv::run_command(
        AppCommand::History {
            clear: false,
            replay: Some(1),
        },
        Some(&config),
    )
    .await;
    assert!(replay.is_err());
}

#[test_log::test(tokio::test)]
async fn test_invalid_amount_is_rejected_before_any_request() {
    let frankfurter = test_utils::frankfurter_server(200, "{}").await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_utils::write_config(temp_dir.path(), &frankfurter.uri(), &frankfurter.uri());

    let err = cconv::run_command(convert("-5", "USD", "EUR"), Some(&config))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Enter a valid amount (0 or more).");
    assert!(frankfurter.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_same_currency_needs_no_network() {
    let frankfurter = test_utils::frankfurter_server(500, "boom").await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_utils::write_config(temp_dir.path(), &frankfurter.uri(), &frankfurter.uri());

    let result = cconv::run_command(convert("42", "EUR", "EUR"), Some(&config)).await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());
    assert!(frankfurter.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_currencies_fall_back_when_list_unavailable() {
    let frankfurter = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/currencies"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&frankfurter)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_utils::write_config(temp_dir.path(), &frankfurter.uri(), &frankfurter.uri());

    let result = cconv::run_command(AppCommand::Currencies, Some(&config)).await;
    assert!(result.is_ok());
}

#[test_log::test(tokio::test)]
async fn test_favorites_keep_going_when_one_pair_fails() {
    let frankfurter = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("from", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"amount":1.0,"base":"USD","date":"2024-01-01","rates":{"IDR":15750.0}}"#,
        ))
        .mount(&frankfurter)
        .await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&frankfurter)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_utils::write_config(temp_dir.path(), &frankfurter.uri(), &frankfurter.uri());

    let result = cconv::run_command(
        AppCommand::Favorites {
            amount: "1".to_string(),
        },
        Some(&config),
    )
    .await;
    assert!(result.is_ok(), "Favorites failed with: {:?}", result.err());
}
