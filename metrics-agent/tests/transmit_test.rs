//! HTTP-contract tests for the transmitter, against a mock metrics service.

use metrics_agent::error::AgentError;
use metrics_agent::transmit::Transmitter;
use portal_common::{ClientSession, MetricsPayload};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_payload() -> MetricsPayload {
    MetricsPayload::from_sessions(&[ClientSession {
        ip: "10.0.0.5".to_string(),
        mac: "aa:bb:cc:dd:ee:ff".to_string(),
        download_bytes: 1_048_576,
        upload_bytes: 2048,
        duration_secs: 120,
        token: "tok".to_string(),
        state: "Authenticated".to_string(),
    }])
}

#[tokio::test]
async fn test_send_posts_contract_headers_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/portal/metrics/data-usage"))
        .and(header("Content-Type", "application/json"))
        .and(header("X-Router-ID", "router-1"))
        .and(header("X-Contract-ID", "contract-9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let transmitter = Transmitter::new(&server.uri(), "router-1", "contract-9").unwrap();
    let result = transmitter.send(&sample_payload()).await.unwrap();
    assert!(result.ok);

    // The wire body must match the documented schema.
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let update = &body["sessionUpdates"][0];
    assert_eq!(update["userIP"], "10.0.0.5");
    assert!(update["sessionId"].is_null());
    assert_eq!(update["dataUsage"]["downloadBytes"], 1_048_576);
    assert_eq!(update["dataUsage"]["uploadBytes"], 2048);
    assert_eq!(update["dataUsage"]["totalBytes"], 1_050_624);
    assert!(update["dataUsage"]["lastUpdated"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_soft_rejection_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/portal/metrics/data-usage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"success":false,"error":"db down"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transmitter = Transmitter::new(&server.uri(), "r", "c").unwrap();
    let result = transmitter.send(&sample_payload()).await.unwrap();
    assert!(!result.ok);
    assert!(result.raw_response.contains("db down"));
}

#[tokio::test]
async fn test_one_retry_after_transport_failure() {
    let server = MockServer::start().await;

    // First attempt hits the 500, the retry gets the success response.
    Mock::given(method("POST"))
        .and(path("/api/v1/portal/metrics/data-usage"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/portal/metrics/data-usage"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let transmitter = Transmitter::new(&server.uri(), "r", "c").unwrap();
    let result = transmitter.send(&sample_payload()).await.unwrap();
    assert!(result.ok);
}

#[tokio::test]
async fn test_persistent_failure_surfaces_after_two_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/portal/metrics/data-usage"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(2)
        .mount(&server)
        .await;

    let transmitter = Transmitter::new(&server.uri(), "r", "c").unwrap();
    let err = transmitter.send(&sample_payload()).await.unwrap_err();
    assert!(matches!(err, AgentError::Transport(_)));
    assert!(!err.is_fatal());
}
