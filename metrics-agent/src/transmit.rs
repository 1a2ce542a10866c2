//! Payload delivery to the remote metrics service.

use std::time::Duration;

use portal_common::MetricsPayload;
use reqwest::Client;

use crate::error::{AgentError, Result};

/// Ingestion endpoint, relative to the server base URL.
const METRICS_PATH: &str = "/api/v1/portal/metrics/data-usage";

/// Total timeout per attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport-level attempts per send (one retry).
const MAX_ATTEMPTS: u32 = 2;

/// Outcome of a delivery that reached the server.
#[derive(Debug, Clone)]
pub struct TransmitResult {
    /// True only when the response body carries a `"success": true`
    /// marker. The server may accept the connection yet reject the
    /// content, which is reported here rather than as an error.
    pub ok: bool,
    pub raw_response: String,
}

pub struct Transmitter {
    http_client: Client,
    base_url: String,
    router_id: String,
    contract_id: String,
}

impl Transmitter {
    /// Build the transmitter and its HTTP client.
    ///
    /// Client construction failure means there is no way to deliver
    /// metrics at all, which is fatal for this run.
    pub fn new(base_url: &str, router_id: &str, contract_id: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AgentError::TransportUnavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            router_id: router_id.to_string(),
            contract_id: contract_id.to_string(),
        })
    }

    /// Deliver the payload, retrying once at the transport level.
    ///
    /// Callers must not invoke this with an empty payload; the
    /// empty-run gate lives in the pipeline.
    pub async fn send(&self, payload: &MetricsPayload) -> Result<TransmitResult> {
        let url = format!("{}{}", self.base_url, METRICS_PATH);

        let mut last_error = AgentError::Transport("no attempt made".to_string());
        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(&url, payload).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::debug!("Send attempt {}/{} failed: {}", attempt, MAX_ATTEMPTS, e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    async fn attempt(&self, url: &str, payload: &MetricsPayload) -> Result<TransmitResult> {
        let response = self
            .http_client
            .post(url)
            .header("X-Router-ID", &self.router_id)
            .header("X-Contract-ID", &self.contract_id)
            .json(payload)
            .send()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AgentError::Transport(format!("{}: {}", status, body)));
        }

        Ok(TransmitResult {
            ok: body_reports_success(&body),
            raw_response: body,
        })
    }
}

/// Whether the response body carries a `"success"` field set to `true`.
///
/// A tolerant scan rather than strict JSON parsing: the server is only
/// required to include the marker somewhere in the body, with arbitrary
/// whitespace around the colon.
fn body_reports_success(body: &str) -> bool {
    let marker = "\"success\"";
    let mut rest = body;
    while let Some(idx) = rest.find(marker) {
        let after = rest[idx + marker.len()..].trim_start();
        if let Some(after_colon) = after.strip_prefix(':') {
            if after_colon.trim_start().starts_with("true") {
                return true;
            }
        }
        rest = &rest[idx + marker.len()..];
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_marker_detection() {
        assert!(body_reports_success(r#"{"success":true}"#));
        assert!(body_reports_success(r#"{"success" : true, "count": 3}"#));
        assert!(body_reports_success("{\n  \"success\"\n  :\n  true\n}"));
    }

    #[test]
    fn test_missing_or_false_marker() {
        assert!(!body_reports_success(r#"{"success":false,"error":"db down"}"#));
        assert!(!body_reports_success(r#"{"ok":true}"#));
        assert!(!body_reports_success(""));
        assert!(!body_reports_success("success: true"));
    }

    #[test]
    fn test_later_marker_still_matches() {
        assert!(body_reports_success(
            r#"{"data":{"success":"pending"},"success": true}"#
        ));
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let transmitter = Transmitter::new("http://example.net/", "r1", "c1").unwrap();
        assert_eq!(transmitter.base_url, "http://example.net");
    }
}
