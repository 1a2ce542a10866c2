//! Outbound wire schema for the metrics endpoint.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::ClientSession;

/// Timestamp format expected by the metrics service.
const LAST_UPDATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Body of the data-usage POST: an ordered sequence of per-client
/// updates. Order is irrelevant to the server but insertion order is
/// preserved for determinism.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsPayload {
    pub session_updates: Vec<SessionUpdate>,
}

/// One wire record, derived 1:1 from a qualifying client session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    #[serde(rename = "userIP")]
    pub user_ip: String,
    /// Always `null` on the wire; the metrics service resolves the
    /// server-side session itself, matching by IP.
    pub session_id: Option<String>,
    pub data_usage: DataUsage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUsage {
    pub download_bytes: i64,
    pub upload_bytes: i64,
    /// Always recomputed as download + upload, never taken from upstream.
    pub total_bytes: i64,
    /// UTC instant of record construction, `YYYY-MM-DDTHH:MM:SSZ`.
    pub last_updated: String,
}

impl SessionUpdate {
    /// Build a wire record from a session, recomputing the total.
    pub fn from_session(session: &ClientSession) -> Self {
        Self {
            user_ip: session.ip.clone(),
            session_id: None,
            data_usage: DataUsage {
                download_bytes: session.download_bytes,
                upload_bytes: session.upload_bytes,
                total_bytes: session.download_bytes + session.upload_bytes,
                last_updated: Utc::now().format(LAST_UPDATED_FORMAT).to_string(),
            },
        }
    }
}

impl MetricsPayload {
    /// Map collected sessions into the outbound payload.
    ///
    /// Skips sessions that are not authenticated, have an empty IP, or
    /// carry a negative byte count (cannot occur post-normalization
    /// under correct inputs, but enforced here anyway). An empty input
    /// yields an empty payload; the caller is responsible for not
    /// transmitting it.
    pub fn from_sessions(sessions: &[ClientSession]) -> Self {
        let session_updates = sessions
            .iter()
            .filter(|s| s.is_authenticated())
            .filter(|s| !s.ip.is_empty())
            .filter(|s| s.download_bytes >= 0 && s.upload_bytes >= 0)
            .map(SessionUpdate::from_session)
            .collect();

        Self { session_updates }
    }

    pub fn is_empty(&self) -> bool {
        self.session_updates.is_empty()
    }
}
