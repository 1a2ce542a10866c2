//! Session collection, unifying the control utility's two output shapes.

use portal_common::ClientSession;
use serde::Deserialize;

use super::ControlUtility;
use crate::normalize::normalize_bytes;

/// Marker expected in the status output while the portal is up.
const RUNNING_MARKER: &str = "running";

/// Columns of a tabular client line: ip mac download upload duration token state.
const MIN_TABULAR_FIELDS: usize = 7;

/// Yields the gateway's current authenticated clients, hiding which of
/// the two utility output shapes produced them.
pub struct SessionSource<'a> {
    utility: &'a dyn ControlUtility,
}

impl<'a> SessionSource<'a> {
    pub fn new(utility: &'a dyn ControlUtility) -> Self {
        Self { utility }
    }

    /// Whether the gateway reports the portal as running.
    ///
    /// Any query failure counts as not running; the caller skips
    /// collection entirely in that case.
    pub async fn gateway_running(&self) -> bool {
        match self.utility.status().await {
            Ok(out) => out.to_ascii_lowercase().contains(RUNNING_MARKER),
            Err(e) => {
                tracing::warn!("Status query failed: {}", e);
                false
            }
        }
    }

    /// Collect the currently authenticated client sessions.
    ///
    /// Tries the structured query first and falls back to the tabular
    /// listing. Empty output, an empty client set, or unparseable
    /// garbage all yield an empty list, never an error — downstream
    /// sees "no clients" rather than "collection failed".
    pub async fn list_active_sessions(&self) -> Vec<ClientSession> {
        if let Ok(raw) = self.utility.clients_json().await {
            if let Some(sessions) = parse_structured(&raw) {
                return retain_authenticated(sessions);
            }
            tracing::debug!("Structured listing unusable, falling back to tabular");
        }

        match self.utility.clients_list().await {
            Ok(raw) => retain_authenticated(parse_tabular(&raw)),
            Err(e) => {
                tracing::warn!("Client listing failed: {}", e);
                Vec::new()
            }
        }
    }
}

fn retain_authenticated(mut sessions: Vec<ClientSession>) -> Vec<ClientSession> {
    sessions.retain(ClientSession::is_authenticated);
    sessions
}

// ============================================================================
// Structured shape
// ============================================================================

/// One record of the structured listing. Field names vary slightly
/// between utility versions; counters may be numbers or suffixed
/// strings like "5MB".
#[derive(Debug, Deserialize)]
struct StructuredClient {
    ip: String,
    #[serde(default)]
    mac: String,
    #[serde(default, alias = "downloaded")]
    download: serde_json::Value,
    #[serde(default, alias = "uploaded")]
    upload: serde_json::Value,
    #[serde(default)]
    duration: u64,
    #[serde(default)]
    token: String,
    #[serde(default)]
    state: String,
}

/// Wrapper form of the structured listing.
#[derive(Debug, Deserialize)]
struct StructuredListing {
    clients: Vec<StructuredClient>,
}

fn parse_structured(raw: &str) -> Option<Vec<ClientSession>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let clients: Vec<StructuredClient> = serde_json::from_str(raw)
        .or_else(|_| serde_json::from_str::<StructuredListing>(raw).map(|l| l.clients))
        .ok()?;

    Some(clients.into_iter().map(to_session).collect())
}

fn to_session(client: StructuredClient) -> ClientSession {
    ClientSession {
        ip: client.ip,
        mac: client.mac,
        download_bytes: counter_bytes(&client.download),
        upload_bytes: counter_bytes(&client.upload),
        duration_secs: client.duration,
        token: client.token,
        state: client.state,
    }
}

fn counter_bytes(value: &serde_json::Value) -> i64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => normalize_bytes(s),
        _ => 0,
    }
}

// ============================================================================
// Tabular shape
// ============================================================================

fn parse_tabular(raw: &str) -> Vec<ClientSession> {
    // First line is the header.
    raw.lines().skip(1).filter_map(parse_tabular_line).collect()
}

fn parse_tabular_line(line: &str) -> Option<ClientSession> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_TABULAR_FIELDS {
        // Malformed-line tolerance is intentional.
        return None;
    }

    Some(ClientSession {
        ip: fields[0].to_string(),
        mac: fields[1].to_string(),
        download_bytes: normalize_bytes(fields[2]),
        upload_bytes: normalize_bytes(fields[3]),
        duration_secs: fields[4].parse().unwrap_or(0),
        token: fields[5].to_string(),
        state: fields[6].to_string(),
    })
}
