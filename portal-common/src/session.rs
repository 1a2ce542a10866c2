//! Client session snapshot types.

use serde::{Deserialize, Serialize};

/// One client observed by the captive-portal gateway at collection time.
///
/// Constructed fresh on every run from the gateway's current snapshot
/// and discarded when the run ends; nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSession {
    pub ip: String,
    /// Informational only, never forwarded to the metrics service.
    #[serde(default)]
    pub mac: String,
    /// Bytes downloaded by the client, post-normalization. Negative
    /// values only occur under malformed gateway output and are
    /// filtered during payload construction.
    pub download_bytes: i64,
    pub upload_bytes: i64,
    #[serde(default)]
    pub duration_secs: u64,
    /// Opaque portal session token.
    #[serde(default)]
    pub token: String,
    /// Session state as reported by the gateway, e.g. "Authenticated".
    pub state: String,
}

impl ClientSession {
    /// Whether this client has completed the captive-portal login flow.
    pub fn is_authenticated(&self) -> bool {
        self.state.eq_ignore_ascii_case("authenticated")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(state: &str) -> ClientSession {
        ClientSession {
            ip: "10.0.0.5".to_string(),
            mac: "aa:bb:cc:dd:ee:ff".to_string(),
            download_bytes: 0,
            upload_bytes: 0,
            duration_secs: 0,
            token: "tok".to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn test_is_authenticated_case_insensitive() {
        assert!(session("Authenticated").is_authenticated());
        assert!(session("authenticated").is_authenticated());
        assert!(session("AUTHENTICATED").is_authenticated());
    }

    #[test]
    fn test_other_states_are_not_authenticated() {
        assert!(!session("Preauthenticated").is_authenticated());
        assert!(!session("Not-Authenticated").is_authenticated());
        assert!(!session("").is_authenticated());
    }
}
