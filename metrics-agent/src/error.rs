//! Error types for the metrics agent.

/// Errors surfaced by agent components.
///
/// Only the fatal variants may terminate the process with a non-zero
/// status. Everything else is absorbed into a log entry so the external
/// scheduler's cadence is never disrupted by a transient failure; the
/// next scheduled invocation is the retry mechanism.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("No HTTP transport available: {0}")]
    TransportUnavailable(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Control utility query failed: {0}")]
    Query(String),
}

impl AgentError {
    /// Whether this error must map to a non-zero process exit.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AgentError::ConfigMissing(_) | AgentError::TransportUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(AgentError::ConfigMissing("server.base_url".to_string()).is_fatal());
        assert!(AgentError::TransportUnavailable("tls".to_string()).is_fatal());
        assert!(!AgentError::Transport("timeout".to_string()).is_fatal());
        assert!(!AgentError::Query("exited with 1".to_string()).is_fatal());
    }
}
