//! Control-utility implementation shelling out to the gateway binary.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use super::ControlUtility;
use crate::error::{AgentError, Result};

/// Command-backed control utility (`ndsctl` and compatible tools).
///
/// Every invocation is bounded by the configured query timeout so a
/// wedged gateway process cannot stall the run.
pub struct NdsctlUtility {
    binary: String,
    query_timeout: Duration,
}

impl NdsctlUtility {
    pub fn new(binary: &str, query_timeout: Duration) -> Self {
        Self {
            binary: binary.to_string(),
            query_timeout,
        }
    }

    async fn run(&self, arg: &str) -> Result<String> {
        let output = timeout(self.query_timeout, Command::new(&self.binary).arg(arg).output())
            .await
            .map_err(|_| AgentError::Query(format!("{} {} timed out", self.binary, arg)))?
            .map_err(|e| {
                AgentError::Query(format!("{} {} could not be spawned: {}", self.binary, arg, e))
            })?;

        if !output.status.success() {
            return Err(AgentError::Query(format!(
                "{} {} exited with {}",
                self.binary, arg, output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ControlUtility for NdsctlUtility {
    async fn status(&self) -> Result<String> {
        self.run("status").await
    }

    async fn clients_json(&self) -> Result<String> {
        self.run("json").await
    }

    async fn clients_list(&self) -> Result<String> {
        self.run("clients").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_a_query_error() {
        let utility = NdsctlUtility::new(
            "/nonexistent/ndsctl-for-tests",
            Duration::from_secs(1),
        );
        let err = utility.status().await.unwrap_err();
        assert!(matches!(err, AgentError::Query(_)));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_failing_command_is_a_query_error() {
        let utility = NdsctlUtility::new("false", Duration::from_secs(1));
        assert!(matches!(
            utility.status().await,
            Err(AgentError::Query(_))
        ));
    }

    #[tokio::test]
    async fn test_stdout_is_returned() {
        // `echo` ignores its argument semantics here; we only care that
        // stdout comes back through the adapter.
        let utility = NdsctlUtility::new("echo", Duration::from_secs(1));
        let out = utility.status().await.unwrap();
        assert_eq!(out.trim(), "status");
    }
}
