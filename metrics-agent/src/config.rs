//! Configuration for the metrics agent.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration structure for the agent.
///
/// Loaded once at startup and passed by reference to every component;
/// no component reads the process environment directly.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub router: RouterConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the remote metrics service, e.g. "https://metrics.example.net".
    pub base_url: String,
}

/// Opaque identifiers naming this device and its service contract to
/// the metrics service.
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    pub id: String,
    pub contract_id: String,
}

/// How to reach the local captive-portal control utility.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Control utility binary (default: "ndsctl").
    #[serde(default = "default_control_binary")]
    pub control_binary: String,
    /// Upper bound for a single utility query (default: 5 seconds).
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            control_binary: default_control_binary(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Fixed path of the run log (default: /tmp/portal-metrics-agent.log).
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

// Default values
fn default_control_binary() -> String {
    "ndsctl".to_string()
}
fn default_query_timeout() -> u64 {
    5
}
fn default_log_path() -> String {
    "/tmp/portal-metrics-agent.log".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (PORTAL__SECTION__KEY format)
    /// 2. agent.toml file (if present)
    /// 3. Built-in defaults
    ///
    /// The three identifiers under `server` and `router` have no
    /// defaults; missing any of them fails the load, which is the only
    /// fatal condition the agent knows before the run log exists.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Set defaults
            .set_default("gateway.control_binary", default_control_binary())?
            .set_default("gateway.query_timeout_secs", default_query_timeout() as i64)?
            .set_default("log.path", default_log_path())?
            // Load from agent.toml if exists
            .add_source(File::with_name("agent").required(false))
            // Override with environment variables (PORTAL__SECTION__KEY format)
            .add_source(
                Environment::with_prefix("PORTAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
