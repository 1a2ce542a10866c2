//! Portal Metrics Agent - pushes captive-portal data-usage metrics to
//! the remote metrics service, one linear pass per invocation.

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use metrics_agent::config::Config;
use metrics_agent::gateway::NdsctlUtility;
use metrics_agent::run;
use metrics_agent::runlog::RunLogger;
use metrics_agent::transmit::Transmitter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("portal-metrics-agent {}", VERSION);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return ExitCode::SUCCESS;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing configuration is the only failure that can happen before
    // the run log is available, so it goes to stderr.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Failed to load configuration: {}. \
                 Make sure agent.toml exists or set PORTAL__SERVER__BASE_URL, \
                 PORTAL__ROUTER__ID and PORTAL__ROUTER__CONTRACT_ID.",
                e
            );
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        "Starting portal-metrics-agent for router {} against {}",
        config.router.id,
        config.server.base_url
    );

    let logger = RunLogger::new(&config.log.path);
    logger.log("run started");

    let transmitter = match Transmitter::new(
        &config.server.base_url,
        &config.router.id,
        &config.router.contract_id,
    ) {
        Ok(transmitter) => transmitter,
        Err(e) => {
            tracing::error!("{}", e);
            logger.log(&format!("ERROR {}", e));
            return ExitCode::FAILURE;
        }
    };

    let utility = NdsctlUtility::new(
        &config.gateway.control_binary,
        Duration::from_secs(config.gateway.query_timeout_secs),
    );

    let outcome = run::run(&utility, &transmitter, &logger).await;
    tracing::info!("Run finished: {:?}", outcome);
    logger.log(&format!("run finished: {:?}", outcome));

    ExitCode::SUCCESS
}
