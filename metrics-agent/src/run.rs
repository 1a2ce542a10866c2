//! The single-pass collection pipeline.
//!
//! One invocation walks `gateway check → collect → build → send` once,
//! logging every step boundary. No state survives between invocations;
//! the external scheduler's next run is the retry mechanism.

use portal_common::MetricsPayload;

use crate::gateway::{ControlUtility, SessionSource};
use crate::runlog::RunLogger;
use crate::transmit::Transmitter;

/// Terminal state of a run. Every variant exits 0; fatal conditions
/// (missing config, no transport) are handled before the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Liveness check failed; nothing was collected.
    GatewayDown,
    /// Collection yielded no authenticated clients.
    NoSessions,
    /// Sessions were collected but payload validation dropped them all.
    NothingToSend,
    /// Server acknowledged the payload.
    Sent,
    /// Server was reachable but did not acknowledge success.
    SoftRejected,
    /// Delivery failed at the transport level after retrying.
    TransportFailed,
}

pub async fn run(
    utility: &dyn ControlUtility,
    transmitter: &Transmitter,
    logger: &RunLogger,
) -> RunOutcome {
    let source = SessionSource::new(utility);

    if !source.gateway_running().await {
        tracing::warn!("Portal gateway is not running, skipping collection");
        logger.log("WARN portal gateway not running, nothing to do");
        return RunOutcome::GatewayDown;
    }
    logger.log("gateway check passed");

    let sessions = source.list_active_sessions().await;
    if sessions.is_empty() {
        tracing::info!("No authenticated clients, nothing to report");
        logger.log("no active sessions");
        return RunOutcome::NoSessions;
    }
    logger.log(&format!(
        "collected {} authenticated session(s)",
        sessions.len()
    ));

    let payload = MetricsPayload::from_sessions(&sessions);
    if payload.is_empty() {
        // Collected sessions can still be dropped by payload validation.
        tracing::info!("Payload empty after validation, skipping send");
        logger.log("payload empty after validation, skipping send");
        return RunOutcome::NothingToSend;
    }

    match transmitter.send(&payload).await {
        Ok(result) if result.ok => {
            tracing::info!("Sent {} session update(s)", payload.session_updates.len());
            logger.log(&format!(
                "sent {} session update(s)",
                payload.session_updates.len()
            ));
            RunOutcome::Sent
        }
        Ok(result) => {
            tracing::warn!("Server rejected payload: {}", result.raw_response);
            logger.log(&format!(
                "WARN server rejected payload: {}",
                result.raw_response
            ));
            RunOutcome::SoftRejected
        }
        Err(e) => {
            tracing::error!("Delivery failed: {}", e);
            logger.log(&format!("ERROR delivery failed: {}", e));
            RunOutcome::TransportFailed
        }
    }
}
