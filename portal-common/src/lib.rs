//! Portal Metrics Common Types
//!
//! Shared types used by the metrics agent: the per-run session snapshot
//! and the wire schema accepted by the remote metrics service.

pub mod metrics;
pub mod session;

pub use metrics::{DataUsage, MetricsPayload, SessionUpdate};
pub use session::ClientSession;
