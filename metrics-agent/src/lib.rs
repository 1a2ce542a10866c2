//! Portal metrics agent internals.
//!
//! The binary wires these pieces into one linear pass per invocation;
//! they are exposed as a library so the pipeline can be exercised in
//! integration tests without a real gateway or metrics server.

pub mod config;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod run;
pub mod runlog;
pub mod transmit;

pub use crate::config::Config;
pub use crate::error::AgentError;
pub use crate::gateway::{ControlUtility, NdsctlUtility, SessionSource};
pub use crate::run::RunOutcome;
pub use crate::runlog::RunLogger;
pub use crate::transmit::{TransmitResult, Transmitter};
