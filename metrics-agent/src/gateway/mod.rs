//! Captive-portal gateway access: the control-utility seam and the
//! session source built on top of it.

mod ndsctl;
mod source;

pub use ndsctl::NdsctlUtility;
pub use source::SessionSource;

use async_trait::async_trait;

use crate::error::Result;

/// Query interface of the portal control utility.
///
/// Production code shells out to the real utility; tests substitute
/// canned output. All three calls return the utility's raw stdout.
#[async_trait]
pub trait ControlUtility: Send + Sync {
    /// Status query output, used for the liveness check.
    async fn status(&self) -> Result<String>;

    /// Structured (JSON) client listing.
    async fn clients_json(&self) -> Result<String>;

    /// Plain-text tabular client listing.
    async fn clients_list(&self) -> Result<String>;
}
