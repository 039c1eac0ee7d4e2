//! Notifier seam and wire payload
//!
//! The scheduler reports each non-empty reconciled diff through this trait.
//! The `servdisco-notifier-http` crate provides the HTTP POST
//! implementation; tests inject recording doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::diff::Diff;
use crate::error::Result;

/// JSON body sent to the endpoint for each emitted cycle
///
/// ```json
/// {"serverName": "host-1", "diff": {"added": ["a.com"], "removed": []}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPayload {
    /// Identifies the host this daemon runs on
    #[serde(rename = "serverName")]
    pub server_name: String,
    /// Reconciled hostname diff for this cycle
    pub diff: Diff<String>,
}

/// Trait for notifier implementations
///
/// A single attempt per cycle: failures are surfaced as errors for the
/// scheduler to log, never retried within the cycle.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a diff payload to the configured endpoint
    async fn notify(&self, payload: &DiffPayload) -> Result<()>;
}
