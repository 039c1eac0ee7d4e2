//! Configuration types for the discovery scheduler

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scheduler configuration
///
/// The daemon builds this from environment variables; tests construct it
/// directly with short intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Identifies this daemon's host in emitted diffs
    pub server_name: String,

    /// Sleep between discovery cycles
    pub discovery_interval: Duration,

    /// Number of incremental cycles between full-discovery cycles;
    /// 0 disables full discovery entirely
    #[serde(default)]
    pub full_discovery_ratio: u32,
}

impl SchedulerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.server_name.is_empty() {
            return Err(crate::Error::config("server name cannot be empty"));
        }
        if self.discovery_interval.is_zero() {
            return Err(crate::Error::config("discovery interval must be > 0"));
        }
        Ok(())
    }
}

/// Map a full-discovery interval to a cycle ratio
///
/// Returns 0 (full discovery disabled) when `full_interval` is zero.
/// Otherwise rounds to the nearest whole multiple of `discovery_interval`,
/// never below 1, so a configured full interval always takes effect.
pub fn full_discovery_ratio(discovery_interval: Duration, full_interval: Duration) -> u32 {
    if full_interval.is_zero() || discovery_interval.is_zero() {
        return 0;
    }

    let ratio = (full_interval.as_secs_f64() / discovery_interval.as_secs_f64()).round() as u32;
    ratio.max(1)
}
