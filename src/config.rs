//! Probe timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing for the recovery probe loop.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Delay between failed probe attempts in milliseconds.
    pub interval_ms: u64,

    /// Per-attempt request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            timeout_ms: 5_000,
        }
    }
}

impl ProbeConfig {
    pub(crate) fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
