//! Run-loop pacing of the slider coordinator.

use serde::Deserialize;

/// How long the coordinator loop waits between passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Upper bound on waiting for a completion event while a move is in flight.
    pub completion_timeout_ms: u32,

    /// Sleep between passes while nothing is moving.
    pub idle_poll_ms: u32,
}

impl CoordinatorConfig {
    /// Firmware defaults: 100 ms completion wait, 10 ms idle poll.
    pub const DEFAULT: Self = Self {
        completion_timeout_ms: 100,
        idle_poll_ms: 10,
    };
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
