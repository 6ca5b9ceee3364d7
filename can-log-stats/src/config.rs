//! Schema synthesis configuration
//!
//! These four knobs are the only options that affect which messages and
//! signals the synthesizer emits. Rendering details (version string, node
//! name) belong to [`crate::dbc::DbcWriter`].

use crate::types::{Result, StatsError};
use serde::{Deserialize, Serialize};

/// Filter and selection options for schema synthesis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOptions {
    /// Size each message from the shortest payload seen instead of the longest
    #[serde(default)]
    pub use_min_bytes: bool,

    /// Drop byte positions whose value never changed
    #[serde(default)]
    pub ignore_constant: bool,

    /// Skip IDs whose average rate is below this (Hz)
    #[serde(default)]
    pub min_frequency: Option<f64>,

    /// Skip IDs whose average rate is above this (Hz)
    #[serde(default)]
    pub max_frequency: Option<f64>,
}

impl SynthesisOptions {
    /// Create options with every filter disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: size messages from the shortest observed payload
    pub fn with_min_bytes(mut self, enabled: bool) -> Self {
        self.use_min_bytes = enabled;
        self
    }

    /// Builder method: drop constant byte positions
    pub fn with_ignore_constant(mut self, enabled: bool) -> Self {
        self.ignore_constant = enabled;
        self
    }

    /// Builder method: set the lower frequency bound
    pub fn with_min_frequency(mut self, hz: f64) -> Self {
        self.min_frequency = Some(hz);
        self
    }

    /// Builder method: set the upper frequency bound
    pub fn with_max_frequency(mut self, hz: f64) -> Self {
        self.max_frequency = Some(hz);
        self
    }

    /// Reject bounds that are negative or not finite
    ///
    /// A minimum above the maximum is accepted; it just filters out every ID.
    pub fn validate(&self) -> Result<()> {
        for (name, bound) in [
            ("min_frequency", self.min_frequency),
            ("max_frequency", self.max_frequency),
        ] {
            if let Some(hz) = bound {
                if !hz.is_finite() || hz < 0.0 {
                    return Err(StatsError::InvalidConfig(format!(
                        "{} must be a non-negative number of Hz, got {}",
                        name, hz
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check an average rate against the configured bounds
    ///
    /// Bounds are inclusive: a rate exactly equal to a bound passes. A bound
    /// is disabled only when unset, so `Some(0.0)` still applies.
    pub fn accepts_frequency(&self, avg_hz: f64) -> bool {
        if matches!(self.min_frequency, Some(min) if avg_hz < min) {
            return false;
        }
        if matches!(self.max_frequency, Some(max) if avg_hz > max) {
            return false;
        }
        true
    }

    /// Number of byte positions to consider for an ID
    pub fn byte_count(&self, bytes_min: usize, bytes_max: usize) -> usize {
        if self.use_min_bytes {
            bytes_min
        } else {
            bytes_max
        }
    }
}
