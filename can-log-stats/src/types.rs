//! Core types for the CAN log statistics library
//!
//! This module defines the record the parsers emit for every log line and the
//! error type shared by the whole pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type used for human-readable output
pub type Timestamp = DateTime<Utc>;

/// Result type for library operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Largest 29-bit extended arbitration ID
pub const MAX_CAN_ID: u32 = 0x1FFF_FFFF;

/// Largest payload of any CAN frame (CAN-FD)
pub const MAX_PAYLOAD_LEN: usize = 64;

/// Numeric value of a hex arbitration ID ("0CF", "18FEF100")
///
/// Leading zeros are ignored. Returns `None` for empty or non-hex strings and
/// for values that do not fit in 29 bits.
pub fn parse_can_id(id: &str) -> Option<u32> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let significant = id.trim_start_matches('0');
    if significant.is_empty() {
        return Some(0);
    }
    if significant.len() > 8 {
        return None;
    }
    u32::from_str_radix(significant, 16)
        .ok()
        .filter(|&raw| raw <= MAX_CAN_ID)
}

/// One decoded log entry
///
/// This is a single CAN frame as read from a candump log, before any
/// aggregation takes place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Seconds as recorded in the log (Unix epoch for `candump -l`)
    pub timestamp: f64,
    /// Interface the frame was captured on (e.g. "can0")
    pub bus: String,
    /// Arbitration ID in hex without "0x", exactly as written in the log
    pub id: String,
    /// Payload bytes (0-8 for classic CAN, up to 64 for CAN-FD)
    pub payload: Vec<u8>,
}

impl FrameRecord {
    /// Create a record with no bus information
    pub fn new(timestamp: f64, id: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            timestamp,
            bus: String::new(),
            id: id.into(),
            payload,
        }
    }

    /// Builder method: set the capture interface
    pub fn with_bus(mut self, bus: impl Into<String>) -> Self {
        self.bus = bus.into();
        self
    }

    /// Number of payload bytes
    pub fn dlc(&self) -> usize {
        self.payload.len()
    }

    /// Convert the epoch-seconds timestamp to a `DateTime<Utc>`
    ///
    /// Returns `None` for negative, non-finite or out-of-range values.
    pub fn datetime(&self) -> Option<Timestamp> {
        if !self.timestamp.is_finite() || self.timestamp < 0.0 {
            return None;
        }
        let secs = self.timestamp.trunc() as i64;
        let nsecs = ((self.timestamp.fract() * 1_000_000_000.0).round() as u32).min(999_999_999);
        DateTime::from_timestamp(secs, nsecs)
    }

    /// Payload as upper-case hex pairs separated by spaces ("01 A2 FF")
    pub fn payload_hex_spaced(&self) -> String {
        self.payload
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Errors that can occur while building statistics or synthesizing a schema
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Nothing to emit: {0}")]
    EmptyTable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot merge statistics: ID {0} is present in both tables")]
    MergeConflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatsError {
    /// Malformed record whose line number is not known yet
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        StatsError::MalformedRecord {
            line: 0,
            reason: reason.into(),
        }
    }

    /// Attach a 1-based line number to a malformed-record error
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            StatsError::MalformedRecord { reason, .. } => StatsError::MalformedRecord { line, reason },
            other => other,
        }
    }
}
