//! Per-ID frame statistics

use super::byte_stats::ByteStats;
use serde::Serialize;
use std::fmt;

/// Running profile of every frame seen for one arbitration ID
///
/// `byte_stats` grows to cover the widest payload ever observed and never
/// shrinks, so `byte_stats.len() == bytes_max` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameStats {
    id: String,
    message_count: u64,
    bytes_min: usize,
    bytes_max: usize,
    start_time: f64,
    end_time: f64,
    byte_stats: Vec<ByteStats>,
}

impl FrameStats {
    /// Seed the profile from the first frame of an ID
    pub fn new(id: impl Into<String>, start_time: f64, payload: &[u8]) -> Self {
        Self {
            id: id.into(),
            message_count: 1,
            bytes_min: payload.len(),
            bytes_max: payload.len(),
            start_time,
            end_time: start_time,
            byte_stats: payload.iter().copied().map(ByteStats::new).collect(),
        }
    }

    /// Fold a later frame of the same ID into the profile
    ///
    /// Timestamps must be non-decreasing per ID; this is not checked.
    pub fn update(&mut self, timestamp: f64, payload: &[u8]) {
        self.message_count += 1;
        self.end_time = timestamp;
        self.bytes_min = self.bytes_min.min(payload.len());
        self.bytes_max = self.bytes_max.max(payload.len());

        for (i, &value) in payload.iter().enumerate() {
            match self.byte_stats.get_mut(i) {
                Some(stats) => stats.update(value),
                None => self.byte_stats.push(ByteStats::new(value)),
            }
        }
    }

    /// Average message rate in Hz
    ///
    /// A single observation carries no rate information and yields 0.0, as
    /// does any span that is not a positive finite number of seconds.
    pub fn avg_frequency(&self) -> f64 {
        if self.message_count <= 1 {
            return 0.0;
        }
        let duration = self.end_time - self.start_time;
        if !duration.is_finite() || duration <= 0.0 {
            return 0.0;
        }
        self.message_count as f64 / duration
    }

    /// Several frames were seen but their timestamps span no usable time
    pub fn has_degenerate_timing(&self) -> bool {
        let duration = self.end_time - self.start_time;
        self.message_count > 1 && !(duration.is_finite() && duration > 0.0)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    /// Shortest payload seen
    pub fn bytes_min(&self) -> usize {
        self.bytes_min
    }

    /// Longest payload seen
    pub fn bytes_max(&self) -> usize {
        self.bytes_max
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// One entry per byte position, dense from 0
    pub fn byte_stats(&self) -> &[ByteStats] {
        &self.byte_stats
    }
}

/// Header rows matching the `Display` layout of [`FrameStats`]
pub const ID_TABLE_HEADER: &str =
    "    ID     | Msg Count | Avg. Frequency\n---------------------------------------";

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:10} | {:9} |  {:6.2}",
            self.id,
            self.message_count,
            self.avg_frequency()
        )
    }
}
