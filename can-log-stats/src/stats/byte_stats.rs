//! Per-position byte statistics

use serde::Serialize;

/// Value range observed at one payload byte position of one CAN ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteStats {
    min: u8,
    max: u8,
    range: u8,
}

impl ByteStats {
    /// Start tracking from the first observed value
    pub fn new(value: u8) -> Self {
        Self {
            min: value,
            max: value,
            range: 0,
        }
    }

    /// Fold another observation into the running min/max
    pub fn update(&mut self, value: u8) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.range = self.max - self.min;
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    /// `max - min`
    pub fn range(&self) -> u8 {
        self.range
    }

    /// True if every observation had the same value
    pub fn is_constant(&self) -> bool {
        self.range == 0
    }
}
