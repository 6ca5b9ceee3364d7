//! Log file format parsers
//!
//! This module contains parsers for CAN log formats. Each parser implements
//! an iterator pattern over [`FrameRecord`] values.

use crate::types::{FrameRecord, Result};
use std::path::Path;

pub mod candump;

// Re-export parser types
pub use candump::{convert_ascii_line, convert_ascii_log, parse_line, CandumpFrameIterator, CandumpParser};

/// Common trait for all log file parsers
///
/// This trait provides a unified interface for parsing different log file formats.
/// Each parser returns an iterator over FrameRecord objects.
pub trait LogFileParser: Iterator<Item = Result<FrameRecord>> + Sized {
    /// Parse a log file and return an iterator over CAN frames
    fn parse(path: &Path) -> Result<Self>;
}
