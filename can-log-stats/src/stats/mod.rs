//! Online statistics over a stream of CAN frames
//!
//! [`StatsTable`] owns one [`FrameStats`] per arbitration ID, which in turn
//! owns one [`ByteStats`] per observed payload byte position.

pub mod byte_stats;
pub mod frame_stats;
pub mod table;

pub use byte_stats::ByteStats;
pub use frame_stats::{FrameStats, ID_TABLE_HEADER};
pub use table::StatsTable;
