//! Synthesized message and signal definitions
//!
//! These are the values the synthesizer emits and the writer renders. Every
//! signal covers exactly one payload byte.

use serde::Serialize;

/// Highest identifier that fits the 11-bit standard frame format
pub const MAX_STANDARD_ID: u32 = 0x7FF;

/// Bit set in the DBC message ID field to mark a 29-bit extended frame
pub const EXTENDED_FRAME_FLAG: u64 = 0x8000_0000;

/// Width of every synthesized signal
pub const SIGNAL_BITS: usize = 8;

/// Physical range declared for every synthesized signal
pub const SIGNAL_RANGE: (f64, f64) = (0.0, 254.0);

/// DBC message ID field for a raw arbitration ID
///
/// DBC has no separate extended-frame flag; IDs above the standard range get
/// bit 31 set instead.
pub fn dbc_frame_id(raw_id: u32) -> u64 {
    if raw_id > MAX_STANDARD_ID {
        u64::from(raw_id) + EXTENDED_FRAME_FLAG
    } else {
        u64::from(raw_id)
    }
}

/// ID string with leading zeros removed ("0CF" -> "CF", "000" -> "0")
pub fn trimmed_id(id: &str) -> &str {
    let trimmed = id.trim_start_matches('0');
    if trimmed.is_empty() && !id.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// A synthesized CAN message definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageDefinition {
    /// Value of the DBC ID field (extended flag already applied)
    pub frame_id: u64,
    /// Message name ("ID_<hex>")
    pub name: String,
    /// Declared length in bytes
    pub size: usize,
    /// One signal per retained byte position, ascending
    pub signals: Vec<SignalDefinition>,
}

impl MessageDefinition {
    /// True if the DBC ID field carries the extended frame flag
    pub fn is_extended(&self) -> bool {
        self.frame_id & EXTENDED_FRAME_FLAG != 0
    }
}

/// A synthesized single-byte signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalDefinition {
    /// Signal name ("ID_<hex>_B<n>", 1-based byte label)
    pub name: String,
    /// Start bit in the CAN frame
    pub start_bit: usize,
    /// Length in bits
    pub length: usize,
    pub byte_order: ByteOrder,
    pub value_type: ValueType,
    /// Scale factor to convert raw value to physical value
    pub factor: f64,
    /// Offset to add after scaling
    pub offset: f64,
    /// Minimum physical value
    pub min: f64,
    /// Maximum physical value
    pub max: f64,
}

impl SignalDefinition {
    /// Unsigned 8-bit signal covering payload byte `index`
    pub fn for_byte(message_name: &str, index: usize) -> Self {
        Self {
            name: format!("{}_B{}", message_name, index + 1),
            start_bit: index * SIGNAL_BITS,
            length: SIGNAL_BITS,
            byte_order: ByteOrder::LittleEndian,
            value_type: ValueType::Unsigned,
            factor: 1.0,
            offset: 0.0,
            min: SIGNAL_RANGE.0,
            max: SIGNAL_RANGE.1,
        }
    }
}

/// Byte order for signal extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ByteOrder {
    /// Little-endian (Intel format), `@1` in DBC
    LittleEndian,
    /// Big-endian (Motorola format), `@0` in DBC
    BigEndian,
}

impl ByteOrder {
    pub fn dbc_code(self) -> char {
        match self {
            ByteOrder::LittleEndian => '1',
            ByteOrder::BigEndian => '0',
        }
    }
}

/// Value type for signal interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueType {
    /// Signed integer, `-` in DBC
    Signed,
    /// Unsigned integer, `+` in DBC
    Unsigned,
}

impl ValueType {
    pub fn dbc_code(self) -> char {
        match self {
            ValueType::Signed => '-',
            ValueType::Unsigned => '+',
        }
    }
}
