//! DBC text rendering
//!
//! Produces the fixed preamble followed by one block per message definition.
//! Each block is preceded by a blank line.

use super::schema::{MessageDefinition, SignalDefinition};
use crate::types::Result;
use std::io::Write;

/// Placeholder used for the version string and node names
pub const DEFAULT_PLACEHOLDER: &str = "TODO";

/// New-symbol keywords listed in the `NS_` section
const NEW_SYMBOLS: [&str; 28] = [
    "BA_",
    "BA_DEF_",
    "BA_DEF_DEF_",
    "BA_DEF_DEF_REL_",
    "BA_DEF_REL_",
    "BA_DEF_SGTYPE_",
    "BA_REL_",
    "BA_SGTYPE_",
    "BO_TX_BU_",
    "BU_BO_REL_",
    "BU_EV_REL_",
    "BU_SG_REL_",
    "CAT_",
    "CAT_DEF_",
    "CM_",
    "ENVVAR_DATA_",
    "EV_DATA_",
    "FILTER",
    "NS_DESC_",
    "SGTYPE_",
    "SGTYPE_VAL_",
    "SG_MUL_VAL_",
    "SIGTYPE_VALTYPE_",
    "SIG_GROUP_",
    "SIG_TYPE_REF_",
    "SIG_VALTYPE_",
    "VAL_",
    "VAL_TABLE_",
];

/// Renders message definitions as a DBC file
#[derive(Debug, Clone)]
pub struct DbcWriter {
    version: String,
    node: String,
}

impl Default for DbcWriter {
    fn default() -> Self {
        Self {
            version: DEFAULT_PLACEHOLDER.to_string(),
            node: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl DbcWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the `VERSION` string
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Builder method: set the node used in `BU_`, as transmitter and as receiver
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = node.into();
        self
    }

    /// Write the preamble and every message block
    pub fn write_to<W: Write>(&self, out: &mut W, messages: &[MessageDefinition]) -> Result<()> {
        self.write_preamble(out)?;
        for message in messages {
            writeln!(out)?;
            self.write_message(out, message)?;
        }
        Ok(())
    }

    /// Render into a string
    pub fn render(&self, messages: &[MessageDefinition]) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, messages)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn write_preamble<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "VERSION \"{}\"", self.version)?;
        writeln!(out)?;
        writeln!(out, "NS_ :")?;
        for symbol in NEW_SYMBOLS {
            writeln!(out, "    {}", symbol)?;
        }
        writeln!(out)?;
        writeln!(out, "BS_:")?;
        writeln!(out)?;
        writeln!(out, "BU_: {}", self.node)?;
        Ok(())
    }

    fn write_message<W: Write>(&self, out: &mut W, message: &MessageDefinition) -> Result<()> {
        writeln!(
            out,
            "BO_ {} {}: {} {}",
            message.frame_id, message.name, message.size, self.node
        )?;
        for signal in &message.signals {
            self.write_signal(out, signal)?;
        }
        Ok(())
    }

    fn write_signal<W: Write>(&self, out: &mut W, signal: &SignalDefinition) -> Result<()> {
        writeln!(
            out,
            "    SG_ {}: {}|{}@{}{} ({}, {}) [{}|{}] \"\" {}",
            signal.name,
            signal.start_bit,
            signal.length,
            signal.byte_order.dbc_code(),
            signal.value_type.dbc_code(),
            signal.factor,
            signal.offset,
            signal.min,
            signal.max,
            self.node
        )?;
        Ok(())
    }
}
