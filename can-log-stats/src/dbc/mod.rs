//! DBC schema synthesis and rendering
//!
//! [`synthesize`] turns a finished [`StatsTable`] into message definitions
//! with one 8-bit signal per selected payload byte; [`DbcWriter`] renders them.

pub mod schema;
pub mod synthesizer;
pub mod writer;

pub use schema::{
    dbc_frame_id, ByteOrder, MessageDefinition, SignalDefinition, ValueType,
    EXTENDED_FRAME_FLAG, MAX_STANDARD_ID,
};
pub use synthesizer::{duplicate_frame_ids, synthesize};
pub use writer::DbcWriter;

use crate::config::SynthesisOptions;
use crate::stats::StatsTable;
use crate::types::{Result, StatsError};

/// Synthesize and render a DBC file in one step
///
/// Fails with [`StatsError::EmptyTable`] when the table holds no frames or
/// when every ID was filtered out, instead of producing a preamble-only file.
pub fn generate_dbc(
    table: &StatsTable,
    options: &SynthesisOptions,
    writer: &DbcWriter,
) -> Result<String> {
    options.validate()?;

    if table.is_empty() {
        return Err(StatsError::EmptyTable("no CAN frames observed".to_string()));
    }

    let messages = synthesize(table, options);
    if messages.is_empty() {
        return Err(StatsError::EmptyTable(format!(
            "all {} IDs were filtered out",
            table.len()
        )));
    }

    writer.render(&messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameRecord;

    #[test]
    fn test_generate_empty_table() {
        let result = generate_dbc(&StatsTable::new(), &SynthesisOptions::new(), &DbcWriter::new());
        assert!(matches!(result, Err(StatsError::EmptyTable(_))));
    }

    #[test]
    fn test_generate_everything_filtered() {
        let records = vec![
            FrameRecord::new(0.0, "123", vec![1]),
            FrameRecord::new(1.0, "123", vec![1]),
        ];
        let table = StatsTable::from_records(&records);
        let options = SynthesisOptions::new().with_ignore_constant(true);

        match generate_dbc(&table, &options, &DbcWriter::new()) {
            Err(StatsError::EmptyTable(reason)) => assert!(reason.contains("filtered")),
            other => panic!("expected empty table error, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_rejects_invalid_options() {
        let table = StatsTable::from_records(&[FrameRecord::new(0.0, "1", vec![1])]);
        let options = SynthesisOptions::new().with_min_frequency(-5.0);
        assert!(matches!(
            generate_dbc(&table, &options, &DbcWriter::new()),
            Err(StatsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_generate_end_to_end() {
        let records = vec![
            FrameRecord::new(0.0, "002", vec![0x01, 0x02]),
            FrameRecord::new(1.0, "002", vec![0x01, 0x05]),
        ];
        let table = StatsTable::from_records(&records);
        let options = SynthesisOptions::new().with_ignore_constant(true);

        let text = generate_dbc(&table, &options, &DbcWriter::new()).unwrap();
        assert!(text.ends_with(
            "BU_: TODO\n\nBO_ 2 ID_2: 2 TODO\n    SG_ ID_2_B2: 8|8@1+ (1, 0) [0|254] \"\" TODO\n"
        ));
    }
}
