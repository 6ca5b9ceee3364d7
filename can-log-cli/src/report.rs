//! Text and JSON reports over a CAN log

use anyhow::Result;
use can_log_stats::stats::ID_TABLE_HEADER;
use can_log_stats::{FrameRecord, StatsTable};
use chrono::SecondsFormat;
use std::io::Write;

/// One row per ID, sorted by ID
pub fn write_id_table<W: Write>(out: &mut W, table: &StatsTable) -> Result<()> {
    writeln!(out, "{}", ID_TABLE_HEADER)?;
    for (_, stats) in table.iter() {
        writeln!(out, "{}", stats)?;
    }
    Ok(())
}

/// The whole statistics table as pretty-printed JSON
pub fn write_id_json<W: Write>(out: &mut W, table: &StatsTable) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, table)?;
    writeln!(out)?;
    Ok(())
}

/// One line per frame of a single ID: `<timestamp> - <bytes>`
///
/// With `absolute`, timestamps are rendered as RFC 3339 instead of seconds.
/// Returns the number of frames written.
pub fn write_messages<W, I>(out: &mut W, records: I, id: &str, absolute: bool) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = can_log_stats::Result<FrameRecord>>,
{
    let mut count = 0;

    for record in records {
        let record = record?;
        if record.id != id {
            continue;
        }

        let stamp = match record.datetime() {
            Some(dt) if absolute => dt.to_rfc3339_opts(SecondsFormat::Micros, true),
            _ => format!("{:.6}", record.timestamp),
        };
        writeln!(out, "{} - {}", stamp, record.payload_hex_spaced())?;
        count += 1;
    }

    Ok(count)
}
