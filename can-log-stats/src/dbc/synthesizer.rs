//! Schema synthesis: statistics table -> message definitions

use super::schema::{dbc_frame_id, trimmed_id, MessageDefinition, SignalDefinition};
use crate::config::SynthesisOptions;
use crate::stats::{FrameStats, StatsTable};
use crate::types::parse_can_id;
use std::collections::HashMap;

/// Build one message definition per qualifying ID, in sorted ID order
///
/// An ID is dropped when its average rate falls outside the configured
/// frequency bounds, or when no byte position survives selection. Options
/// that exclude everything yield an empty vector rather than an error.
pub fn synthesize(table: &StatsTable, options: &SynthesisOptions) -> Vec<MessageDefinition> {
    let messages: Vec<MessageDefinition> = table
        .iter()
        .filter_map(|(id, stats)| synthesize_message(id, stats, options))
        .collect();

    for (frame_id, names) in duplicate_frame_ids(&messages) {
        log::warn!(
            "IDs {} all map to DBC frame ID {}; the schema will contain duplicate messages",
            names.join(", "),
            frame_id
        );
    }

    log::info!(
        "Synthesized {} of {} IDs into message definitions",
        messages.len(),
        table.len()
    );
    messages
}

fn synthesize_message(
    id: &str,
    stats: &FrameStats,
    options: &SynthesisOptions,
) -> Option<MessageDefinition> {
    let avg_hz = stats.avg_frequency();
    if !options.accepts_frequency(avg_hz) {
        log::debug!("Skipping ID {}: {:.2} Hz outside frequency bounds", id, avg_hz);
        return None;
    }

    let indices = selected_bytes(stats, options);
    let last = match indices.last() {
        Some(&last) => last,
        None => {
            log::debug!("Skipping ID {}: no byte positions selected", id);
            return None;
        }
    };

    let raw_id = match parse_can_id(id) {
        Some(raw_id) => raw_id,
        None => {
            log::warn!("Skipping ID {}: not a 29-bit hexadecimal identifier", id);
            return None;
        }
    };

    let name = format!("ID_{}", trimmed_id(id));
    let signals = indices
        .iter()
        .map(|&i| SignalDefinition::for_byte(&name, i))
        .collect();

    Some(MessageDefinition {
        frame_id: dbc_frame_id(raw_id),
        name,
        // Gaps left by dropped constant bytes do not shrink the frame
        size: last + 1,
        signals,
    })
}

/// Frame IDs emitted more than once, with the message names sharing each
///
/// Distinct table keys such as "0CF" and "CF" encode to the same DBC ID.
pub fn duplicate_frame_ids(messages: &[MessageDefinition]) -> Vec<(u64, Vec<&str>)> {
    let mut by_id: HashMap<u64, Vec<&str>> = HashMap::new();
    for message in messages {
        by_id.entry(message.frame_id).or_default().push(&message.name);
    }

    let mut duplicates: Vec<(u64, Vec<&str>)> =
        by_id.into_iter().filter(|(_, names)| names.len() > 1).collect();
    duplicates.sort_by_key(|(frame_id, _)| *frame_id);
    duplicates
}

/// Byte positions to emit signals for, ascending
fn selected_bytes(stats: &FrameStats, options: &SynthesisOptions) -> Vec<usize> {
    let count = options.byte_count(stats.bytes_min(), stats.bytes_max());

    stats.byte_stats()[..count]
        .iter()
        .enumerate()
        .filter(|(_, byte)| !options.ignore_constant || !byte.is_constant())
        .map(|(i, _)| i)
        .collect()
}
