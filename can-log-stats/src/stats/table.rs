//! Statistics table: one [`FrameStats`] per arbitration ID
//!
//! The table is filled in a single forward pass over the frame records and is
//! read-only afterwards. Keys are the ID strings exactly as they appear in the
//! log, and iteration is always in lexicographic key order.

use super::frame_stats::FrameStats;
use crate::types::{FrameRecord, Result, StatsError};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Mapping from CAN ID to its aggregated statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatsTable {
    entries: BTreeMap<String, FrameStats>,
}

impl StatsTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a stream of parsed records into a table
    ///
    /// The first error from the parser aborts the build; statistics from a
    /// truncated pass would be misleading.
    pub fn build<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<FrameRecord>>,
    {
        let mut table = Self::new();
        let mut frames = 0usize;

        for record in records {
            table.insert(&record?);
            frames += 1;
        }

        table.report_degenerate_timing();
        log::info!("Built statistics for {} IDs from {} frames", table.len(), frames);
        Ok(table)
    }

    /// Fold already-parsed records into a table
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FrameRecord>,
    {
        let table = Self::fold(records);
        table.report_degenerate_timing();
        table
    }

    fn fold<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FrameRecord>,
    {
        let mut table = Self::new();
        for record in records {
            table.insert(record);
        }
        table
    }

    /// Warn once per ID whose timestamps yield no usable rate
    fn report_degenerate_timing(&self) {
        for stats in self.entries.values().filter(|s| s.has_degenerate_timing()) {
            log::warn!(
                "ID {} has {} messages but no usable elapsed time, reporting 0 Hz",
                stats.id(),
                stats.message_count()
            );
        }
    }

    /// IDs with several frames whose timestamps span no usable time
    pub fn degenerate_timing_ids(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, stats)| stats.has_degenerate_timing())
            .map(|(id, _)| id)
            .collect()
    }

    /// Build the same table as [`StatsTable::from_records`] using several threads
    ///
    /// Records are sharded by ID, so every ID is still folded in input order
    /// by exactly one worker. Shard tables are then merged by map union.
    pub fn build_sharded(records: &[FrameRecord], shards: usize) -> Result<Self> {
        let shards = shards.max(1);
        if shards == 1 {
            return Ok(Self::from_records(records));
        }

        let mut partitions: Vec<Vec<&FrameRecord>> = vec![Vec::new(); shards];
        for record in records {
            partitions[shard_of(&record.id, shards)].push(record);
        }

        log::debug!("Building statistics over {} shards", shards);

        let tables: Vec<StatsTable> = partitions
            .into_par_iter()
            .map(|partition| Self::fold(partition))
            .collect();

        let mut merged = Self::new();
        for table in tables {
            merged.merge(table)?;
        }
        merged.report_degenerate_timing();

        log::info!(
            "Built statistics for {} IDs from {} frames ({} shards)",
            merged.len(),
            records.len(),
            shards
        );
        Ok(merged)
    }

    /// Fold one record into the entry for its ID
    pub fn insert(&mut self, record: &FrameRecord) {
        log::trace!("Frame {} @ {:.6}: {} bytes", record.id, record.timestamp, record.dlc());

        match self.entries.get_mut(&record.id) {
            Some(stats) => stats.update(record.timestamp, &record.payload),
            None => {
                self.entries.insert(
                    record.id.clone(),
                    FrameStats::new(record.id.clone(), record.timestamp, &record.payload),
                );
            }
        }
    }

    /// Union with a table built from a disjoint set of IDs
    ///
    /// Fails if both tables hold the same ID, since one ID's statistics must
    /// come from a single ordered pass.
    pub fn merge(&mut self, other: StatsTable) -> Result<()> {
        if let Some(id) = other.entries.keys().find(|id| self.entries.contains_key(*id)) {
            return Err(StatsError::MergeConflict(id.clone()));
        }
        self.entries.extend(other.entries);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&FrameStats> {
        self.entries.get(id)
    }

    /// Entries in lexicographic ID order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrameStats)> {
        self.entries.iter().map(|(id, stats)| (id.as_str(), stats))
    }

    /// Number of distinct IDs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of frames folded into the table
    pub fn total_messages(&self) -> u64 {
        self.entries.values().map(FrameStats::message_count).sum()
    }
}

fn shard_of(id: &str, shards: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    (hasher.finish() % shards as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: f64, id: &str, payload: &[u8]) -> FrameRecord {
        FrameRecord::new(timestamp, id, payload.to_vec())
    }

    fn sample_records() -> Vec<FrameRecord> {
        vec![
            record(0.00, "123", &[0x00, 0x10]),
            record(0.01, "7FF", &[0xFF]),
            record(0.02, "123", &[0x05, 0x10, 0x01]),
            record(0.03, "18FEF100", &[1, 2, 3, 4, 5, 6, 7, 8]),
            record(0.04, "123", &[0x02]),
            record(0.05, "7FF", &[0xFE]),
            record(0.06, "001", &[]),
        ]
    }

    #[test]
    fn test_build_counts_per_id() {
        let records = sample_records();
        let table = StatsTable::build(records.iter().cloned().map(Ok)).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.total_messages(), records.len() as u64);

        let stats = table.get("123").unwrap();
        assert_eq!(stats.message_count(), 3);
        assert_eq!(stats.bytes_min(), 1);
        assert_eq!(stats.bytes_max(), 3);
        assert_eq!(stats.start_time(), 0.00);
        assert_eq!(stats.end_time(), 0.04);

        for (_, stats) in table.iter() {
            assert!(stats.bytes_min() <= stats.bytes_max());
            assert_eq!(stats.byte_stats().len(), stats.bytes_max());
        }
    }

    #[test]
    fn test_iteration_is_sorted() {
        let table = StatsTable::from_records(&sample_records());
        let ids: Vec<&str> = table.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["001", "123", "18FEF100", "7FF"]);
    }

    #[test]
    fn test_ids_are_format_preserving() {
        let records = vec![record(0.0, "0x1", &[1]), record(0.1, "01", &[1]), record(0.2, "1", &[1])];
        let table = StatsTable::from_records(&records);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_build_aborts_on_malformed_record() {
        let input = vec![
            Ok(record(0.0, "123", &[1])),
            Err(StatsError::MalformedRecord {
                line: 2,
                reason: "missing '#'".into(),
            }),
            Ok(record(0.2, "123", &[2])),
        ];

        match StatsTable::build(input) {
            Err(StatsError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed record error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_empty_input() {
        let table = StatsTable::build(Vec::<Result<FrameRecord>>::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.total_messages(), 0);
    }

    #[test]
    fn test_sharded_build_matches_sequential() {
        let records = sample_records();
        let sequential = StatsTable::from_records(&records);

        for shards in [0, 1, 2, 3, 8] {
            let sharded = StatsTable::build_sharded(&records, shards).unwrap();
            assert_eq!(sharded, sequential, "shards = {}", shards);
        }
    }

    #[test]
    fn test_merge_rejects_overlapping_ids() {
        let mut left = StatsTable::from_records(&[record(0.0, "123", &[1])]);
        let right = StatsTable::from_records(&[record(1.0, "123", &[2])]);
        match left.merge(right) {
            Err(StatsError::MergeConflict(id)) => assert_eq!(id, "123"),
            other => panic!("expected merge conflict, got {:?}", other),
        }

        let disjoint = StatsTable::from_records(&[record(1.0, "456", &[2])]);
        left.merge(disjoint).unwrap();
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn test_degenerate_timing_ids() {
        let records = vec![
            record(2.0, "100", &[1]),
            record(2.0, "100", &[2]),
            record(f64::NAN, "200", &[1]),
            record(1.0, "200", &[1]),
            record(0.0, "300", &[1]),
            record(1.0, "300", &[1]),
            record(5.0, "400", &[1]),
        ];
        let table = StatsTable::from_records(&records);
        assert_eq!(table.degenerate_timing_ids(), vec!["100", "200"]);

        let sharded = StatsTable::build_sharded(&records, 4).unwrap();
        assert_eq!(sharded.degenerate_timing_ids(), vec!["100", "200"]);
    }

    #[test]
    fn test_table_serializes_as_map() {
        let table = StatsTable::from_records(&[record(0.0, "123", &[7])]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["123"]["message_count"], 1);
        assert_eq!(json["123"]["byte_stats"][0]["max"], 7);
    }
}
