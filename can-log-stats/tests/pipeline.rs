// End-to-end: candump log on disk -> statistics table -> DBC text
use can_log_stats::{dbc, CandumpParser, DbcWriter, StatsError, StatsTable, SynthesisOptions};
use std::io::Write;
use tempfile::NamedTempFile;

const SAMPLE_LOG: &str = "\
(1600000000.000000) can0 002#0102
(1600000000.000000) can0 18FEF100#0000000000000000
(1600000000.500000) can0 0CF#AA
(1600000001.000000) can0 002#0105
(1600000001.000000) can0 18FEF100#0000000000000001
(1600000001.000000) can0 0CF#AB
";

fn write_log(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn build(content: &str) -> can_log_stats::Result<StatsTable> {
    let file = write_log(content);
    let frames = CandumpParser::parse(file.path())?;
    StatsTable::build(frames)
}

#[test]
fn pipeline_statistics() {
    let table = build(SAMPLE_LOG).unwrap();
    assert_eq!(table.len(), 3);

    let stats = table.get("002").unwrap();
    assert_eq!(stats.message_count(), 2);
    assert_eq!(stats.bytes_min(), 2);
    assert_eq!(stats.bytes_max(), 2);
    assert_eq!(stats.avg_frequency(), 2.0);
    assert_eq!(stats.byte_stats()[0].range(), 0);
    assert_eq!(stats.byte_stats()[1].min(), 2);
    assert_eq!(stats.byte_stats()[1].max(), 5);
    assert_eq!(stats.byte_stats()[1].range(), 3);

    // 2 frames over 0.5s
    assert_eq!(table.get("0CF").unwrap().avg_frequency(), 4.0);
}

#[test]
fn pipeline_full_dbc() {
    let table = build(SAMPLE_LOG).unwrap();
    let text = dbc::generate_dbc(&table, &SynthesisOptions::new(), &DbcWriter::new()).unwrap();

    let blocks: Vec<&str> = text.lines().filter(|l| l.starts_with("BO_ ")).collect();
    assert_eq!(
        blocks,
        vec![
            "BO_ 2 ID_2: 2 TODO",
            "BO_ 207 ID_CF: 1 TODO",
            "BO_ 2566844672 ID_18FEF100: 8 TODO",
        ]
    );
    assert_eq!(text.lines().filter(|l| l.trim_start().starts_with("SG_ ")).count(), 11);
}

#[test]
fn pipeline_ignore_constant_and_frequency() {
    let table = build(SAMPLE_LOG).unwrap();
    let options = SynthesisOptions::new()
        .with_ignore_constant(true)
        .with_max_frequency(3.0);

    let text = dbc::generate_dbc(&table, &options, &DbcWriter::new()).unwrap();
    let tail = "BU_: TODO\n\
        \n\
        BO_ 2 ID_2: 2 TODO\n    \
        SG_ ID_2_B2: 8|8@1+ (1, 0) [0|254] \"\" TODO\n\
        \n\
        BO_ 2566844672 ID_18FEF100: 8 TODO\n    \
        SG_ ID_18FEF100_B8: 56|8@1+ (1, 0) [0|254] \"\" TODO\n";
    assert!(text.ends_with(tail), "got:\n{}", text);
}

#[test]
fn pipeline_sharded_matches_sequential() {
    let table = build(SAMPLE_LOG).unwrap();
    let file = write_log(SAMPLE_LOG);
    let records: Vec<_> = CandumpParser::parse(file.path())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(StatsTable::build_sharded(&records, 4).unwrap(), table);
}

#[test]
fn pipeline_malformed_line_aborts() {
    let log = "(0.0) can0 001#01\n(0.1) can0 001-02\n";
    match build(log) {
        Err(StatsError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected malformed record, got {:?}", other),
    }
}

#[test]
fn pipeline_empty_log() {
    let table = build("\n\n").unwrap();
    assert!(table.is_empty());
    assert!(matches!(
        dbc::generate_dbc(&table, &SynthesisOptions::new(), &DbcWriter::new()),
        Err(StatsError::EmptyTable(_))
    ));
}
