//! candump log parser
//!
//! Parses the replayable log format written by `candump -l`:
//!
//! ```text
//! (1436509052.249713) can0 123#11223344
//! (1436509052.250112) can0 18FEF100#0102030405060708
//! (1436509052.251000) can1 123##1AABBCC      <- CAN-FD, flags nibble 1
//! (1436509052.252000) can0 7DF#R              <- remote frame, no data
//! ```
//!
//! Also converts the human-readable `candump -ta` output into that format.

use super::LogFileParser;
use crate::types::{parse_can_id, FrameRecord, Result, StatsError, MAX_CAN_ID, MAX_PAYLOAD_LEN};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;

/// candump log parser
pub struct CandumpParser;

impl CandumpParser {
    /// Open a candump log and return an iterator over its frames
    pub fn parse(path: &Path) -> Result<CandumpFrameIterator<BufReader<File>>> {
        log::info!("Parsing candump log: {:?}", path);

        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Iterate over frames from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> CandumpFrameIterator<R> {
        CandumpFrameIterator {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

/// Iterator over frames from a candump log
///
/// Blank lines are skipped. Errors carry the 1-based line number.
pub struct CandumpFrameIterator<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> Iterator for CandumpFrameIterator<R> {
    type Item = Result<FrameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            match parse_line(&line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e.at_line(self.line_no))),
            }
        }
    }
}

impl LogFileParser for CandumpFrameIterator<BufReader<File>> {
    fn parse(path: &Path) -> Result<Self> {
        CandumpParser::parse(path)
    }
}

/// Parse one `(<timestamp>) <bus> <id>#<hex-payload>` line
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<FrameRecord>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }

    let (stamp, bus, frame) = match fields.as_slice() {
        [stamp, bus, frame] => (*stamp, *bus, *frame),
        _ => {
            return Err(StatsError::malformed(format!(
                "expected 3 fields '(<timestamp>) <bus> <id>#<data>', found {}",
                fields.len()
            )))
        }
    };

    let timestamp = parse_timestamp(stamp)?;

    let (id, data) = frame
        .split_once('#')
        .ok_or_else(|| StatsError::malformed(format!("missing '#' in frame '{}'", frame)))?;

    if parse_can_id(id).is_none() {
        return Err(StatsError::malformed(format!(
            "invalid CAN ID '{}' (expected hex, at most 0x{:X})",
            id, MAX_CAN_ID
        )));
    }

    let payload = parse_data(data)?;
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(StatsError::malformed(format!(
            "payload of {} bytes exceeds the CAN-FD maximum of {}",
            payload.len(),
            MAX_PAYLOAD_LEN
        )));
    }

    Ok(Some(FrameRecord {
        timestamp,
        bus: bus.to_string(),
        id: id.to_string(),
        payload,
    }))
}

fn parse_timestamp(stamp: &str) -> Result<f64> {
    let inner = stamp
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| StatsError::malformed(format!("timestamp '{}' is not in parentheses", stamp)))?;

    match inner.parse::<f64>() {
        Ok(t) if t.is_finite() => Ok(t),
        _ => Err(StatsError::malformed(format!("invalid timestamp '{}'", inner))),
    }
}

fn parse_data(data: &str) -> Result<Vec<u8>> {
    // CAN-FD: "##<flags><data>"
    if let Some(fd) = data.strip_prefix('#') {
        let mut chars = fd.chars();
        return match chars.next() {
            Some(flags) if flags.is_ascii_hexdigit() => decode_hex(chars.as_str()),
            _ => Err(StatsError::malformed(format!(
                "CAN-FD frame '##{}' is missing its flags nibble",
                fd
            ))),
        };
    }

    // Remote frame: "R" optionally followed by a length digit
    if data.starts_with('R') || data.starts_with('r') {
        return Ok(Vec::new());
    }

    decode_hex(data)
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return Err(StatsError::malformed(format!(
            "payload '{}' has an odd number of hex digits",
            hex
        )));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StatsError::malformed(format!("payload '{}' is not hexadecimal", hex)));
    }

    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let digits = std::str::from_utf8(pair).map_err(|e| StatsError::malformed(e.to_string()))?;
            u8::from_str_radix(digits, 16).map_err(|e| StatsError::malformed(e.to_string()))
        })
        .collect()
}

/// Convert one `candump -ta` line into `candump -l` form
///
/// `(1436509052.249713)  can0  123   [4]  11 22 33 44` becomes
/// `(1436509052.249713) can0 123#11223344`. Returns `Ok(None)` for blank lines.
pub fn convert_ascii_line(line: &str) -> Result<Option<String>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }
    if fields.len() < 4 {
        return Err(StatsError::malformed(format!(
            "expected '(<timestamp>) <bus> <id> [<len>] <bytes>...', found {} fields",
            fields.len()
        )));
    }

    let data: String = fields[4..].concat();
    Ok(Some(format!("{} {} {}#{}", fields[0], fields[1], fields[2], data)))
}

/// Convert a whole `candump -ta` log, returning the number of lines written
pub fn convert_ascii_log<R: BufRead, W: Write>(reader: R, out: &mut W) -> Result<usize> {
    let mut written = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(converted) = convert_ascii_line(&line).map_err(|e| e.at_line(idx + 1))? {
            writeln!(out, "{}", converted)?;
            written += 1;
        }
    }

    log::info!("Converted {} candump lines", written);
    Ok(written)
}
