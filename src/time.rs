//! Timestamp parsing, date ranges and epoch conversion.
//!
//! Records carry their measurement window as four text fields
//! (`start_date`, `start_time`, `end_date`, `end_time`); dataset files carry
//! their acquisition time in the trailing 19 characters of the file stem.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};

use crate::data::{Record, Value};
use crate::error::{Result, SimsenseError};

/// Canonical timestamp: calendar date plus time of day, no time zone.
pub type Timestamp = NaiveDateTime;

/// Format of `"{date} {time}"` pairs stored inside records.
pub const RECORD_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Format of the timestamp suffix of dataset file names.
pub const FILENAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Length of the timestamp suffix of dataset file names.
pub const FILENAME_STAMP_LEN: usize = 19;

/// Field holding the parsed start of the measurement window.
pub const MEASUREMENT_START: &str = "measurement_start";

/// Field holding the parsed end of the measurement window.
pub const MEASUREMENT_END: &str = "measurement_end";

/// Parse the measurement window of `record` into two timestamps.
pub fn measurement_window(record: &Record) -> Result<(Timestamp, Timestamp)> {
    let start = parse_pair(record, "start_date", "start_time")?;
    let end = parse_pair(record, "end_date", "end_time")?;
    Ok((start, end))
}

/// Add `measurement_start` and `measurement_end` to `record`.
pub fn parse_record_timestamps(record: &mut Record) -> Result<()> {
    let (start, end) = measurement_window(record)?;
    record.insert(MEASUREMENT_START, Value::Timestamp(start));
    record.insert(MEASUREMENT_END, Value::Timestamp(end));
    Ok(())
}

fn parse_pair(record: &Record, date_key: &str, time_key: &str) -> Result<Timestamp> {
    let date = text_field(record, date_key)?;
    let time = text_field(record, time_key)?;
    let joined = format!("{} {}", date, time);
    NaiveDateTime::parse_from_str(&joined, RECORD_FORMAT)
        .map_err(|e| SimsenseError::parse(joined, e.to_string()))
}

fn text_field<'a>(record: &'a Record, key: &str) -> Result<&'a str> {
    let value = record
        .get(key)
        .ok_or_else(|| SimsenseError::parse(key, "field is missing"))?;
    let bytes = value
        .as_bytes()
        .ok_or_else(|| SimsenseError::parse(key, "field is not text"))?;
    std::str::from_utf8(bytes).map_err(|e| SimsenseError::parse(key, e.to_string()))
}

/// Parse the timestamp suffix of a single dataset file name.
pub fn parse_timestamp_from_path(path: &Path) -> Result<Timestamp> {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy())
        .ok_or_else(|| SimsenseError::parse(path.display().to_string(), "no file name"))?;
    let stem: &str = match file_name.split_once('.') {
        Some((stem, _)) => stem,
        None => &file_name,
    };

    let n_chars = stem.chars().count();
    if n_chars < FILENAME_STAMP_LEN {
        return Err(SimsenseError::parse(
            stem.to_string(),
            format!("shorter than {} characters", FILENAME_STAMP_LEN),
        ));
    }

    let suffix: String = stem.chars().skip(n_chars - FILENAME_STAMP_LEN).collect();
    NaiveDateTime::parse_from_str(&suffix, FILENAME_FORMAT)
        .map_err(|e| SimsenseError::parse(suffix, e.to_string()))
}

/// Parse one timestamp per path, preserving order.
pub fn parse_timestamps_from_paths(paths: &[PathBuf]) -> Result<Vec<Timestamp>> {
    paths.iter().map(|p| parse_timestamp_from_path(p)).collect()
}

/// Inclusive sequence of days from `start` to `end`.
///
/// Empty when `start > end`.
pub fn date_range(start: Timestamp, end: Timestamp) -> Vec<Timestamp> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        current += Duration::days(1);
    }
    days
}

/// Unix epoch seconds for each timestamp, read as UTC.
pub fn to_epoch_seconds(timestamps: &[Timestamp]) -> Vec<f64> {
    timestamps
        .iter()
        .map(|t| {
            let utc = t.and_utc();
            utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9
        })
        .collect()
}
