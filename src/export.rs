//! Daily VMR tables for plotting.
//!
//! Retrieved volume mixing ratio profiles are averaged per calendar day and
//! written as one CSV column per day, next to a mean altitude column. A
//! companion table maps each day to its Unix time.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ndarray::{s, Array1, ArrayD, Axis};
use serde::Serialize;
use tracing::info;

use crate::data::Record;
use crate::error::{Result, SimsenseError};
use crate::time::{self, Timestamp, MEASUREMENT_START};

/// Number of retrieval levels in an exported profile.
pub const PROFILE_LEVELS: usize = 41;

/// Format of day column headers.
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Format of the `datetime` column of the time table.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A priori VMR field, indexed `[species, level, lat, lon]`.
const APRIORI_FIELD: &str = "vmr_field";

/// Retrieved state vector, relative to the a priori.
const STATE_FIELD: &str = "x";

/// Altitude field, indexed `[level, lat, lon]`.
const ALTITUDE_FIELD: &str = "z_field";

/// VMR profile of one retrieval: a priori of the first species scaled by
/// the first [`PROFILE_LEVELS`] state vector entries.
pub fn vmr_profile(record: &Record) -> Result<Array1<f64>> {
    let apriori = column(record.array_field(APRIORI_FIELD)?, APRIORI_FIELD, 4)?;
    let state = record.array_field(STATE_FIELD)?;

    if state.ndim() != 1 || state.len() < PROFILE_LEVELS {
        return Err(SimsenseError::Shape(format!(
            "'{}' must be 1-D with at least {} values, got shape {:?}",
            STATE_FIELD,
            PROFILE_LEVELS,
            state.shape()
        )));
    }
    if apriori.len() != PROFILE_LEVELS {
        return Err(SimsenseError::Shape(format!(
            "'{}' has {} levels, expected {}",
            APRIORI_FIELD,
            apriori.len(),
            PROFILE_LEVELS
        )));
    }

    let state: Array1<f64> = state.iter().take(PROFILE_LEVELS).copied().collect();
    Ok(apriori * state)
}

/// Group VMR profiles by the calendar day of their measurement start.
///
/// Days are returned in first-seen order, with the profiles of each day in
/// record order.
pub fn group_by_day(records: &[Record]) -> Result<(Vec<NaiveDate>, Vec<Vec<Array1<f64>>>)> {
    let mut days: Vec<NaiveDate> = Vec::new();
    let mut grouped: Vec<Vec<Array1<f64>>> = Vec::new();

    for record in records {
        let vmr = vmr_profile(record)?;
        let day = record.timestamp_field(MEASUREMENT_START)?.date();
        match days.iter().position(|d| *d == day) {
            Some(i) => grouped[i].push(vmr),
            None => {
                days.push(day);
                grouped.push(vec![vmr]);
            }
        }
    }
    Ok((days, grouped))
}

/// Mean altitude profile across records.
pub fn mean_altitude(records: &[Record]) -> Result<Array1<f64>> {
    if records.is_empty() {
        return Err(SimsenseError::Shape(
            "no records to derive an altitude profile from".to_string(),
        ));
    }

    let mut sum: Option<Array1<f64>> = None;
    for record in records {
        let z = column(record.array_field(ALTITUDE_FIELD)?, ALTITUDE_FIELD, 3)?;
        sum = Some(match sum {
            None => z,
            Some(acc) if acc.len() == z.len() => acc + z,
            Some(acc) => {
                return Err(SimsenseError::Shape(format!(
                    "'{}' lengths differ: {} vs {}",
                    ALTITUDE_FIELD,
                    acc.len(),
                    z.len()
                )))
            }
        });
    }

    let n = records.len() as f64;
    sum.map(|s| s / n)
        .ok_or_else(|| SimsenseError::Shape("no altitude profiles".to_string()))
}

/// Write `{base}.csv` and `{base}_time.csv` for the days from `start` to
/// `end`.
///
/// Days without records are filled with NaN.
pub fn export_vmr_csv(
    records: &[Record],
    start: Timestamp,
    end: Timestamp,
    base: &Path,
) -> Result<()> {
    let range = time::date_range(start, end);
    let unix_time = time::to_epoch_seconds(&range);
    let (days, grouped) = group_by_day(records)?;

    let daily_means = grouped
        .iter()
        .map(|profiles| {
            let views: Vec<_> = profiles.iter().map(|p| p.view()).collect();
            ndarray::stack(Axis(0), &views)
                .map_err(|e| SimsenseError::Shape(e.to_string()))
                .and_then(|stacked| {
                    stacked
                        .mean_axis(Axis(0))
                        .ok_or_else(|| SimsenseError::Shape("empty day group".to_string()))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let altitude = mean_altitude(records)?;
    if altitude.len() != PROFILE_LEVELS {
        return Err(SimsenseError::Shape(format!(
            "altitude has {} levels, expected {}",
            altitude.len(),
            PROFILE_LEVELS
        )));
    }

    let columns: Vec<Option<&Array1<f64>>> = range
        .iter()
        .map(|t| {
            days.iter()
                .position(|d| *d == t.date())
                .map(|i| &daily_means[i])
        })
        .collect();

    let table_path = with_suffix(base, ".csv");
    let mut writer = csv::Writer::from_path(&table_path)?;

    let mut header: Vec<String> = range
        .iter()
        .map(|t| t.format(DAY_FORMAT).to_string())
        .collect();
    header.push("altitude".to_string());
    writer.write_record(&header)?;

    for level in 0..PROFILE_LEVELS {
        let mut row: Vec<String> = columns
            .iter()
            .map(|c| c.map_or(f64::NAN, |profile| profile[level]).to_string())
            .collect();
        row.push(altitude[level].to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;

    let time_path = with_suffix(base, "_time.csv");
    let mut writer = csv::Writer::from_path(&time_path)?;
    for (index, (t, unix_time)) in range.iter().zip(unix_time).enumerate() {
        writer.serialize(TimeRow {
            index,
            datetime: t.format(DATETIME_FORMAT).to_string(),
            unix_time,
        })?;
    }
    writer.flush()?;

    info!(
        table = %table_path.display(),
        days = range.len(),
        with_data = columns.iter().filter(|c| c.is_some()).count(),
        "wrote VMR tables"
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct TimeRow {
    #[serde(rename = "")]
    index: usize,
    datetime: String,
    unix_time: f64,
}

/// Extract `field[.., 0, 0]` (3-D) or `field[0, .., 0, 0]` (4-D) as a level
/// profile.
fn column(field: &ArrayD<f64>, name: &str, ndim: usize) -> Result<Array1<f64>> {
    let shape = field.shape();
    let fixed_ok = match ndim {
        3 => shape.len() == 3 && shape[1] > 0 && shape[2] > 0,
        4 => shape.len() == 4 && shape[0] > 0 && shape[2] > 0 && shape[3] > 0,
        _ => false,
    };
    if !fixed_ok {
        return Err(SimsenseError::Shape(format!(
            "'{}' must be {}-D, got shape {:?}",
            name, ndim, shape
        )));
    }

    let profile: Array1<f64> = match ndim {
        3 => field.slice(s![.., 0, 0]).iter().copied().collect(),
        _ => field.slice(s![0, .., 0, 0]).iter().copied().collect(),
    };
    Ok(profile)
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
