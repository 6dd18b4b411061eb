//! Known measurement schemas.
//!
//! Measurement groups carry their own acquisition window; retrieval groups
//! stored next to them borrow it.

use crate::data::Record;
use crate::error::Result;
use crate::time::{self, Timestamp};

/// Fields holding the measurement window, in read order.
pub const WINDOW_FIELDS: [&str; 4] = ["start_date", "start_time", "end_date", "end_time"];

/// A measurement group layout with a self-describing time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementSchema {
    /// KIMRA radiometer measurements.
    Kimra,
    /// MIRA2 radiometer measurements.
    Mira2,
}

impl MeasurementSchema {
    /// All registered schemas. When several are present in a file, later
    /// entries win.
    pub const ALL: [MeasurementSchema; 2] = [MeasurementSchema::Kimra, MeasurementSchema::Mira2];

    /// Name of the group holding this schema's data.
    pub fn group_name(self) -> &'static str {
        match self {
            Self::Kimra => "kimra_data",
            Self::Mira2 => "mira2_data",
        }
    }

    /// Look up a schema by its group name.
    pub fn from_group_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.group_name() == name)
    }

    /// Names of the fields this schema reads its window from.
    pub fn window_fields(self) -> &'static [&'static str] {
        match self {
            Self::Kimra | Self::Mira2 => &WINDOW_FIELDS,
        }
    }

    /// Parse the measurement window out of fields read with
    /// [`window_fields`](Self::window_fields).
    pub fn parse_window(self, fields: &Record) -> Result<(Timestamp, Timestamp)> {
        match self {
            Self::Kimra | Self::Mira2 => time::measurement_window(fields),
        }
    }
}
