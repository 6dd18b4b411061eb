//! Manager for measurement and retrieval files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{ConfigLoader, Configuration};
use crate::data::{DataReader, Record};
use crate::dotted::Dotted;
use crate::error::{Result, SimsenseError};
use crate::time::{self, Timestamp, MEASUREMENT_START};

/// Date-indexed access to measurement or retrieval files.
///
/// `paths` and `timestamps` are parallel: every filter narrows both with
/// the same mask.
#[derive(Debug, Clone)]
pub struct RealDataManager {
    paths: Vec<PathBuf>,
    timestamps: Vec<Timestamp>,
    source: String,
    config: Option<Configuration>,
}

impl RealDataManager {
    /// Create a manager reading group `source` from each path.
    pub fn with_source(paths: Vec<PathBuf>, source: impl Into<String>) -> Result<Self> {
        let timestamps = time::parse_timestamps_from_paths(&paths)?;
        let source = source.into();
        info!(files = paths.len(), source = %source, "created data manager");
        Ok(Self {
            paths,
            timestamps,
            source,
            config: None,
        })
    }

    /// Create a manager from a configuration file name such as
    /// `"retrieval.json"`.
    ///
    /// The source group is the file name up to its first `.`. A
    /// configuration that cannot be found leaves [`config`](Self::config)
    /// empty.
    pub fn with_config(
        paths: Vec<PathBuf>,
        config_name: &str,
        loader: &ConfigLoader,
    ) -> Result<Self> {
        let source = config_name.split('.').next().unwrap_or(config_name);
        let mut manager = Self::with_source(paths, source)?;
        manager.config = loader.load(config_name)?;
        Ok(manager)
    }

    /// Create a manager from either a configuration file name (ending in
    /// `.json`) or a plain source group name.
    pub fn new(paths: Vec<PathBuf>, name: &str, loader: &ConfigLoader) -> Result<Self> {
        if name.ends_with(".json") {
            Self::with_config(paths, name, loader)
        } else {
            Self::with_source(paths, name)
        }
    }

    /// Keep only entries whose mask value is `true`.
    pub fn filter(&mut self, mask: &[bool]) -> Result<()> {
        if mask.len() != self.paths.len() {
            return Err(SimsenseError::length_mismatch(
                "mask",
                mask.len(),
                "paths",
                self.paths.len(),
            ));
        }

        let mut keep = mask.iter().copied();
        self.paths.retain(|_| keep.next().unwrap_or(false));
        let mut keep = mask.iter().copied();
        self.timestamps.retain(|_| keep.next().unwrap_or(false));
        Ok(())
    }

    /// Keep entries dated exactly `start` when `start == stop`, otherwise
    /// entries within `[start, stop]`.
    pub fn filter_by_date(&mut self, start: Timestamp, stop: Timestamp) {
        let mask: Vec<bool> = if start == stop {
            self.timestamps.iter().map(|t| *t == start).collect()
        } else {
            self.timestamps
                .iter()
                .map(|t| *t >= start && *t <= stop)
                .collect()
        };
        let mut keep = mask.iter().copied();
        self.paths.retain(|_| keep.next().unwrap_or(false));
        let mut keep = mask.into_iter();
        self.timestamps.retain(|_| keep.next().unwrap_or(false));
    }

    /// Read every path into a map keyed by measurement start.
    ///
    /// `mask`, when given, narrows the manager first. Records sharing a
    /// measurement start overwrite each other in path order.
    pub fn to_mapping(&mut self, mask: Option<&[bool]>) -> Result<BTreeMap<Timestamp, Record>> {
        if let Some(mask) = mask {
            self.filter(mask)?;
        }

        let mut map = BTreeMap::new();
        for path in &self.paths {
            let record = DataReader::read_record(path, &self.source)?;
            let start = record.timestamp_field(MEASUREMENT_START)?;
            map.insert(start, record);
        }
        Ok(map)
    }

    /// Same as [`to_mapping`](Self::to_mapping) with every record wrapped.
    pub fn to_dotted(&mut self, mask: Option<&[bool]>) -> Result<BTreeMap<Timestamp, Dotted>> {
        Ok(self
            .to_mapping(mask)?
            .into_iter()
            .map(|(t, r)| (t, Dotted::from(r)))
            .collect())
    }

    /// Narrow the manager to `timestamp` and read the wrapped records.
    ///
    /// Returns `None`, leaving the manager untouched, when no path carries
    /// that timestamp.
    pub fn get_dataset_for(
        &mut self,
        timestamp: Timestamp,
    ) -> Result<Option<BTreeMap<Timestamp, Dotted>>> {
        if !self.timestamps.contains(&timestamp) {
            warn!(%timestamp, "no dataset for timestamp");
            return Ok(None);
        }
        self.filter_by_date(timestamp, timestamp);
        self.to_dotted(None).map(Some)
    }

    /// Current paths.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Timestamps parallel to [`paths`](Self::paths).
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// Group read from each file.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Configuration the manager was built from, if any.
    pub fn config(&self) -> Option<&Configuration> {
        self.config.as_ref()
    }
}
