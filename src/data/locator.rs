//! Dataset file discovery.

use std::path::{Path, PathBuf};

use netcdf::AttributeValue;
use tracing::debug;
use walkdir::WalkDir;

use super::DataReader;
use crate::config::Configuration;
use crate::error::Result;

/// Extension of dataset files.
pub const DEFAULT_EXTENSION: &str = ".hdf5";

/// Group attribute that marks a retrieval's convergence state.
const CONVERGENCE_ATTR: &str = "convergence";

/// Retrieval state a file must have to be kept by the locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStatus {
    /// The file contains the configuration's retrieval group.
    Retrieved,
    /// The file contains the retrieval group and it converged.
    Converged,
}

impl RetrievalStatus {
    /// Evaluate this status for one file.
    pub fn check(self, path: &Path, config: &Configuration) -> Result<bool> {
        match self {
            Self::Retrieved => has_retrieval(path, config),
            Self::Converged => Ok(has_retrieval(path, config)? && has_converged(path, config)?),
        }
    }
}

/// A status requirement bound to the configuration it is checked against.
#[derive(Debug, Clone)]
pub struct StatusFilter {
    /// Required state.
    pub status: RetrievalStatus,
    /// Configuration naming the retrieval group.
    pub config: Configuration,
}

impl StatusFilter {
    /// Create a filter.
    pub fn new(status: RetrievalStatus, config: Configuration) -> Self {
        Self { status, config }
    }

    /// Whether `path` satisfies the filter.
    pub fn matches(&self, path: &Path) -> Result<bool> {
        self.status.check(path, &self.config)
    }
}

/// Find every file under `root` whose name ends with `extension`.
///
/// Paths are absolute, unique and sorted by their string form. With a
/// `status` filter only files satisfying it are returned.
pub fn find_dataset_files(
    root: &Path,
    extension: &str,
    status: Option<&StatusFilter>,
) -> Result<Vec<PathBuf>> {
    match status {
        Some(filter) => find_dataset_files_with(root, extension, |p| filter.matches(p)),
        None => find_dataset_files_with(root, extension, |_| Ok(true)),
    }
}

/// Like [`find_dataset_files`], keeping only paths for which `keep`
/// returns `true`.
pub fn find_dataset_files_with<F>(root: &Path, extension: &str, mut keep: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path) -> Result<bool>,
{
    let root = root.canonicalize()?;

    let mut paths = Vec::new();
    for entry in WalkDir::new(&root).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches_extension = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(extension))
            .unwrap_or(false);
        if !matches_extension {
            continue;
        }

        let path = entry.into_path();
        if keep(&path)? {
            debug!(path = %path.display(), "found dataset file");
            paths.push(path);
        } else {
            debug!(path = %path.display(), "skipped dataset file");
        }
    }

    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    paths.dedup();
    Ok(paths)
}

/// Whether the file holds the configuration's retrieval group.
///
/// A missing group is a normal `false`.
pub fn has_retrieval(path: &Path, config: &Configuration) -> Result<bool> {
    let fieldname = config.fieldname()?;
    let file = DataReader::open(path)?;
    DataReader::has_group(&file, fieldname)
}

/// Whether the configuration's retrieval group converged.
///
/// True only when the group carries a numeric `convergence` attribute equal
/// to `0.0`. A missing group or attribute is a normal `false`.
pub fn has_converged(path: &Path, config: &Configuration) -> Result<bool> {
    let fieldname = config.fieldname()?;
    let file = DataReader::open(path)?;

    let Some(group) = file.group(fieldname)? else {
        return Ok(false);
    };
    let Some(attr) = group.attribute(CONVERGENCE_ATTR) else {
        return Ok(false);
    };

    Ok(attr_as_f64(&attr.value()?) == Some(0.0))
}

fn attr_as_f64(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Uchar(v) => Some(f64::from(*v)),
        AttributeValue::Schar(v) => Some(f64::from(*v)),
        AttributeValue::Ushort(v) => Some(f64::from(*v)),
        AttributeValue::Short(v) => Some(f64::from(*v)),
        AttributeValue::Uint(v) => Some(f64::from(*v)),
        AttributeValue::Int(v) => Some(f64::from(*v)),
        AttributeValue::Ulonglong(v) => Some(*v as f64),
        AttributeValue::Longlong(v) => Some(*v as f64),
        AttributeValue::Float(v) => Some(f64::from(*v)),
        AttributeValue::Double(v) => Some(*v),
        AttributeValue::Floats(v) if v.len() == 1 => Some(f64::from(v[0])),
        AttributeValue::Doubles(v) if v.len() == 1 => Some(v[0]),
        AttributeValue::Ints(v) if v.len() == 1 => Some(f64::from(v[0])),
        _ => None,
    }
}
