//! Manager for simulation output files.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::{find_dataset_files, DataReader, FieldMap, Record, DEFAULT_EXTENSION};
use crate::dotted::Dotted;
use crate::error::{Result, SimsenseError};

/// Name-indexed access to every simulation file under a directory.
#[derive(Debug, Clone)]
pub struct SimulationManager {
    root: PathBuf,
    paths: Vec<PathBuf>,
    names: Option<Vec<String>>,
}

impl SimulationManager {
    /// Locate all dataset files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let paths = find_dataset_files(&root, DEFAULT_EXTENSION, None)?;
        info!(root = %root.display(), files = paths.len(), "created simulation manager");
        Ok(Self {
            root,
            paths,
            names: None,
        })
    }

    /// Read every file into a map keyed by simulation name.
    pub fn to_mapping(&self) -> Result<FieldMap<Record>> {
        self.pairs()?
            .into_iter()
            .map(|(name, path)| Ok((name, DataReader::read_simulation(path)?)))
            .collect()
    }

    /// Read every file into one wrapper with a nested wrapper per name.
    pub fn to_dotted(&self) -> Result<Dotted> {
        let mut dotted = Dotted::new();
        for (name, path) in self.pairs()? {
            let record = DataReader::read_simulation(path)?;
            dotted.set(name, Dotted::from(record));
        }
        Ok(dotted)
    }

    /// Read the simulation called `name`.
    pub fn get(&self, name: &str) -> Result<Record> {
        let mut mapping = self.to_mapping()?;
        mapping
            .get_mut(name)
            .map(std::mem::take)
            .ok_or_else(|| SimsenseError::name_not_found(name))
    }

    /// Derive names from file names and remember them.
    pub fn infer_names(&mut self) -> &[String] {
        let names = self.paths.iter().map(|p| name_from_path(p)).collect();
        self.names.insert(names)
    }

    /// Use explicit names, paired with paths by position.
    pub fn set_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
    }

    /// Explicit or inferred names, if set.
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Located paths, sorted.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Directory the manager searched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn pairs(&self) -> Result<Vec<(String, &Path)>> {
        match &self.names {
            None => Ok(self
                .paths
                .iter()
                .map(|p| (name_from_path(p), p.as_path()))
                .collect()),
            Some(names) => {
                if names.len() != self.paths.len() {
                    return Err(SimsenseError::length_mismatch(
                        "names",
                        names.len(),
                        "paths",
                        self.paths.len(),
                    ));
                }
                Ok(names
                    .iter()
                    .cloned()
                    .zip(self.paths.iter().map(PathBuf::as_path))
                    .collect())
            }
        }
    }
}

/// File name up to its first `.`.
fn name_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((name, _)) => name.to_string(),
        None => file_name,
    }
}
