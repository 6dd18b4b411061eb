//! Retrieval configurations and the repository asset layout.
//!
//! Configurations are JSON documents stored under `<root>/assets/configs`.
//! A handful of keys name asset files by bare file name; loading rewrites
//! them into absolute paths below the repository root.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, SimsenseError};

/// Key naming the retrieval group a configuration writes.
pub const FIELDNAME_KEY: &str = "fieldname";

/// Location of the asset tree of a repository checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    root: PathBuf,
}

impl AssetLayout {
    /// Use `root` as the repository root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Ask git for the top-level directory of the current checkout.
    pub fn discover() -> Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .output()?;
        if !output.status.success() {
            return Err(SimsenseError::RepoRoot(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let root = String::from_utf8(output.stdout)
            .map_err(|e| SimsenseError::RepoRoot(e.to_string()))?;
        Ok(Self::new(root.trim_end()))
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory searched for configuration files.
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("assets").join("configs")
    }

    /// Absolute location for a reserved asset key, or `None` for any other key.
    pub fn resolve(&self, key: &str, value: &str) -> Option<String> {
        let root = self.root.display();
        let resolved = match key {
            "abs_lookup" => format!("{}/assets/LUT/{}", root, value),
            "atm_profile" => format!("{}/assets/profiles/{}/{}", root, value, value),
            "p_grid" => format!("{}/assets/general/{}", root, value),
            "f_grid" => format!("{}/general/{}", root, value),
            "lines" => format!("{}/assets/{}/", root, value),
            _ => return None,
        };
        Some(resolved)
    }
}

/// A loaded retrieval configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    name: String,
    values: Map<String, JsonValue>,
}

impl Configuration {
    /// Build a configuration from already-resolved values.
    pub fn new(name: impl Into<String>, values: Map<String, JsonValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// File name the configuration was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    /// String value of `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(JsonValue::as_str)
    }

    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Retrieval group name.
    pub fn fieldname(&self) -> Result<&str> {
        self.get_str(FIELDNAME_KEY)
            .ok_or_else(|| SimsenseError::field_not_found(FIELDNAME_KEY))
    }
}

/// Finds and loads configurations below an [`AssetLayout`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    layout: AssetLayout,
}

impl ConfigLoader {
    /// Create a loader for `layout`.
    pub fn new(layout: AssetLayout) -> Self {
        Self { layout }
    }

    /// The asset layout paths are resolved against.
    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    /// Locate a configuration file by its exact file name.
    pub fn find(&self, name: &str) -> Result<Option<PathBuf>> {
        let dir = self.layout.config_dir();
        if !dir.is_dir() {
            return Ok(None);
        }
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && entry.file_name() == name {
                return Ok(Some(entry.into_path()));
            }
        }
        Ok(None)
    }

    /// Load and resolve a configuration.
    ///
    /// A configuration that cannot be found yields `Ok(None)`.
    pub fn load(&self, name: &str) -> Result<Option<Configuration>> {
        let Some(path) = self.find(name)? else {
            warn!(name, dir = %self.layout.config_dir().display(), "configuration not found");
            return Ok(None);
        };

        let text = fs::read_to_string(&path)?;
        let mut values: Map<String, JsonValue> = serde_json::from_str(&text)?;

        for (key, value) in values.iter_mut() {
            let resolved = value.as_str().and_then(|v| self.layout.resolve(key, v));
            if let Some(resolved) = resolved {
                *value = JsonValue::String(resolved);
            }
        }

        debug!(path = %path.display(), keys = values.len(), "loaded configuration");
        Ok(Some(Configuration::new(name, values)))
    }
}
