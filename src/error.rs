//! Error types for Simsense.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Simsense operations.
pub type Result<T> = std::result::Result<T, SimsenseError>;

/// Errors that can occur in Simsense.
#[derive(Debug, Error)]
pub enum SimsenseError {
    /// Text could not be parsed into a timestamp.
    #[error("Failed to parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// A requested group is not present in a container file.
    #[error("Group '{name}' not found in {}", path.display())]
    GroupNotFound { name: String, path: PathBuf },

    /// A record or configuration lacks a required field.
    #[error("Field not found: {name}")]
    FieldNotFound { name: String },

    /// A simulation name is not known to the manager.
    #[error("Name not found: {name}")]
    NameNotFound { name: String },

    /// Attribute lookup on a [`Dotted`](crate::Dotted) wrapper failed.
    #[error("'Dotted' object has no attribute '{name}'")]
    MissingAttribute { name: String },

    /// Two sequences that must pair up positionally differ in length.
    #[error("Inconsistent size between '{left}' ({left_len}) and '{right}' ({right_len})")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    /// An array does not have the shape an operation needs.
    #[error("Shape error: {0}")]
    Shape(String),

    /// The repository root could not be determined.
    #[error("Repository root lookup failed: {0}")]
    RepoRoot(String),

    /// Failed to read a container file.
    #[error("NetCDF error: {0}")]
    NetCDF(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Malformed configuration document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SimsenseError {
    /// Create a Parse error.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a GroupNotFound error.
    pub fn group_not_found(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::GroupNotFound {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Create a FieldNotFound error.
    pub fn field_not_found(name: impl Into<String>) -> Self {
        Self::FieldNotFound { name: name.into() }
    }

    /// Create a NameNotFound error.
    pub fn name_not_found(name: impl Into<String>) -> Self {
        Self::NameNotFound { name: name.into() }
    }

    /// Create a MissingAttribute error.
    pub fn missing_attribute(name: impl Into<String>) -> Self {
        Self::MissingAttribute { name: name.into() }
    }

    /// Create a LengthMismatch error.
    pub fn length_mismatch(
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    ) -> Self {
        Self::LengthMismatch {
            left,
            left_len,
            right,
            right_len,
        }
    }
}

impl From<netcdf::Error> for SimsenseError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCDF(err.to_string())
    }
}
