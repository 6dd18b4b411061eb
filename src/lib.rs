//! Simsense - data access for atmospheric measurement, retrieval and
//! simulation datasets.
//!
//! Simsense locates dataset files under a directory tree, reads named groups
//! out of them, attaches measurement timestamps and hands the result back as
//! plain records or attribute-style wrappers. Daily profile tables can be
//! exported as CSV for plotting.
//!
//! # Features
//!
//! - Sorted, status-filtered dataset discovery
//! - Measurement windows parsed from records and file names
//! - Date-indexed and name-indexed dataset managers
//! - Nested attribute access with [`Dotted`]
//! - Daily VMR CSV export
//!
//! # Example
//!
//! ```ignore
//! use simsense::{find_dataset_files, RealDataManager, DEFAULT_EXTENSION};
//! use std::path::Path;
//!
//! let paths = find_dataset_files(Path::new("/data/mira2"), DEFAULT_EXTENSION, None)?;
//! let mut manager = RealDataManager::with_source(paths, "mira2_data")?;
//! for (start, record) in manager.to_mapping(None)? {
//!     println!("{} has {} fields", start, record.len());
//! }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod data;
pub mod dotted;
pub mod error;
pub mod export;
pub mod manager;
pub mod time;

pub use config::{AssetLayout, ConfigLoader, Configuration};
pub use data::{
    find_dataset_files, find_dataset_files_with, has_converged, has_retrieval, DataReader,
    FieldMap, MeasurementSchema, Record, RetrievalStatus, StatusFilter, Value, DEFAULT_EXTENSION,
};
pub use dotted::{Attr, Dotted};
pub use error::{Result, SimsenseError};
pub use manager::{RealDataManager, SimulationManager};
pub use time::Timestamp;
