//! Container data model, reading and file discovery.
//!
//! This module turns container files into [`Record`]s and finds the files
//! to read under a directory tree.

mod locator;
mod reader;
mod schema;
mod value;

pub use locator::{
    find_dataset_files, find_dataset_files_with, has_converged, has_retrieval, RetrievalStatus,
    StatusFilter, DEFAULT_EXTENSION,
};
pub use reader::{DataReader, CONFIG_FIELD};
pub use schema::{MeasurementSchema, WINDOW_FIELDS};
pub use value::{FieldMap, Record, Value};
