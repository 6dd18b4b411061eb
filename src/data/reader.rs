//! Container file reader.

use std::io;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};
use tracing::debug;

use super::{MeasurementSchema, Record, Value};
use crate::error::{Result, SimsenseError};
use crate::time::{self, MEASUREMENT_END, MEASUREMENT_START};

/// Field holding the serialized retrieval configuration; never copied.
pub const CONFIG_FIELD: &str = "config";

/// Reads records out of container files.
///
/// Every call opens the file, copies what it needs into owned values and
/// closes the file before returning.
#[derive(Debug)]
pub struct DataReader;

impl DataReader {
    /// Open a container file.
    pub fn open(path: &Path) -> Result<netcdf::File> {
        if !path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
            .into());
        }
        netcdf::open(path)
            .map_err(|e| SimsenseError::NetCDF(format!("Failed to open {}: {}", path.display(), e)))
    }

    /// Read every field of group `source` plus its measurement window.
    ///
    /// For the measurement schemas the window is parsed from the group's own
    /// fields. Any other source borrows the window of a measurement group in
    /// the same file, and only the two parsed timestamps are added.
    pub fn read_record(path: &Path, source: &str) -> Result<Record> {
        let file = Self::open(path)?;

        let group = file
            .group(source)?
            .ok_or_else(|| SimsenseError::group_not_found(source, path))?;

        let measurement = Self::read_measurement_fields(&file, source)?;

        let mut record = Record::new();
        for var in group.variables() {
            let name = var.name();
            if name == CONFIG_FIELD {
                continue;
            }
            let value = Self::read_value(&var)?;
            record.insert(name, value);
        }

        if MeasurementSchema::from_group_name(source).is_some() {
            time::parse_record_timestamps(&mut record)?;
        } else {
            let (schema, fields) = measurement.ok_or_else(|| {
                let names: Vec<&str> = MeasurementSchema::ALL
                    .iter()
                    .map(|s| s.group_name())
                    .collect();
                SimsenseError::group_not_found(names.join(" or "), path)
            })?;
            let (start, end) = schema.parse_window(&fields)?;
            record.insert(MEASUREMENT_START, Value::Timestamp(start));
            record.insert(MEASUREMENT_END, Value::Timestamp(end));
        }

        debug!(
            path = %path.display(),
            source,
            fields = record.len(),
            "read record"
        );
        Ok(record)
    }

    /// Read every top-level field of a simulation file.
    ///
    /// Nested groups are read recursively into [`Value::Group`].
    pub fn read_simulation(path: &Path) -> Result<Record> {
        let file = Self::open(path)?;

        let mut record = Record::new();
        for var in file.variables() {
            let name = var.name();
            let value = Self::read_value(&var)?;
            record.insert(name, value);
        }
        for group in file.groups()? {
            let name = group.name();
            let nested = Self::read_group(&group)?;
            record.insert(name, Value::Group(nested));
        }

        debug!(path = %path.display(), fields = record.len(), "read simulation");
        Ok(record)
    }

    /// Check whether `name` is a top-level group of an open file.
    pub fn has_group(file: &netcdf::File, name: &str) -> Result<bool> {
        Ok(file.group(name)?.is_some())
    }

    fn read_group(group: &netcdf::Group<'_>) -> Result<Record> {
        let mut record = Record::new();
        for var in group.variables() {
            let name = var.name();
            let value = Self::read_value(&var)?;
            record.insert(name, value);
        }
        for child in group.groups() {
            let name = child.name();
            let nested = Self::read_group(&child)?;
            record.insert(name, Value::Group(nested));
        }
        Ok(record)
    }

    /// Window fields of the last measurement group that is present and is
    /// not `source` itself.
    fn read_measurement_fields(
        file: &netcdf::File,
        source: &str,
    ) -> Result<Option<(MeasurementSchema, Record)>> {
        let mut found = None;
        for schema in MeasurementSchema::ALL {
            let name = schema.group_name();
            if name == source {
                continue;
            }
            let Some(group) = file.group(name)? else {
                continue;
            };

            let mut fields = Record::new();
            for &field in schema.window_fields() {
                let var = group
                    .variable(field)
                    .ok_or_else(|| SimsenseError::field_not_found(format!("{}/{}", name, field)))?;
                fields.insert(field, Self::read_value(&var)?);
            }
            found = Some((schema, fields));
        }
        Ok(found)
    }

    /// Convert one variable into an owned [`Value`].
    pub fn read_value(var: &netcdf::Variable<'_>) -> Result<Value> {
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        match var.vartype() {
            NcVariableType::Char => {
                let mut raw = var.get_raw_values(..)?;
                while raw.last() == Some(&0) {
                    raw.pop();
                }
                Ok(Value::Bytes(raw))
            }
            NcVariableType::String => {
                if !shape.is_empty() {
                    return Err(SimsenseError::NetCDF(format!(
                        "String variable '{}' with shape {:?} is not supported",
                        var.name(),
                        shape
                    )));
                }
                Ok(Value::Bytes(var.get_string(..)?.into_bytes()))
            }
            _ => {
                let data = read_numeric(var, &shape)?;
                if shape.is_empty() {
                    let scalar = data.iter().next().copied().unwrap_or(f64::NAN);
                    Ok(Value::Scalar(scalar))
                } else {
                    Ok(Value::array(data))
                }
            }
        }
    }
}

/// Read a numeric variable of any width into an `f64` array.
fn read_numeric(var: &netcdf::Variable<'_>, shape: &[usize]) -> Result<ArrayD<f64>> {
    macro_rules! widen {
        ($t:ty) => {{
            let values: Vec<$t> = var.get_values(..)?;
            values.into_iter().map(|x| x as f64).collect::<Vec<f64>>()
        }};
    }

    let values = match var.vartype() {
        NcVariableType::Float(FloatType::F64) => widen!(f64),
        NcVariableType::Float(FloatType::F32) => widen!(f32),
        NcVariableType::Int(IntType::I64) => widen!(i64),
        NcVariableType::Int(IntType::I32) => widen!(i32),
        NcVariableType::Int(IntType::I16) => widen!(i16),
        NcVariableType::Int(IntType::I8) => widen!(i8),
        NcVariableType::Int(IntType::U64) => widen!(u64),
        NcVariableType::Int(IntType::U32) => widen!(u32),
        NcVariableType::Int(IntType::U16) => widen!(u16),
        NcVariableType::Int(IntType::U8) => widen!(u8),
        other => {
            return Err(SimsenseError::NetCDF(format!(
                "Unsupported variable type for '{}': {:?}",
                var.name(),
                other
            )))
        }
    };

    ArrayD::from_shape_vec(IxDyn(shape), values)
        .map_err(|e| SimsenseError::Shape(format!("'{}': {}", var.name(), e)))
}
