//! Retrieval diagnostics.

use ndarray::{s, Array1, Axis, Ix2};

use crate::data::Record;
use crate::error::{Result, SimsenseError};
use crate::export::PROFILE_LEVELS;

/// Row sums of the averaging kernel over the first [`PROFILE_LEVELS`]
/// levels (the measurement response).
pub fn measurement_response(record: &Record) -> Result<Array1<f64>> {
    let avk = record
        .array_field("avk")?
        .view()
        .into_dimensionality::<Ix2>()
        .map_err(|e| SimsenseError::Shape(format!("'avk': {}", e)))?;

    if avk.nrows() < PROFILE_LEVELS || avk.ncols() < PROFILE_LEVELS {
        return Err(SimsenseError::Shape(format!(
            "'avk' must be at least {}x{}, got {:?}",
            PROFILE_LEVELS,
            PROFILE_LEVELS,
            avk.shape()
        )));
    }

    Ok(avk
        .slice(s![..PROFILE_LEVELS, ..PROFILE_LEVELS])
        .sum_axis(Axis(1)))
}

/// Fit residual `y - yf`.
pub fn residual(record: &Record) -> Result<Array1<f64>> {
    let y = record.array_field("y")?;
    let yf = record.array_field("yf")?;
    if y.shape() != yf.shape() || y.ndim() != 1 {
        return Err(SimsenseError::Shape(format!(
            "'y' {:?} and 'yf' {:?} must be 1-D of equal length",
            y.shape(),
            yf.shape()
        )));
    }
    Ok(y.iter().zip(yf.iter()).map(|(a, b)| a - b).collect())
}
