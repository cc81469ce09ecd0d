//! Error types for NetCDF grid access.

use std::path::PathBuf;

use grid_processor::GridError;
use thiserror::Error;
use tide_common::{Classify, ErrorClass};

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF grid access.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// The file could not be opened
    #[error("failed to open NetCDF file {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    /// None of the candidate names matched a usable variable
    #[error("{kind} variable not found (tried: {tried:?})")]
    VariableNotFound { kind: String, tried: Vec<String> },

    /// A coordinate variable is not one-dimensional
    #[error("expected 1D variable '{name}', got {ndims}D")]
    NotOneDimensional { name: String, ndims: usize },

    /// A data variable does not match the coordinate axes in either order
    #[error(
        "dimension mismatch for '{name}': data is {dims:?}, expected [{n_lat}, {n_lon}] or [{n_lon}, {n_lat}]"
    )]
    DimensionMismatch {
        name: String,
        dims: Vec<usize>,
        n_lat: usize,
        n_lon: usize,
    },

    /// The stored element type cannot be widened to f64
    #[error("unsupported data type for '{name}': {vartype}")]
    UnsupportedType { name: String, vartype: String },

    /// The library failed while reading values
    #[error("failed to read '{name}': {message}")]
    Read { name: String, message: String },

    /// The values read do not form a valid grid
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
}

impl NetCdfError {
    pub fn not_found(kind: impl Into<String>, tried: &[&str]) -> Self {
        Self::VariableNotFound {
            kind: kind.into(),
            tried: tried.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn read(name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Read {
            name: name.into(),
            message: err.to_string(),
        }
    }
}

impl Classify for NetCdfError {
    fn class(&self) -> ErrorClass {
        match self {
            NetCdfError::VariableNotFound { .. } => ErrorClass::DataUnavailable,
            NetCdfError::Grid(err) => err.class(),
            _ => ErrorClass::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_lists_candidates() {
        let err = NetCdfError::not_found("latitude", &["lat", "latitude", "y"]);
        assert_eq!(
            err.to_string(),
            r#"latitude variable not found (tried: ["lat", "latitude", "y"])"#
        );
        assert!(err.is_data_unavailable());
    }

    #[test]
    fn test_grid_error_keeps_its_class() {
        let err: NetCdfError = GridError::OutOfBounds {
            x: 5.0,
            y: 5.0,
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        }
        .into();
        assert!(err.is_data_unavailable());

        let err: NetCdfError = GridError::TooFewPoints {
            axis: grid_processor::Axis::X,
            len: 1,
        }
        .into();
        assert_eq!(err.class(), ErrorClass::Internal);
    }
}
