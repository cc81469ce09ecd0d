//! Error types for constituent sources and metadata samplers.

use std::path::PathBuf;

use grid_processor::GridError;
use netcdf_parser::NetCdfError;
use thiserror::Error;
use tide_common::{Classify, ErrorClass};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The source cannot answer this kind of query.
    #[error("{0}")]
    Unsupported(String),

    /// The station table could not be opened.
    #[error("failed to open constituent file for station {station}: {source}")]
    StationIo {
        station: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The station table is malformed.
    #[error("invalid constituent CSV for station {station}: {message}")]
    InvalidCsv { station: String, message: String },

    #[error("unknown constituent: {0}")]
    UnknownConstituent(String),

    #[error("no constituents found in CSV for station {0}")]
    EmptyStation(String),

    #[error("data directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("failed to read data directory {}: {message}", path.display())]
    Directory { path: PathBuf, message: String },

    #[error("no gridded constituent files found in {}", .0.display())]
    NoGridFiles(PathBuf),

    #[error("no valid constituents found for location ({lat:.4}, {lon:.4})")]
    NoConstituents { lat: f64, lon: f64 },

    /// A constituent grid does not cover the query point.
    #[error("failed to interpolate {constituent} at ({lat:.4}, {lon:.4}): {source}")]
    OutsideCoverage {
        constituent: String,
        lat: f64,
        lon: f64,
        #[source]
        source: GridError,
    },

    #[error("no metadata covers ({lat:.4}, {lon:.4})")]
    NoMetadata { lat: f64, lon: f64 },

    #[error(transparent)]
    NetCdf(#[from] NetCdfError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl StoreError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn invalid_csv(station: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::InvalidCsv {
            station: station.into(),
            message: message.to_string(),
        }
    }
}

impl Classify for StoreError {
    fn class(&self) -> ErrorClass {
        match self {
            StoreError::Unsupported(_) => ErrorClass::Validation,
            StoreError::StationIo { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorClass::DataUnavailable
            }
            StoreError::UnknownConstituent(_)
            | StoreError::EmptyStation(_)
            | StoreError::MissingDirectory(_)
            | StoreError::NoGridFiles(_)
            | StoreError::NoConstituents { .. }
            | StoreError::OutsideCoverage { .. }
            | StoreError::NoMetadata { .. } => ErrorClass::DataUnavailable,
            StoreError::NetCdf(err) => err.class(),
            StoreError::Grid(err) => err.class(),
            _ => ErrorClass::Internal,
        }
    }
}
