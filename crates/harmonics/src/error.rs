//! Error types for the harmonics crate.

use std::path::PathBuf;

use thiserror::Error;
use tide_common::{Classify, ErrorClass};

/// Errors raised while loading harmonic configuration.
///
/// Synthesis itself never fails; numerically degenerate inputs fall back
/// to documented defaults instead.
#[derive(Error, Debug)]
pub enum HarmonicsError {
    /// The coefficient table file could not be read.
    #[error("failed to read nodal coefficients from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The coefficient table is not valid JSON for the expected schema.
    #[error("invalid nodal coefficient table: {0}")]
    InvalidCoefficients(#[from] serde_json::Error),
}

impl Classify for HarmonicsError {
    fn class(&self) -> ErrorClass {
        match self {
            HarmonicsError::Io { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ErrorClass::DataUnavailable
            }
            _ => ErrorClass::Internal,
        }
    }
}

/// Result type for harmonics operations.
pub type Result<T> = std::result::Result<T, HarmonicsError>;
