//! Error types for the prediction service.

use std::path::PathBuf;

use harmonics::HarmonicsError;
use storage::StoreError;
use thiserror::Error;
use tide_common::{Classify, ErrorClass};

/// Result type for prediction operations.
pub type Result<T> = std::result::Result<T, PredictionError>;

#[derive(Error, Debug)]
pub enum PredictionError {
    /// The request failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// An adjustment table could not be read or parsed.
    #[error("failed to load {kind} table from {}: {message}", path.display())]
    Table {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },

    /// No metadata sampler is configured.
    #[error("bathymetry data not available")]
    MetadataNotConfigured,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Harmonics(#[from] HarmonicsError),

    /// The blocking worker running a prediction failed.
    #[error("prediction task failed: {0}")]
    Task(String),
}

impl PredictionError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        PredictionError::InvalidRequest(msg.into())
    }

    pub fn table(kind: &'static str, path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        PredictionError::Table {
            kind,
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl Classify for PredictionError {
    fn class(&self) -> ErrorClass {
        match self {
            PredictionError::InvalidRequest(_) => ErrorClass::Validation,
            PredictionError::MetadataNotConfigured => ErrorClass::DataUnavailable,
            PredictionError::Store(e) => e.class(),
            PredictionError::Harmonics(e) => e.class(),
            PredictionError::Config(_)
            | PredictionError::Table { .. }
            | PredictionError::Task(_) => ErrorClass::Internal,
        }
    }
}
