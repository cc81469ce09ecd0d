//! Error classification shared by every crate in the workspace.
//!
//! Each crate owns its concrete error enum; this module only defines how
//! those errors are grouped so that callers can decide between rejecting a
//! request, reporting missing data, or treating the failure as internal.

use std::fmt;

/// Broad class of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Caller supplied an invalid request or configuration.
    Validation,
    /// Requested data does not exist or does not cover the query.
    DataUnavailable,
    /// Anything else (I/O failures, malformed files).
    Internal,
}

impl ErrorClass {
    /// HTTP status code a transport layer should use for this class.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ErrorClass::Validation => 400,
            ErrorClass::DataUnavailable => 404,
            ErrorClass::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Validation => "validation",
            ErrorClass::DataUnavailable => "data_unavailable",
            ErrorClass::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every error type in the workspace.
pub trait Classify {
    fn class(&self) -> ErrorClass;

    fn is_validation(&self) -> bool {
        self.class() == ErrorClass::Validation
    }

    fn is_data_unavailable(&self) -> bool {
        self.class() == ErrorClass::DataUnavailable
    }

    fn http_status_code(&self) -> u16 {
        self.class().http_status_code()
    }
}
