//! Error types for grid processing.

use thiserror::Error;
use tide_common::{Classify, ErrorClass};

/// Which coordinate axis an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("X"),
            Axis::Y => f.write_str("Y"),
        }
    }
}

/// Errors that can occur while building or sampling a grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// An axis has fewer than two coordinates.
    #[error("grid must have at least 2 {axis} coordinates, got {len}")]
    TooFewPoints { axis: Axis, len: usize },

    /// The value buffer does not match the axis lengths.
    #[error("grid values hold {actual} entries, expected {rows} rows x {cols} columns")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        actual: usize,
    },

    /// A row passed to [`crate::Grid2D::from_rows`] has the wrong length.
    #[error("row {row} has {len} values, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Axis coordinates are not strictly increasing.
    #[error("{axis} coordinates must be strictly increasing")]
    NotIncreasing { axis: Axis },

    /// The query point lies outside the grid.
    #[error("point ({x:.6}, {y:.6}) is outside grid range X [{x_min:.6}, {x_max:.6}] Y [{y_min:.6}, {y_max:.6}]")]
    OutOfBounds {
        x: f64,
        y: f64,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },

    /// A cell has degenerate or inverted corners.
    #[error("invalid grid cell: {0}")]
    InvalidCell(String),

    /// The query point lies outside a single cell.
    #[error("{axis} coordinate {value:.6} is outside grid cell [{lo:.6}, {hi:.6}]")]
    OutsideCell {
        axis: Axis,
        value: f64,
        lo: f64,
        hi: f64,
    },

    /// Two grids sampled together do not share dimensions.
    #[error("grids must have the same dimensions: {0}x{1} vs {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),
}

impl GridError {
    /// Create an InvalidCell error.
    pub fn invalid_cell(msg: impl Into<String>) -> Self {
        Self::InvalidCell(msg.into())
    }

    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::OutsideCell { .. })
    }
}

impl Classify for GridError {
    fn class(&self) -> ErrorClass {
        if self.is_out_of_bounds() {
            ErrorClass::DataUnavailable
        } else {
            ErrorClass::Internal
        }
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
