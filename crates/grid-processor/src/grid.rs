//! Rectilinear 2D grid over strictly increasing axes.

use tide_common::GeoBounds;

use crate::axis::{bracket, is_strictly_increasing};
use crate::error::{Axis, GridError, Result};
use crate::interpolation::GridCell;

/// A grid of values over two coordinate axes.
///
/// Values are stored row-major: row `i` corresponds to `y[i]` and column
/// `j` to `x[j]`. For geographic grids `x` is longitude and `y` latitude.
/// Construction validates the grid, so every `Grid2D` satisfies:
///
/// - both axes have at least 2 points and are strictly increasing
/// - `values.len() == x.len() * y.len()`
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    x: Vec<f64>,
    y: Vec<f64>,
    values: Vec<f64>,
}

impl Grid2D {
    /// Create a grid from axes and a row-major value buffer.
    pub fn new(x: Vec<f64>, y: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        let grid = Self { x, y, values };
        grid.validate()?;
        Ok(grid)
    }

    /// Create a grid from one `Vec` per row.
    pub fn from_rows(x: Vec<f64>, y: Vec<f64>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.len() != y.len() {
            return Err(GridError::ShapeMismatch {
                rows: y.len(),
                cols: x.len(),
                actual: rows.iter().map(Vec::len).sum(),
            });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != x.len()) {
            return Err(GridError::RaggedRow {
                row,
                len: r.len(),
                expected: x.len(),
            });
        }
        Self::new(x, y, rows.concat())
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> Result<()> {
        for (axis, coords) in [(Axis::X, &self.x), (Axis::Y, &self.y)] {
            if coords.len() < 2 {
                return Err(GridError::TooFewPoints {
                    axis,
                    len: coords.len(),
                });
            }
        }

        let expected = self.x.len() * self.y.len();
        if self.values.len() != expected {
            return Err(GridError::ShapeMismatch {
                rows: self.y.len(),
                cols: self.x.len(),
                actual: self.values.len(),
            });
        }

        if !is_strictly_increasing(&self.x) {
            return Err(GridError::NotIncreasing { axis: Axis::X });
        }
        if !is_strictly_increasing(&self.y) {
            return Err(GridError::NotIncreasing { axis: Axis::Y });
        }

        Ok(())
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of columns (`x` points).
    pub fn width(&self) -> usize {
        self.x.len()
    }

    /// Number of rows (`y` points).
    pub fn height(&self) -> usize {
        self.y.len()
    }

    /// Value at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        self.values.get(row * self.width() + col).copied()
    }

    /// Geographic extent, treating `x` as longitude and `y` as latitude.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_axes(&self.x, &self.y)
    }

    /// The cell whose corners bracket `(x, y)`.
    pub fn cell_at(&self, x: f64, y: f64) -> Result<GridCell> {
        let (Some(col), Some(row)) = (bracket(&self.x, x), bracket(&self.y, y)) else {
            return Err(self.out_of_bounds(x, y));
        };

        let w = self.width();
        let v = |r: usize, c: usize| self.values[r * w + c];
        Ok(GridCell {
            x0: self.x[col],
            x1: self.x[col + 1],
            y0: self.y[row],
            y1: self.y[row + 1],
            v00: v(row, col),
            v10: v(row, col + 1),
            v01: v(row + 1, col),
            v11: v(row + 1, col + 1),
        })
    }

    /// Bilinear interpolation at `(x, y)`.
    pub fn interpolate_at(&self, x: f64, y: f64) -> Result<f64> {
        self.cell_at(x, y)?.interpolate(x, y)
    }

    fn out_of_bounds(&self, x: f64, y: f64) -> GridError {
        GridError::OutOfBounds {
            x,
            y,
            x_min: self.x[0],
            x_max: self.x[self.x.len() - 1],
            y_min: self.y[0],
            y_max: self.y[self.y.len() - 1],
        }
    }
}
