//! Bilinear interpolation within a single grid cell.

use crate::error::{Axis, GridError, Result};
use crate::grid::Grid2D;

/// Tolerance for points sitting on a cell edge.
const CELL_EPSILON: f64 = 1e-9;

/// A rectangular cell with values at its four corners.
///
/// `v00` is at `(x0, y0)`, `v10` at `(x1, y0)`, `v01` at `(x0, y1)` and
/// `v11` at `(x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub v00: f64,
    pub v10: f64,
    pub v01: f64,
    pub v11: f64,
}

impl GridCell {
    /// Bilinear blend of the corner values at `(x, y)`.
    ///
    /// ```text
    /// t = (x - x0) / (x1 - x0),  u = (y - y0) / (y1 - y0)
    /// f = (1-t)(1-u)·v00 + t(1-u)·v10 + (1-t)u·v01 + tu·v11
    /// ```
    ///
    /// `t` and `u` are clamped into `[0, 1]`.
    pub fn interpolate(&self, x: f64, y: f64) -> Result<f64> {
        if self.x1 <= self.x0 {
            return Err(GridError::invalid_cell("X1 must be > X0"));
        }
        if self.y1 <= self.y0 {
            return Err(GridError::invalid_cell("Y1 must be > Y0"));
        }

        if x < self.x0 - CELL_EPSILON || x > self.x1 + CELL_EPSILON {
            return Err(GridError::OutsideCell {
                axis: Axis::X,
                value: x,
                lo: self.x0,
                hi: self.x1,
            });
        }
        if y < self.y0 - CELL_EPSILON || y > self.y1 + CELL_EPSILON {
            return Err(GridError::OutsideCell {
                axis: Axis::Y,
                value: y,
                lo: self.y0,
                hi: self.y1,
            });
        }

        let t = ((x - self.x0) / (self.x1 - self.x0)).clamp(0.0, 1.0);
        let u = ((y - self.y0) / (self.y1 - self.y0)).clamp(0.0, 1.0);

        Ok((1.0 - t) * (1.0 - u) * self.v00
            + t * (1.0 - u) * self.v10
            + (1.0 - t) * u * self.v01
            + t * u * self.v11)
    }
}

/// Interpolate two grids sharing the same axes (e.g. amplitude and phase).
pub fn interpolate_both(a: &Grid2D, b: &Grid2D, x: f64, y: f64) -> Result<(f64, f64)> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(GridError::DimensionMismatch(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }

    Ok((a.interpolate_at(x, y)?, b.interpolate_at(x, y)?))
}
