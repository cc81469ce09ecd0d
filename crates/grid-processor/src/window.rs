//! Index windows for partial reads of large grids.
//!
//! A window selects a contiguous block of rows (latitude) and columns
//! (longitude) so that only the data needed around a query point is read
//! from disk.

use tide_common::normalize_lon_for_axis;

use crate::axis::{bracket, clamp_index, nearest_index};
use crate::error::{Axis, GridError, Result};

/// A block of `rows × cols` grid points starting at `(row_start, col_start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexWindow {
    pub row_start: usize,
    pub rows: usize,
    pub col_start: usize,
    pub cols: usize,
}

impl IndexWindow {
    /// The 2×2 block bracketing `(lat, lon)`.
    ///
    /// `lon` is wrapped into `[0, 360)` when the longitude axis uses that
    /// convention. Points outside either axis are an error.
    pub fn cell(lats: &[f64], lons: &[f64], lat: f64, lon: f64) -> Result<Self> {
        check_len(Axis::Y, lats)?;
        check_len(Axis::X, lons)?;

        let lon_q = normalize_lon_for_axis(lons, lon);
        match (bracket(lats, lat), bracket(lons, lon_q)) {
            (Some(row_start), Some(col_start)) => Ok(Self {
                row_start,
                rows: 2,
                col_start,
                cols: 2,
            }),
            _ => Err(GridError::OutOfBounds {
                x: lon_q,
                y: lat,
                x_min: lons[0],
                x_max: lons[lons.len() - 1],
                y_min: lats[0],
                y_max: lats[lats.len() - 1],
            }),
        }
    }

    /// A block spanning `±margin` degrees around `(lat, lon)`.
    ///
    /// The block is clamped to the axes and always holds at least 2×2
    /// points. When the query lies inside the axes, the cell bracketing it
    /// is always part of the block, even when `lon ± margin` wraps across
    /// the seam of a 0–360° axis.
    pub fn around(lats: &[f64], lons: &[f64], lat: f64, lon: f64, margin: f64) -> Result<Self> {
        check_len(Axis::Y, lats)?;
        check_len(Axis::X, lons)?;

        let idx = |axis: &[f64], v: f64| nearest_index(axis, v) as isize;
        let n_lat = lats.len() as isize;
        let n_lon = lons.len() as isize;

        let mut lat_lo = idx(lats, lat - margin);
        let mut lat_hi = idx(lats, lat + margin);
        if let Some(row) = bracket(lats, lat) {
            lat_lo = lat_lo.min(row as isize);
            lat_hi = lat_hi.max(row as isize + 1);
        }

        let lon_q = normalize_lon_for_axis(lons, lon);
        let mut lon_lo = idx(lons, normalize_lon_for_axis(lons, lon - margin));
        let mut lon_hi = idx(lons, normalize_lon_for_axis(lons, lon + margin));
        if lon_lo == lon_hi {
            lon_hi = clamp_index(lon_hi + 1, 0, n_lon - 1);
        }
        // Keep the cell around the query even when lon ± margin crossed the seam
        let (target_lo, target_hi) = match bracket(lons, lon_q) {
            Some(col) => (col as isize, col as isize + 1),
            None => (idx(lons, lon_q), idx(lons, lon_q)),
        };
        lon_lo = lon_lo.min(target_lo);
        lon_hi = lon_hi.max(target_hi);

        if lat_lo > lat_hi {
            std::mem::swap(&mut lat_lo, &mut lat_hi);
        }
        if lon_lo > lon_hi {
            std::mem::swap(&mut lon_lo, &mut lon_hi);
        }

        let lat_start = clamp_index(lat_lo, 0, n_lat - 2);
        let lat_end = clamp_index(lat_hi + 1, lat_start + 2, n_lat);
        let lon_start = clamp_index(lon_lo, 0, n_lon - 2);
        let lon_end = clamp_index(lon_hi + 1, lon_start + 2, n_lon);

        Ok(Self {
            row_start: lat_start as usize,
            rows: (lat_end - lat_start) as usize,
            col_start: lon_start as usize,
            cols: (lon_end - lon_start) as usize,
        })
    }

    /// Row index range.
    pub fn row_range(&self) -> std::ops::Range<usize> {
        self.row_start..self.row_start + self.rows
    }

    /// Column index range.
    pub fn col_range(&self) -> std::ops::Range<usize> {
        self.col_start..self.col_start + self.cols
    }

    /// Slice the latitude and longitude axes down to this window.
    pub fn slice_axes(&self, lats: &[f64], lons: &[f64]) -> (Vec<f64>, Vec<f64>) {
        (lats[self.row_range()].to_vec(), lons[self.col_range()].to_vec())
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_len(axis: Axis, coords: &[f64]) -> Result<()> {
    if coords.len() < 2 {
        return Err(GridError::TooFewPoints {
            axis,
            len: coords.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(start: f64, step: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn test_cell_brackets_query() {
        let lats = axis(-90.0, 1.0, 181);
        let lons = axis(-180.0, 1.0, 360);
        let w = IndexWindow::cell(&lats, &lons, 35.4, 139.7).unwrap();
        assert_eq!(w.rows, 2);
        assert_eq!(w.cols, 2);
        assert_eq!(lats[w.row_start], 35.0);
        assert_eq!(lons[w.col_start], 139.0);
    }

    #[test]
    fn test_cell_wraps_on_360_axis() {
        let lats = axis(-90.0, 0.5, 361);
        let lons = axis(0.0, 0.5, 720);
        let a = IndexWindow::cell(&lats, &lons, 10.2, -220.0).unwrap();
        let b = IndexWindow::cell(&lats, &lons, 10.2, 140.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cell_outside_coverage() {
        let lats = axis(30.0, 1.0, 10);
        let lons = axis(130.0, 1.0, 10);
        let err = IndexWindow::cell(&lats, &lons, 50.0, 135.0).unwrap_err();
        assert!(err.is_out_of_bounds());
        assert!(IndexWindow::cell(&lats, &lons, 35.0, 200.0).is_err());
        assert!(matches!(
            IndexWindow::cell(&[1.0], &lons, 1.0, 135.0),
            Err(GridError::TooFewPoints { axis: Axis::Y, len: 1 })
        ));
    }

    #[test]
    fn test_around_interior() {
        let lats = axis(-90.0, 0.25, 721);
        let lons = axis(-180.0, 0.25, 1440);
        let w = IndexWindow::around(&lats, &lons, 35.0, 139.0, 2.0).unwrap();
        let (wl, wn) = w.slice_axes(&lats, &lons);

        assert_eq!(wl.first(), Some(&33.0));
        assert_eq!(wl.last(), Some(&37.0));
        assert_eq!(wn.first(), Some(&137.0));
        assert_eq!(wn.last(), Some(&141.0));
        assert_eq!(w.len(), 17 * 17);
    }

    #[test]
    fn test_around_clamps_at_edges() {
        let lats = axis(0.0, 1.0, 5);
        let lons = axis(0.0, 1.0, 5);
        let w = IndexWindow::around(&lats, &lons, 0.0, 4.0, 2.0).unwrap();
        assert_eq!(w.row_range(), 0..3);
        assert_eq!(w.col_range(), 2..5);

        // Margin smaller than the spacing still yields 2x2
        let w = IndexWindow::around(&lats, &lons, 4.0, 4.0, 0.1).unwrap();
        assert_eq!(w.row_range(), 3..5);
        assert_eq!(w.col_range(), 3..5);
    }

    #[test]
    fn test_around_includes_target_across_seam() {
        let lats = axis(-10.0, 1.0, 21);
        let lons = axis(0.0, 1.0, 360);
        // lon - margin wraps to 359, lon + margin to 1
        let w = IndexWindow::around(&lats, &lons, 0.0, 0.5, 1.0).unwrap();
        let (_, wn) = w.slice_axes(&lats, &lons);
        assert_eq!(wn, vec![0.0, 1.0, 2.0]);
    }
}
