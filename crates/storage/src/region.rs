//! Windowed loads feeding a [`RegionCache`](grid_processor::RegionCache).

use std::path::Path;

use grid_processor::{CachedRegion, GridError, IndexWindow};
use netcdf_parser::GridFile;

use crate::error::Result;

/// Read the `±margin` window of the first matching variable around
/// `(lat, lon)`.
pub fn load_region(
    path: &Path,
    kind: &str,
    candidates: &[&str],
    lat: f64,
    lon: f64,
    margin_deg: f64,
) -> Result<CachedRegion> {
    let file = GridFile::open(path)?;
    let coords = file.read_coordinates()?;
    let var = file.require_variable(kind, candidates)?;
    let window = IndexWindow::around(&coords.lats, &coords.lons, lat, lon, margin_deg)?;
    let grid = file.read_grid(&var, &coords, window)?;

    CachedRegion::new(grid).ok_or_else(|| GridError::invalid_cell("window has no extent").into())
}
