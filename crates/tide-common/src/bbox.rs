//! Geographic bounds of a loaded grid window.

use serde::{Deserialize, Serialize};

use crate::geo::{lon_axis_requires_wrap, wrap_degrees};

/// Geographic extent covered by a grid, in degrees.
///
/// When the grid uses the 0–360° longitude convention (`lon_wrap_360`),
/// query longitudes are wrapped before the containment check so that a
/// query at -130° matches a window spanning 228°–232°.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub lon_wrap_360: bool,
}

impl GeoBounds {
    /// Create bounds from explicit extremes.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64, lon_wrap_360: bool) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            lon_wrap_360,
        }
    }

    /// Derive bounds from a grid's longitude and latitude axes.
    ///
    /// Returns `None` for empty axes.
    pub fn from_axes(lons: &[f64], lats: &[f64]) -> Option<Self> {
        let (&lon_a, &lon_b) = (lons.first()?, lons.last()?);
        let (&lat_a, &lat_b) = (lats.first()?, lats.last()?);

        Some(Self {
            min_lat: lat_a.min(lat_b),
            max_lat: lat_a.max(lat_b),
            min_lon: lon_a.min(lon_b),
            max_lon: lon_a.max(lon_b),
            lon_wrap_360: lon_axis_requires_wrap(lons),
        })
    }

    /// Check if a point falls inside these bounds (edges inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let lon = if self.lon_wrap_360 {
            wrap_degrees(lon)
        } else {
            lon
        };
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}
