//! Geoid undulation lookups.

use std::path::{Path, PathBuf};

use grid_processor::{CacheStats, GridProcessorConfig, RegionCache};
use netcdf_parser::names;
use tide_common::normalize_lon_for_axis;

use crate::error::Result;
use crate::region::load_region;

/// Samples geoid height `N` (geoid above ellipsoid, metres) from a grid.
///
/// Converts an ellipsoidal height `h` to an orthometric height with
/// `H = h − N`.
#[derive(Debug)]
pub struct GeoidSampler {
    path: PathBuf,
    margin_deg: f64,
    cache: RegionCache,
}

impl GeoidSampler {
    pub fn new(path: impl Into<PathBuf>, config: &GridProcessorConfig) -> Self {
        Self {
            path: path.into(),
            margin_deg: config.margin_deg,
            cache: RegionCache::new("geoid"),
        }
    }

    /// Replace the region cache.
    pub fn with_cache(mut self, cache: RegionCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn geoid_height(&self, lat: f64, lon: f64) -> Result<f64> {
        let grid = self.cache.get_or_load(lat, lon, || {
            load_region(&self.path, "geoid", names::GEOID, lat, lon, self.margin_deg)
        })?;
        let lon_q = normalize_lon_for_axis(grid.x(), lon);
        Ok(grid.interpolate_at(lon_q, lat)?)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
