//! Mean sea level and seabed depth around a location.
//!
//! Two optional grids feed the result:
//!
//! - an elevation grid (negative below sea level), reported as a positive
//!   seabed depth
//! - a mean-sea-surface grid above the ellipsoid, reported as mean sea level
//!   and corrected to the geoid when a [`GeoidSampler`] is configured
//!
//! Each grid keeps one `±margin` window in its own [`RegionCache`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use grid_processor::{CacheStats, Grid2D, GridProcessorConfig, RegionCache};
use netcdf_parser::names;
use serde::{Deserialize, Serialize};
use tide_common::normalize_lon_for_axis;
use tracing::{debug, warn};

use crate::error::Result;
use crate::geoid::GeoidSampler;
use crate::region::load_region;

pub const DATUM_ELLIPSOID: &str = "EGM2008";
pub const DATUM_GEOID_CORRECTED: &str = "EGM2008 (geoid-corrected)";
pub const SOURCE_MSS: &str = "DTU21 MSS";
pub const SOURCE_ELEVATION: &str = "GEBCO 2025";
pub const SOURCE_BOTH: &str = "GEBCO 2025 + DTU21 MSS";
const SOURCE_LOCAL: &str = "Local files";

/// Spatial metadata for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMetadata {
    /// Mean sea level in metres relative to `datum_name`.
    pub msl_m: f64,
    /// Seabed depth below sea level in metres, positive down.
    pub depth_m: Option<f64>,
    pub datum_name: String,
    pub source_name: String,
}

/// Samples depth and mean sea level from local grid files.
#[derive(Debug)]
pub struct MetadataSampler {
    elevation_path: Option<PathBuf>,
    mss_path: Option<PathBuf>,
    geoid: Option<GeoidSampler>,
    margin_deg: f64,
    depth_cache: RegionCache,
    msl_cache: RegionCache,
}

impl MetadataSampler {
    pub fn new(
        elevation_path: Option<PathBuf>,
        mss_path: Option<PathBuf>,
        geoid: Option<GeoidSampler>,
        config: &GridProcessorConfig,
    ) -> Self {
        Self {
            elevation_path,
            mss_path,
            geoid,
            margin_deg: config.margin_deg,
            depth_cache: RegionCache::new("depth"),
            msl_cache: RegionCache::new("msl"),
        }
    }

    /// Replace the region caches.
    pub fn with_caches(mut self, depth_cache: RegionCache, msl_cache: RegionCache) -> Self {
        self.depth_cache = depth_cache;
        self.msl_cache = msl_cache;
        self
    }

    /// True when at least one grid is configured.
    pub fn is_configured(&self) -> bool {
        self.elevation_path.is_some() || self.mss_path.is_some()
    }

    /// Metadata at `(lat, lon)`, or `None` when no grid covers it.
    ///
    /// Load failures are logged and treated as missing grids. A mean sea
    /// surface that cannot be interpolated makes the whole result `None`;
    /// a depth that cannot be interpolated is simply omitted.
    pub fn metadata(&self, lat: f64, lon: f64) -> Option<LocationMetadata> {
        let msl_grid = self.mss_path.as_deref().and_then(|path| {
            self.window(&self.msl_cache, path, "mean sea surface", names::MEAN_SEA_SURFACE, lat, lon)
        });
        let depth_grid = self.elevation_path.as_deref().and_then(|path| {
            self.window(&self.depth_cache, path, "elevation", names::ELEVATION, lat, lon)
        });

        if msl_grid.is_none() && depth_grid.is_none() {
            return None;
        }

        let mut metadata = LocationMetadata {
            msl_m: 0.0,
            depth_m: None,
            datum_name: DATUM_ELLIPSOID.to_string(),
            source_name: SOURCE_LOCAL.to_string(),
        };

        if let Some(grid) = msl_grid {
            let mut msl = match sample(&grid, lat, lon) {
                Ok(v) => v,
                Err(err) => {
                    debug!(lat, lon, error = %err, "Mean sea surface does not cover location");
                    return None;
                }
            };

            if let Some(geoid) = &self.geoid {
                match geoid.geoid_height(lat, lon) {
                    Ok(n) => {
                        msl -= n;
                        metadata.datum_name = DATUM_GEOID_CORRECTED.to_string();
                    }
                    Err(err) => warn!(lat, lon, error = %err, "Geoid correction failed"),
                }
            }

            metadata.msl_m = msl;
            metadata.source_name = SOURCE_MSS.to_string();
        }

        if let Some(grid) = depth_grid {
            if let Ok(elevation) = sample(&grid, lat, lon) {
                if elevation < 0.0 {
                    metadata.depth_m = Some(-elevation);
                }
                metadata.source_name = if metadata.source_name == SOURCE_MSS {
                    SOURCE_BOTH.to_string()
                } else {
                    SOURCE_ELEVATION.to_string()
                };
            }
        }

        Some(metadata)
    }

    /// Statistics of the depth and mean-sea-level caches.
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.depth_cache.stats(), self.msl_cache.stats())
    }

    fn window(
        &self,
        cache: &RegionCache,
        path: &Path,
        kind: &str,
        candidates: &[&str],
        lat: f64,
        lon: f64,
    ) -> Option<Arc<Grid2D>> {
        cache
            .get_or_load(lat, lon, || load_region(path, kind, candidates, lat, lon, self.margin_deg))
            .map_err(|err| {
                warn!(
                    cache = %cache.name(),
                    path = %path.display(),
                    error = %err,
                    "Failed to load metadata grid"
                )
            })
            .ok()
    }
}

fn sample(grid: &Grid2D, lat: f64, lon: f64) -> Result<f64> {
    let lon_q = normalize_lon_for_axis(grid.x(), lon);
    Ok(grid.interpolate_at(lon_q, lat)?)
}
