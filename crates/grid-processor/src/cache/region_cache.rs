//! Single-window grid cache keyed by geographic bounds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tide_common::GeoBounds;
use tracing::debug;

use crate::grid::Grid2D;
use crate::types::CacheStats;

/// A loaded grid window and the area it covers.
#[derive(Debug, Clone)]
pub struct CachedRegion {
    pub grid: Arc<Grid2D>,
    pub bounds: GeoBounds,
}

impl CachedRegion {
    /// Wrap a loaded grid, deriving its bounds from the axes.
    pub fn new(grid: Grid2D) -> Option<Self> {
        let bounds = grid.bounds()?;
        Some(Self {
            grid: Arc::new(grid),
            bounds,
        })
    }
}

/// Holds at most one grid window and replaces it when a query falls
/// outside its bounds.
///
/// Readers check containment under a read lock. A miss takes the write
/// lock, re-checks (another thread may have loaded a covering window in
/// the meantime) and only then calls the loader. Poisoned locks are
/// recovered since the cached grid is immutable once stored.
#[derive(Debug)]
pub struct RegionCache {
    name: String,
    slot: RwLock<Option<CachedRegion>>,
    hits: AtomicU64,
    misses: AtomicU64,
    reloads: AtomicU64,
}

impl RegionCache {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: RwLock::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            reloads: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cached grid if it covers `(lat, lon)`.
    pub fn lookup(&self, lat: f64, lon: f64) -> Option<Arc<Grid2D>> {
        let found = covering(&self.read(), lat, lon);
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// The cached grid covering `(lat, lon)`, loading a new window on a miss.
    ///
    /// A failed load leaves the previous window in place.
    pub fn get_or_load<F, E>(&self, lat: f64, lon: f64, load: F) -> Result<Arc<Grid2D>, E>
    where
        F: FnOnce() -> Result<CachedRegion, E>,
    {
        if let Some(grid) = self.lookup(lat, lon) {
            return Ok(grid);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let mut slot = self.write();
        if let Some(grid) = covering(&slot, lat, lon) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(grid);
        }

        let region = load()?;
        self.reloads.fetch_add(1, Ordering::Relaxed);
        debug!(
            cache = %self.name,
            lat,
            lon,
            min_lat = region.bounds.min_lat,
            max_lat = region.bounds.max_lat,
            min_lon = region.bounds.min_lon,
            max_lon = region.bounds.max_lon,
            "Loaded grid window"
        );

        let grid = Arc::clone(&region.grid);
        *slot = Some(region);
        Ok(grid)
    }

    /// Drop the cached window.
    pub fn clear(&self) {
        *self.write() = None;
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
            bounds: self.read().as_ref().map(|r| r.bounds),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<CachedRegion>> {
        self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<CachedRegion>> {
        self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn covering(slot: &Option<CachedRegion>, lat: f64, lon: f64) -> Option<Arc<Grid2D>> {
    slot.as_ref()
        .filter(|region| region.bounds.contains(lat, lon))
        .map(|region| Arc::clone(&region.grid))
}
