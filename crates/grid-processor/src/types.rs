//! Core types for grid processing.

use serde::{Deserialize, Serialize};
use tide_common::GeoBounds;

/// Statistics about a region cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups served from the cached window.
    pub hits: u64,
    /// Lookups that fell outside the cached window.
    pub misses: u64,
    /// Windows actually loaded from the backing file.
    pub reloads: u64,
    /// Bounds of the window currently held, if any.
    pub bounds: Option<GeoBounds>,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
