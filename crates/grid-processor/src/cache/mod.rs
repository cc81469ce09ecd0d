//! Cache implementations for grid processing.

mod region_cache;

pub use region_cache::{CachedRegion, RegionCache};
