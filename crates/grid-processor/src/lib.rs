//! Bilinear grid sampling with windowed loads and a region cache.
//!
//! This crate holds the format-independent half of grid access:
//!
//! - **Validated grids**: [`Grid2D`] guarantees strictly increasing axes
//!   and a value buffer matching them
//! - **Bilinear sampling**: [`GridCell`] blends four corner values
//! - **Partial reads**: [`IndexWindow`] computes which rows and columns a
//!   reader must fetch for a query
//! - **Region caching**: [`RegionCache`] keeps one window and reloads it
//!   only when a query falls outside its bounds
//!
//! # Architecture
//!
//! ```text
//! Query (lat, lon)
//!      │
//!      ├─► IndexWindow::cell(lats, lons)      2×2 block, per request
//!      │
//!      └─► RegionCache::get_or_load
//!                │
//!                ├─► Hit: cached Arc<Grid2D>
//!                │
//!                └─► Miss: IndexWindow::around(±margin) ─► reader ─► Grid2D
//!                                                                    │
//!                                                                    ▼
//!                                                    Grid2D::interpolate_at
//! ```
//!
//! # Example
//!
//! ```
//! use grid_processor::Grid2D;
//!
//! let grid = Grid2D::from_rows(
//!     vec![0.0, 1.0],
//!     vec![0.0, 1.0],
//!     vec![vec![0.0, 1.0], vec![2.0, 3.0]],
//! )?;
//! assert_eq!(grid.interpolate_at(0.5, 0.5)?, 1.5);
//! # Ok::<(), grid_processor::GridError>(())
//! ```

pub mod axis;
pub mod cache;
pub mod config;
pub mod error;
pub mod grid;
pub mod interpolation;
pub mod types;
pub mod window;

// Re-export commonly used types at crate root
pub use axis::{bracket, nearest_index};
pub use cache::{CachedRegion, RegionCache};
pub use config::GridProcessorConfig;
pub use error::{Axis, GridError, Result};
pub use grid::Grid2D;
pub use interpolation::{interpolate_both, GridCell};
pub use types::CacheStats;
pub use window::IndexWindow;
