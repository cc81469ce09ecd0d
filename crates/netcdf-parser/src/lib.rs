//! NetCDF access for gridded tide, bathymetry and geoid products.
//!
//! Products in this family agree on little beyond "two 1D coordinate
//! variables and a 2D data variable". This crate hides the differences:
//!
//! - **Name probing**: ordered candidate lists in [`names`], first match wins
//! - **Dimension order**: `[lat, lon]` and `[lon, lat]` variables are both
//!   returned as row-major `[lat][lon]`
//! - **Encodings**: `_FillValue`/`missing_value` samples become 0,
//!   `scale_factor`/`add_offset` are applied
//! - **Partial reads**: only the requested [`IndexWindow`] is read
//!
//! # Implementation Notes
//!
//! Reads go through the native netcdf library (libnetcdf/HDF5). HDF5's
//! diagnostic printing is disabled on first open, see
//! [`silence_hdf5_errors`].
//!
//! [`IndexWindow`]: grid_processor::IndexWindow

pub mod error;
pub mod names;
pub mod native;
pub mod reader;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{silence_hdf5_errors, ValueEncoding};
pub use reader::{Coordinates, DimOrder, GridFile};
