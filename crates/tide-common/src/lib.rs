//! Common types and utilities shared across the tide prediction crates.

pub mod bbox;
pub mod error;
pub mod geo;

pub use bbox::GeoBounds;
pub use error::{Classify, ErrorClass};
pub use geo::{
    haversine_km, lon_axis_requires_wrap, normalize_lon_for_axis, wrap_degrees, EARTH_RADIUS_KM,
};
