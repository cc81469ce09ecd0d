//! File-backed data sources for tide prediction.
//!
//! Provides:
//! - Constituent sources behind [`ConstituentSource`]: per-station CSV
//!   tables and per-location sampling of gridded harmonic constants
//! - Spatial metadata (seabed depth, mean sea level, geoid correction)
//!   from windowed grid loads with bounding-box caching

pub mod discovery;
pub mod error;
pub mod geoid;
pub mod location;
pub mod metadata;
pub mod region;
pub mod source;
pub mod station;

pub use discovery::FileIndex;
pub use error::{Result, StoreError};
pub use geoid::GeoidSampler;
pub use location::LocationGridSampler;
pub use metadata::{LocationMetadata, MetadataSampler};
pub use source::{ConstituentSource, ConstituentStore};
pub use station::StationCsvSource;
