//! Tide prediction service.
//!
//! Turns a [`PredictionRequest`] (a station id or a location, a time range
//! and an interval) into a [`PredictionResponse`] holding a height series,
//! refined high and low tides, and optional depth and mean sea level
//! enrichment.
//!
//! # Example
//!
//! ```ignore
//! use chrono::{Duration, TimeZone, Utc};
//! use prediction::{PredictionConfig, PredictionRequest, PredictionService};
//!
//! let service = PredictionService::from_config(&PredictionConfig::from_env())?;
//! let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let request = PredictionRequest::for_location(35.65, 139.77, start, start + Duration::days(1), Duration::minutes(10));
//! let response = service.predict(&request)?;
//! println!("{} highs", response.extrema.highs.len());
//! ```

pub mod adjustments;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod service;

pub use adjustments::{DatumOffsetEntry, DatumOffsetTable, OverrideConstituent, StationOverride, StationOverrideTable};
pub use config::PredictionConfig;
pub use error::{PredictionError, Result};
pub use request::{OutputZone, PredictionRequest, Selector, SourceKind};
pub use response::{round3, ExtremaResponse, PredictionPoint, PredictionResponse};
pub use service::{PredictionService, PredictionServiceBuilder};
