//! Response types returned by the prediction service.

use std::collections::BTreeMap;

use chrono::SecondsFormat;
use harmonics::TideLevel;
use serde::{Deserialize, Serialize};

use crate::request::OutputZone;

/// Model label reported in `meta.model`.
pub const MODEL_NAME: &str = "harmonic_v0";

/// Round to 3 decimal places, halves away from zero.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub source: String,
    pub datum: String,
    /// UTC offset of every formatted timestamp, e.g. `"+09:00"`.
    pub timezone: String,
    pub constituents: Vec<String>,
    pub predictions: Vec<PredictionPoint>,
    pub extrema: ExtremaResponse,
    /// Mean sea level from the metadata grids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msl_m: Option<f64>,
    /// Seabed depth below mean sea level, positive down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seabed_depth_m: Option<f64>,
    pub meta: BTreeMap<String, String>,
}

/// One height, formatted for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    /// RFC 3339 timestamp in the requested zone.
    pub time: String,
    pub height_m: f64,
    /// Total water depth: seabed depth + MSL + height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_m: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtremaResponse {
    pub highs: Vec<PredictionPoint>,
    pub lows: Vec<PredictionPoint>,
}

/// Formats tide levels for one response.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PointFormatter {
    pub zone: OutputZone,
    pub seabed_depth_m: Option<f64>,
    pub msl_m: f64,
}

impl PointFormatter {
    pub fn point(&self, level: &TideLevel) -> PredictionPoint {
        PredictionPoint {
            time: level
                .time
                .with_timezone(&self.zone.offset())
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            height_m: round3(level.height_m),
            depth_m: self
                .seabed_depth_m
                .map(|seabed| round3(seabed + self.msl_m + level.height_m)),
        }
    }

    pub fn points(&self, levels: &[TideLevel]) -> Vec<PredictionPoint> {
        levels.iter().map(|level| self.point(level)).collect()
    }
}
