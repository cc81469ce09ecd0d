//! Location-keyed corrections applied on top of the constituent sources.
//!
//! - [`DatumOffsetTable`]: a vertical offset taken from the nearest
//!   reference point within [`DATUM_OFFSET_RADIUS_KM`]
//! - [`StationOverrideTable`]: per-station constituent replacements and
//!   an extra datum offset, matched within each entry's radius
//!
//! Both tables are optional JSON files. See [`load_optional_table`].

use std::path::Path;

use harmonics::{constituent_speed, ConstituentParam};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tide_common::{haversine_km, wrap_degrees};
use tracing::{debug, warn};

use crate::error::{PredictionError, Result};

/// Largest distance at which a datum offset entry still applies.
pub const DATUM_OFFSET_RADIUS_KM: f64 = 80.0;

/// Match radius for override entries that do not set one.
pub const DEFAULT_OVERRIDE_RADIUS_KM: f64 = 40.0;

/// A reference point with a known offset between model MSL and a local datum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatumOffsetEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub offset_m: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatumOffsetTable {
    entries: Vec<DatumOffsetEntry>,
}

impl DatumOffsetTable {
    pub fn new(entries: Vec<DatumOffsetEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn entries(&self) -> &[DatumOffsetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The nearest entry and its distance in km. Ties keep the earlier entry.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<(&DatumOffsetEntry, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry, haversine_km(lat, lon, entry.lat, entry.lon)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Offset of the nearest entry if it lies within [`DATUM_OFFSET_RADIUS_KM`].
    pub fn offset_at(&self, lat: f64, lon: f64) -> Option<f64> {
        self.nearest(lat, lon)
            .filter(|(_, distance)| *distance <= DATUM_OFFSET_RADIUS_KM)
            .map(|(entry, distance)| {
                debug!(name = %entry.name, distance_km = distance, offset_m = entry.offset_m, "Auto datum offset");
                entry.offset_m
            })
    }
}

/// Replacement harmonic constants for one constituent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideConstituent {
    pub name: String,
    pub amplitude_m: f64,
    pub phase_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationOverride {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Match radius. Zero means [`DEFAULT_OVERRIDE_RADIUS_KM`].
    #[serde(default)]
    pub radius_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum_offset_m: Option<f64>,
    #[serde(default)]
    pub constituents: Vec<OverrideConstituent>,
}

impl StationOverride {
    pub fn radius_km(&self) -> f64 {
        if self.radius_km > 0.0 {
            self.radius_km
        } else {
            DEFAULT_OVERRIDE_RADIUS_KM
        }
    }

    /// Replace matching constituents and append the rest.
    ///
    /// Appended constituents take their speed from the catalogue; names the
    /// catalogue does not know are dropped. Phases are wrapped into `[0, 360)`.
    pub fn apply(&self, constituents: &mut Vec<ConstituentParam>) {
        for ov in &self.constituents {
            let phase = wrap_degrees(ov.phase_deg);

            if let Some(existing) = constituents.iter_mut().find(|c| c.name == ov.name) {
                existing.amplitude_m = ov.amplitude_m;
                existing.phase_deg = phase;
                continue;
            }

            match constituent_speed(&ov.name) {
                Some(speed) => {
                    constituents.push(ConstituentParam::new(&ov.name, ov.amplitude_m, phase, speed))
                }
                None => debug!(station = %self.name, constituent = %ov.name, "Skipping override for unknown constituent"),
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationOverrideTable {
    entries: Vec<StationOverride>,
}

impl StationOverrideTable {
    pub fn new(entries: Vec<StationOverride>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn entries(&self) -> &[StationOverride] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The closest entry whose radius contains `(lat, lon)`.
    pub fn matching(&self, lat: f64, lon: f64) -> Option<&StationOverride> {
        self.entries
            .iter()
            .map(|entry| (entry, haversine_km(lat, lon, entry.lat, entry.lon)))
            .filter(|(entry, distance)| *distance <= entry.radius_km())
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entry, _)| entry)
    }
}

/// Read and parse a JSON table.
pub fn read_table<T: DeserializeOwned>(kind: &'static str, path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path).map_err(|e| PredictionError::table(kind, path, e))?;
    serde_json::from_str(&json).map_err(|e| PredictionError::table(kind, path, e))
}

/// Load an optional JSON table.
///
/// A missing file means the table is not configured. A file that cannot be
/// read or parsed is logged and treated the same way.
pub fn load_optional_table<T: DeserializeOwned>(kind: &'static str, path: &Path) -> Option<T> {
    if !path.exists() {
        debug!(kind, path = %path.display(), "Optional table not found");
        return None;
    }

    match read_table(kind, path) {
        Ok(table) => Some(table),
        Err(err) => {
            warn!(kind, path = %path.display(), error = %err, "Ignoring unreadable table");
            None
        }
    }
}
