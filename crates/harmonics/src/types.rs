//! Core data model for harmonic prediction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constituents::constituent_speed;
use crate::nodal::NodalCorrection;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// A constituent bound to a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstituentParam {
    /// Constituent name (e.g., "M2").
    pub name: String,
    /// Amplitude in meters.
    pub amplitude_m: f64,
    /// Greenwich phase lag in degrees, `[0, 360)` by convention.
    pub phase_deg: f64,
    /// Angular speed in degrees per hour.
    pub speed_deg_per_hour: f64,
}

impl ConstituentParam {
    pub fn new(
        name: impl Into<String>,
        amplitude_m: f64,
        phase_deg: f64,
        speed_deg_per_hour: f64,
    ) -> Self {
        Self {
            name: name.into(),
            amplitude_m,
            phase_deg,
            speed_deg_per_hour,
        }
    }

    /// Build a parameter using the catalogue speed for `name`.
    ///
    /// Returns `None` for constituents missing from the catalogue.
    pub fn from_catalogue(name: &str, amplitude_m: f64, phase_deg: f64) -> Option<Self> {
        let speed = constituent_speed(name)?;
        Some(Self::new(name, amplitude_m, phase_deg, speed))
    }
}

/// A single predicted height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TideLevel {
    pub time: DateTime<Utc>,
    pub height_m: f64,
}

impl TideLevel {
    pub fn new(time: DateTime<Utc>, height_m: f64) -> Self {
        Self { time, height_m }
    }
}

/// High and low tide events, each sorted chronologically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extrema {
    pub highs: Vec<TideLevel>,
    pub lows: Vec<TideLevel>,
}

/// Phase summation formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseConvention {
    /// `θ = ωΔt − φ + λ + u`: Greenwich phase lags plus site longitude.
    #[default]
    Greenwich,
    /// `θ = ωΔt + V + u − φ`: phases referenced to the equilibrium argument.
    EquilibriumArgument,
}

impl PhaseConvention {
    /// Parse a request selector. `"vu"`/`"VU"` selects the equilibrium
    /// argument form; anything else falls back to Greenwich.
    pub fn from_selector(s: &str) -> Self {
        match s {
            "vu" | "VU" => Self::EquilibriumArgument,
            _ => Self::Greenwich,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greenwich => "fes_greenwich",
            Self::EquilibriumArgument => "vu",
        }
    }
}

/// Per-request synthesis configuration.
#[derive(Debug, Clone)]
pub struct PredictionParams {
    pub constituents: Vec<ConstituentParam>,
    /// Mean sea level offset in meters.
    pub msl_m: f64,
    /// Site longitude in degrees, used by the Greenwich convention.
    pub longitude_deg: f64,
    pub nodal: Arc<dyn NodalCorrection>,
    /// Epoch for Δt.
    pub reference_time: DateTime<Utc>,
    pub phase_convention: PhaseConvention,
}

/// Signed hours from `reference` to `t`, at microsecond resolution.
pub fn hours_between(t: DateTime<Utc>, reference: DateTime<Utc>) -> f64 {
    let delta = t - reference;
    match delta.num_microseconds() {
        Some(us) => us as f64 / MICROS_PER_HOUR,
        // Spans beyond ~292k years overflow microseconds
        None => delta.num_milliseconds() as f64 / 3_600_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_hours_between() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(hours_between(t0 + Duration::minutes(90), t0), 1.5);
        assert_eq!(hours_between(t0 - Duration::hours(24), t0), -24.0);
        assert_eq!(hours_between(t0, t0), 0.0);
    }

    #[test]
    fn test_phase_convention_selector() {
        assert_eq!(PhaseConvention::from_selector("vu"), PhaseConvention::EquilibriumArgument);
        assert_eq!(PhaseConvention::from_selector("VU"), PhaseConvention::EquilibriumArgument);
        assert_eq!(PhaseConvention::from_selector("Vu"), PhaseConvention::Greenwich);
        assert_eq!(PhaseConvention::from_selector(""), PhaseConvention::Greenwich);
        assert_eq!(PhaseConvention::from_selector("fes_greenwich"), PhaseConvention::Greenwich);
    }

    #[test]
    fn test_from_catalogue() {
        let m2 = ConstituentParam::from_catalogue("M2", 1.2, 45.0).unwrap();
        assert_eq!(m2.speed_deg_per_hour, 28.9841042);
        assert!(ConstituentParam::from_catalogue("XX", 1.0, 0.0).is_none());
    }
}
