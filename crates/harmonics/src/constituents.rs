//! Static catalogue of tidal constituents and their angular speeds.

use serde::Serialize;

/// A named harmonic component with a fixed angular speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Constituent {
    pub name: &'static str,
    /// Angular speed in degrees per hour.
    pub speed_deg_per_hour: f64,
    pub description: &'static str,
}

const fn constituent(name: &'static str, speed: f64, description: &'static str) -> Constituent {
    Constituent {
        name,
        speed_deg_per_hour: speed,
        description,
    }
}

static CONSTITUENTS: [Constituent; 18] = [
    // Semidiurnal
    constituent("M2", 28.9841042, "Principal lunar semidiurnal"),
    constituent("S2", 30.0000000, "Principal solar semidiurnal"),
    constituent("N2", 28.4397295, "Larger lunar elliptic semidiurnal"),
    constituent("K2", 30.0821373, "Lunisolar semidiurnal"),
    // Diurnal
    constituent("K1", 15.0410686, "Lunisolar diurnal"),
    constituent("O1", 13.9430356, "Principal lunar diurnal"),
    constituent("P1", 14.9589314, "Principal solar diurnal"),
    constituent("Q1", 13.3986609, "Larger lunar elliptic diurnal"),
    // Shallow water
    constituent("M4", 57.9682084, "Shallow water overtide of principal lunar"),
    constituent("M6", 86.9523127, "Shallow water overtide of principal lunar"),
    constituent("MK3", 44.0251729, "Shallow water terdiurnal"),
    constituent("S4", 60.0000000, "Shallow water overtide of principal solar"),
    constituent("MN4", 57.4238337, "Shallow water quarter diurnal"),
    constituent("MS4", 58.9841042, "Shallow water quarter diurnal"),
    // Long period
    constituent("Mf", 1.0980331, "Lunisolar fortnightly"),
    constituent("Mm", 0.5443747, "Lunar monthly"),
    constituent("Ssa", 0.0821373, "Solar semiannual"),
    constituent("Sa", 0.0410686, "Solar annual"),
];

/// Constituents probed, in order, when sampling gridded harmonic data
/// for a location: the 8 major constituents, then shallow-water overtides.
pub const LOCATION_PRIORITY: [&str; 14] = [
    "M2", "S2", "N2", "K2", "K1", "O1", "P1", "Q1", "M4", "MS4", "MN4", "M6", "S4", "MK3",
];

/// All known constituents in catalogue order.
pub fn all_constituents() -> &'static [Constituent] {
    &CONSTITUENTS
}

/// Angular speed (deg/h) for an exactly named constituent.
pub fn constituent_speed(name: &str) -> Option<f64> {
    CONSTITUENTS
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.speed_deg_per_hour)
}

/// Look up a constituent ignoring ASCII case (`"m2"`, `"MF"`).
pub fn find_constituent_ignore_case(name: &str) -> Option<&'static Constituent> {
    CONSTITUENTS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}
