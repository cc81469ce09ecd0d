//! Candidate variable names, tried in order, first match wins.

pub const LATITUDE: &[&str] = &["lat", "latitude", "y"];
pub const LONGITUDE: &[&str] = &["lon", "longitude", "x"];

/// Amplitude grids in per-constituent or combined tide files.
pub const AMPLITUDE: &[&str] = &[
    "amplitude", "Amplitude", "amp", "Amp", "HA", "Ha", "ha", "H", "h", "data", "z",
];

/// Phase grids in per-constituent or combined tide files.
pub const PHASE: &[&str] = &[
    "phase", "Phase", "pha", "Pha", "Hg", "HG", "hg", "g", "G", "phi", "Phi", "PHI", "phase_deg",
    "data", "z",
];

/// Real part of a complex harmonic constant.
pub const REAL: &[&str] = &["hRe", "Hre", "hre", "Re", "RE", "real", "Real"];

/// Imaginary part of a complex harmonic constant.
pub const IMAG: &[&str] = &["hIm", "Him", "him", "Im", "IM", "imag", "Imag"];

/// GEBCO elevation (negative below sea level).
pub const ELEVATION: &[&str] = &["elevation", "data", "z"];

/// DTU mean sea surface above the ellipsoid.
pub const MEAN_SEA_SURFACE: &[&str] = &["mean_sea_surf_sol2", "data", "z"];

/// Geoid undulation.
pub const GEOID: &[&str] = &["geoid", "geoid_height", "N", "height", "z"];
