//! Geodesy helpers: angle wrapping, longitude conventions and great-circle distance.

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Wrap an angle in degrees into `[0, 360)`.
///
/// Used both for phase lags and for longitudes on 0–360° grids.
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Returns true when a longitude axis uses the 0–360° convention.
///
/// The axis may be given in either direction; only its extremes matter.
pub fn lon_axis_requires_wrap(lons: &[f64]) -> bool {
    let (Some(&first), Some(&last)) = (lons.first(), lons.last()) else {
        return false;
    };
    let (min, max) = if first <= last { (first, last) } else { (last, first) };
    min >= 0.0 && max > 180.0
}

/// Express `lon` in the convention of the given longitude axis.
///
/// Queries against a 0–360° axis are wrapped into `[0, 360)`; any other
/// axis receives the caller's value untouched.
pub fn normalize_lon_for_axis(lons: &[f64], lon: f64) -> f64 {
    if lon_axis_requires_wrap(lons) {
        wrap_degrees(lon)
    } else {
        lon
    }
}

/// Great-circle distance in kilometres between two WGS84 points (haversine).
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
