//! High and low tide detection.
//!
//! Detection flags strict local maxima and minima in a sampled series.
//! Plateaus (a sample equal to either neighbor) are not reported. Each
//! candidate is then refined by fitting a parabola through it and its two
//! neighbors.

use chrono::Duration;

use crate::types::{hours_between, Extrema, TideLevel};

/// Spacing tolerance, in hours, for treating three samples as uniform.
const UNIFORM_SPACING_TOLERANCE_H: f64 = 1e-6;

/// Curvature below which the three samples are treated as a line.
const MIN_CURVATURE: f64 = 1e-10;

/// Strict local maxima and minima of `series`.
pub fn find_extrema(series: &[TideLevel]) -> Extrema {
    let mut extrema = Extrema::default();

    for w in series.windows(3) {
        let (prev, curr, next) = (w[0].height_m, w[1].height_m, w[2].height_m);
        if curr > prev && curr > next {
            extrema.highs.push(w[1]);
        } else if curr < prev && curr < next {
            extrema.lows.push(w[1]);
        }
    }

    extrema
}

/// Parabolic vertex through three consecutive samples.
///
/// Returns `peak` unchanged when the spacing is not uniform, the curvature
/// is negligible, or the vertex lies more than one step from `peak`.
pub fn refine_extremum(before: &TideLevel, peak: &TideLevel, after: &TideLevel) -> TideLevel {
    let dt1 = hours_between(peak.time, before.time);
    let dt2 = hours_between(after.time, peak.time);
    if (dt1 - dt2).abs() > UNIFORM_SPACING_TOLERANCE_H {
        return *peak;
    }

    let (h0, h1, h2) = (before.height_m, peak.height_m, after.height_m);
    let a = (h2 - 2.0 * h1 + h0) / (2.0 * dt1 * dt1);
    let b = (h2 - h0) / (2.0 * dt1);
    if a.abs() < MIN_CURVATURE {
        return *peak;
    }

    let offset_h = -b / (2.0 * a);
    if offset_h.abs() > dt1 {
        return *peak;
    }

    let offset = Duration::microseconds((offset_h * 3_600_000_000.0).round() as i64);
    TideLevel::new(peak.time + offset, h1 + b * offset_h + a * offset_h * offset_h)
}

/// Refine every extremum against the series it was detected in.
///
/// Extrema whose time is not a sample of `series`, or that sit on its
/// first or last sample, pass through unchanged. Both lists come back
/// sorted by time.
pub fn refine_extrema(series: &[TideLevel], extrema: &Extrema) -> Extrema {
    if series.len() < 3 {
        return extrema.clone();
    }

    let refine = |level: &TideLevel| -> TideLevel {
        match series.binary_search_by_key(&level.time, |s| s.time) {
            Ok(idx) if idx >= 1 && idx + 1 < series.len() => {
                refine_extremum(&series[idx - 1], &series[idx], &series[idx + 1])
            }
            _ => *level,
        }
    };

    let mut highs: Vec<TideLevel> = extrema.highs.iter().map(refine).collect();
    let mut lows: Vec<TideLevel> = extrema.lows.iter().map(refine).collect();
    highs.sort_by_key(|l| l.time);
    lows.sort_by_key(|l| l.time);

    Extrema { highs, lows }
}
