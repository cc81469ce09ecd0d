//! Test data generators for synthetic grids and tide series.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use chrono::{DateTime, Duration, Utc};

/// Evenly spaced axis of `n` coordinates starting at `start`.
///
/// # Example
///
/// ```
/// use test_utils::axis;
///
/// assert_eq!(axis(-1.0, 0.5, 5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
/// ```
pub fn axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data is being read/written correctly
/// by checking that grid[row][col] == col * 1000 + row.
///
/// # Returns
///
/// A `Vec<f64>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Row-major values of `f(lat, lon)` over the given axes.
pub fn field_over(lats: &[f64], lons: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    lats.iter()
        .flat_map(|&lat| lons.iter().map(move |&lon| (lat, lon)))
        .map(|(lat, lon)| f(lat, lon))
        .collect()
}

/// Same value everywhere.
pub fn constant_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// `n` samples of `amplitude * sin(2π t / period)` starting at `start`.
///
/// With `n = 13` and `step = period / 12` this covers one full period
/// with the crest at index 3 and the trough at index 9.
pub fn sinusoid_series(
    start: DateTime<Utc>,
    step: Duration,
    n: usize,
    period: Duration,
    amplitude: f64,
) -> Vec<(DateTime<Utc>, f64)> {
    let period_s = period.num_milliseconds() as f64 / 1000.0;
    (0..n)
        .map(|i| {
            let offset = step * i as i32;
            let t = offset.num_milliseconds() as f64 / 1000.0;
            let h = amplitude * (2.0 * std::f64::consts::PI * t / period_s).sin();
            (start + offset, h)
        })
        .collect()
}

/// Closed-form heights `amplitude * cos(speed * h - phase)` at the given hours.
pub fn cosine_heights(amplitude: f64, speed_deg_per_hour: f64, phase_deg: f64, hours: &[f64]) -> Vec<f64> {
    hours
        .iter()
        .map(|h| amplitude * (speed_deg_per_hour * h - phase_deg).to_radians().cos())
        .collect()
}
