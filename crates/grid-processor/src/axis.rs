//! Searches over monotonic coordinate axes.

/// Index `i` such that `axis[i] <= value <= axis[i + 1]`.
///
/// `axis` must be strictly increasing. Returns `None` when `value` lies
/// outside the axis or the axis has fewer than two points.
pub fn bracket(axis: &[f64], value: f64) -> Option<usize> {
    let (&first, &last) = (axis.first()?, axis.last()?);
    if axis.len() < 2 || value.is_nan() || value < first || value > last {
        return None;
    }

    // First index whose coordinate exceeds `value`
    let upper = axis.partition_point(|&c| c <= value);
    Some(upper.saturating_sub(1).min(axis.len() - 2))
}

/// Index of the coordinate closest to `target` on an ascending axis.
///
/// Ties resolve to the higher index. An empty axis yields 0.
pub fn nearest_index(axis: &[f64], target: f64) -> usize {
    if axis.is_empty() {
        return 0;
    }

    let left = axis.partition_point(|&c| c < target).min(axis.len() - 1);
    if left > 0 && (axis[left - 1] - target).abs() < (axis[left] - target).abs() {
        left - 1
    } else {
        left
    }
}

/// Clamp `value` into `[lo, hi]`, preferring `lo` if the range is empty.
pub fn clamp_index(value: isize, lo: isize, hi: isize) -> isize {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// True when every coordinate is greater than the one before it.
pub fn is_strictly_increasing(axis: &[f64]) -> bool {
    axis.windows(2).all(|w| w[1] > w[0])
}
