//! Sorting and index-lookup utilities over sorted samples.
//!
//! The search works on one ascending copy of the data. These helpers map real
//! boundaries back onto indices into that copy, in both the continuous and the
//! discrete (integer-step) flavour.

use std::cmp::Ordering;

/// Safe comparison for floating point values (handles NaN)
pub fn float_total_cmp(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater, // push NaN to end
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

/// Sort a slice ascending in place, NaNs last.
pub fn sort_f64_slice(values: &mut [f64]) {
    values.sort_unstable_by(float_total_cmp);
}

/// Return an ascending copy of `values`.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sort_f64_slice(&mut sorted);
    sorted
}

/// Rounding direction for [`find_nearest_idx_discrete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round the boundary up and take the first index at or above it.
    Up,
    /// Round the boundary down and take the last index at or below it.
    Down,
}

/// Index of the element of `sorted` closest to `value`.
///
/// Ties, including runs of equal values, resolve to the lowest index.
/// Returns 0 for an empty slice.
///
/// # Example
/// ```rust
/// use powerlaw_range::math_utils::find_nearest_idx;
///
/// let x = [1.0, 2.0, 2.0, 4.0];
/// assert_eq!(find_nearest_idx(&x, 2.4), 1);
/// assert_eq!(find_nearest_idx(&x, 3.0), 1);
/// assert_eq!(find_nearest_idx(&x, 9.0), 3);
/// ```
pub fn find_nearest_idx(sorted: &[f64], value: f64) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    let pos = sorted.partition_point(|&x| x < value);
    if pos == 0 {
        return 0;
    }
    if pos == sorted.len() {
        let last = sorted[pos - 1];
        return sorted.partition_point(|&x| x < last);
    }

    let below = sorted[pos - 1];
    let above = sorted[pos];
    if value - below <= above - value {
        sorted.partition_point(|&x| x < below)
    } else {
        pos
    }
}

/// Index lookup for integer-valued data.
///
/// [`Rounding::Up`] gives the first index whose value is `>= ceil(value)`,
/// [`Rounding::Down`] the last index whose value is `<= floor(value)`. Both are
/// clamped into the slice, so out-of-range boundaries map to the ends.
pub fn find_nearest_idx_discrete(sorted: &[f64], value: f64, rounding: Rounding) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    let last = sorted.len() - 1;
    match rounding {
        Rounding::Up => {
            let target = value.ceil();
            sorted.partition_point(|&x| x < target).min(last)
        }
        Rounding::Down => {
            let target = value.floor();
            sorted.partition_point(|&x| x <= target).saturating_sub(1)
        }
    }
}

/// Index of the first maximum of `values`, skipping NaNs.
///
/// The scan uses a strict comparison, so the earliest of several equal
/// maxima wins. Returns `None` when no value is comparable.
pub fn argmax_first(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
