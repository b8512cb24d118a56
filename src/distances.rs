//! Goodness-of-fit distances between a sorted sample and a truncated power law.
//!
//! The reference distribution is always truncated to the sample's own
//! endpoints: for a sorted sample `x` with `lo = x[0]` and `hi = x[n-1]`, the
//! model density is proportional to `x^-alpha` on `[lo, hi]`.
//!
//! ## Available statistics
//!
//! - [`ks_distance_sorted`]: Kolmogorov-Smirnov distance (sup norm of the CDF gap)
//! - [`ad_distance_sorted`]: Anderson-Darling `A²`, weighting the tails
//! - [`discrete_ks_distance_sorted`]: KS distance against the integer-supported law

use crate::errors::{PowerLawError, PowerLawResult};

/// Below this |1 - alpha| the `alpha = 1` (log-uniform) limit is used.
pub(crate) const UNIT_EXPONENT_EPS: f64 = 1e-10;

/// Most integers a discrete support may hold.
///
/// Discrete fits and distances walk every integer between the rounded sample
/// endpoints, so wider supports are rejected.
pub const MAX_DISCRETE_SUPPORT: u64 = 1_000_000;

/// Clamp applied to CDF values before taking logarithms in the AD statistic.
const AD_CDF_CLAMP: f64 = 1e-12;

/// CDF of the continuous power law with exponent `alpha` truncated to `[lo, hi]`.
///
/// Evaluated as `expm1(t ln(x/lo)) / expm1(t ln(hi/lo))` with `t = 1 - alpha`,
/// which stays accurate on either side of `alpha = 1`. Values outside
/// `[lo, hi]` clamp to 0 and 1.
pub fn power_law_cdf(x: f64, lo: f64, hi: f64, alpha: f64) -> f64 {
    if x <= lo {
        return 0.0;
    }
    if x >= hi {
        return 1.0;
    }
    let t = 1.0 - alpha;
    let span = (hi / lo).ln();
    let at = (x / lo).ln();
    if t.abs() < UNIT_EXPONENT_EPS {
        at / span
    } else {
        (t * at).exp_m1() / (t * span).exp_m1()
    }
}

/// Cumulative probabilities of the discrete power law on `lo..=hi`.
///
/// Entry `k - lo` holds `P(X <= k)`. The last entry is exactly 1.
pub fn discrete_power_law_cdf_table(lo: u64, hi: u64, alpha: f64) -> Vec<f64> {
    let mut table: Vec<f64> = Vec::with_capacity((hi.saturating_sub(lo) + 1) as usize);
    let mut running = 0.0;
    for k in lo..=hi {
        running += (k as f64).powf(-alpha);
        table.push(running);
    }
    let total = running;
    for value in table.iter_mut() {
        *value /= total;
    }
    if let Some(last) = table.last_mut() {
        *last = 1.0;
    }
    table
}

/// Integer support `lo..=hi` between the rounded endpoints `min` and `max`.
///
/// `lo` is at least 1. Fails with [`PowerLawError::InvalidParameter`] when the
/// support would hold more than [`MAX_DISCRETE_SUPPORT`] integers.
pub fn discrete_support(min: f64, max: f64) -> PowerLawResult<(u64, u64)> {
    let lo = min.round().max(1.0);
    let hi = max.round().max(lo);
    let size = hi - lo + 1.0;
    if !(size <= MAX_DISCRETE_SUPPORT as f64) {
        return Err(PowerLawError::InvalidParameter {
            parameter: "discrete support size".to_string(),
            value: size,
            constraint: format!("at most {} integers", MAX_DISCRETE_SUPPORT),
        });
    }
    Ok((lo as u64, hi as u64))
}

fn require_nonempty(sample: &[f64]) -> PowerLawResult<()> {
    if sample.is_empty() {
        return Err(PowerLawError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    Ok(())
}

/// Kolmogorov-Smirnov distance between a sorted sample and the fitted law.
///
/// ```text
/// D = max_i max(F(x_i) - i/n, (i+1)/n - F(x_i))     (0-based i)
/// ```
pub fn ks_distance_sorted(sample: &[f64], alpha: f64) -> PowerLawResult<f64> {
    require_nonempty(sample)?;
    let n = sample.len() as f64;
    let lo = sample[0];
    let hi = sample[sample.len() - 1];

    let mut d_max = 0.0f64;
    for (i, &x) in sample.iter().enumerate() {
        let f = power_law_cdf(x, lo, hi, alpha);
        let d_minus = f - i as f64 / n;
        let d_plus = (i + 1) as f64 / n - f;
        d_max = d_max.max(d_minus).max(d_plus);
    }
    Ok(d_max)
}

/// Anderson-Darling distance between a sorted sample and the fitted law.
///
/// ```text
/// A² = -n - (1/n) Σ (2i - 1) [ln F(x_i) + ln(1 - F(x_{n+1-i}))]
/// ```
///
/// The truncated CDF is exactly 0 and 1 at the sample endpoints, so CDF values
/// are clamped to `[1e-12, 1 - 1e-12]` before the logarithms.
pub fn ad_distance_sorted(sample: &[f64], alpha: f64) -> PowerLawResult<f64> {
    require_nonempty(sample)?;
    let n = sample.len();
    let lo = sample[0];
    let hi = sample[n - 1];

    let cdf: Vec<f64> = sample
        .iter()
        .map(|&x| power_law_cdf(x, lo, hi, alpha).clamp(AD_CDF_CLAMP, 1.0 - AD_CDF_CLAMP))
        .collect();

    let mut sum = 0.0;
    for i in 0..n {
        let weight = (2 * i + 1) as f64;
        sum += weight * (cdf[i].ln() + (1.0 - cdf[n - 1 - i]).ln());
    }
    Ok(-(n as f64) - sum / n as f64)
}

/// KS distance against the discrete power law on the integers `[lo, hi]`.
///
/// Values are rounded to the nearest integer before counting, so continuous
/// surrogate samples are accepted too. The gap is checked at every integer of
/// the support, not only at observed values, since the model CDF keeps rising
/// between observations.
pub fn discrete_ks_distance_sorted(sample: &[f64], alpha: f64) -> PowerLawResult<f64> {
    require_nonempty(sample)?;
    let (lo, hi) = discrete_support(sample[0], sample[sample.len() - 1])?;
    let n = sample.len() as f64;

    let table = discrete_power_law_cdf_table(lo, hi, alpha);
    let mut cursor = 0usize;
    let mut d_max = 0.0f64;
    for (offset, &model) in table.iter().enumerate() {
        let k = (lo + offset as u64) as f64;
        while cursor < sample.len() && sample[cursor].round() <= k {
            cursor += 1;
        }
        let empirical = cursor as f64 / n;
        d_max = d_max.max((empirical - model).abs());
    }
    Ok(d_max)
}
