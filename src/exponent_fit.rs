//! Maximum-likelihood exponent estimation for truncated power laws.
//!
//! The exponent is found by minimising the per-point negative log-likelihood
//! with Brent's bounded method. The search interval includes `alpha <= 1`:
//! such fits are legitimate for a truncated law, and callers decide whether to
//! accept them.
//!
//! # Mathematical Foundation
//!
//! For a sorted sample `x` with `lo = x[0]`, `hi = x[n-1]`, `L = ln(hi/lo)` and
//! `t = 1 - alpha`, the continuous negative log-likelihood per point is
//!
//! ```text
//! ℓ(alpha) = -ln(t / expm1(t·L)) + t·ln(lo) + alpha·mean(ln x)
//! ```
//!
//! which tends to `ln L + ln lo + mean(ln x)` as `alpha → 1`. The discrete
//! analogue on the integers `lo..=hi` is
//!
//! ```text
//! ℓ(alpha) = ln Σ_{k=lo}^{hi} k^-alpha + alpha·mean(ln x)
//! ```

use crate::distances::{discrete_support, UNIT_EXPONENT_EPS};
use crate::errors::{validate_data_length, PowerLawError, PowerLawResult};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Golden section ratio, (3 - √5) / 2.
const GOLDEN: f64 = 0.381_966_011_250_105;

/// Absolute floor added to Brent's relative tolerance.
const ZEPS: f64 = 1e-11;

/// Bounds and stopping rules for the exponent search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExponentFitConfig {
    /// Lower bound of the exponent search interval
    pub lower: f64,
    /// Upper bound of the exponent search interval
    pub upper: f64,
    /// Relative tolerance on the exponent
    pub tolerance: f64,
    /// Maximum Brent iterations
    pub max_iterations: usize,
}

impl Default for ExponentFitConfig {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 10.0,
            tolerance: 1e-8,
            max_iterations: 200,
        }
    }
}

/// Minimise `f` on `[lower, upper]` with Brent's method.
///
/// Combines golden-section steps with parabolic interpolation. NaN objective
/// values are treated as `+inf`. If `max_iterations` is reached the best point
/// found so far is returned.
pub fn brent_minimize<F>(
    f: F,
    lower: f64,
    upper: f64,
    tolerance: f64,
    max_iterations: usize,
) -> PowerLawResult<f64>
where
    F: Fn(f64) -> f64,
{
    if !(lower.is_finite() && upper.is_finite()) || lower >= upper {
        return Err(PowerLawError::InvalidParameter {
            parameter: "bracket".to_string(),
            value: upper - lower,
            constraint: "finite bounds with lower < upper".to_string(),
        });
    }

    let objective = |x: f64| {
        let y = f(x);
        if y.is_nan() {
            f64::INFINITY
        } else {
            y
        }
    };

    let (mut a, mut b) = (lower, upper);
    let mut x = a + GOLDEN * (b - a);
    let (mut w, mut v) = (x, x);
    let mut fx = objective(x);
    let (mut fw, mut fv) = (fx, fx);
    let mut d: f64 = 0.0;
    let mut e: f64 = 0.0;

    for _ in 0..max_iterations {
        let midpoint = 0.5 * (a + b);
        let tol1 = tolerance * x.abs() + ZEPS;
        let tol2 = 2.0 * tol1;

        if (x - midpoint).abs() <= tol2 - 0.5 * (b - a) {
            return Ok(x);
        }

        let mut golden_step = true;
        if e.abs() > tol1 {
            // Trial parabolic fit through x, w, v
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let e_prev = e;
            e = d;

            if p.abs() < (0.5 * q * e_prev).abs() && p > q * (a - x) && p < q * (b - x) {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = tol1.copysign(midpoint - x);
                }
                golden_step = false;
            }
        }
        if golden_step {
            e = if x >= midpoint { a - x } else { b - x };
            d = GOLDEN * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else {
            x + tol1.copysign(d)
        };
        let fu = objective(u);

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    log::debug!(
        "Brent minimisation stopped after {} iterations at x = {}",
        max_iterations,
        x
    );
    Ok(x)
}

/// Summary statistics the likelihoods depend on.
struct LogMoments {
    lo: f64,
    hi: f64,
    mean_ln: f64,
}

fn log_moments(sample: &[f64]) -> PowerLawResult<LogMoments> {
    validate_data_length(sample, 2, "exponent fit")?;
    let lo = sample[0];
    let hi = sample[sample.len() - 1];
    if !(lo > 0.0) {
        return Err(PowerLawError::InvalidParameter {
            parameter: "sample minimum".to_string(),
            value: lo,
            constraint: "must be strictly positive".to_string(),
        });
    }
    if !(hi > lo) {
        return Err(PowerLawError::InvalidParameter {
            parameter: "sample range".to_string(),
            value: hi - lo,
            constraint: "maximum must exceed minimum".to_string(),
        });
    }
    let mean_ln = sample.iter().map(|x| x.ln()).sum::<f64>() / sample.len() as f64;
    Ok(LogMoments { lo, hi, mean_ln })
}

/// Per-point negative log-likelihood of the continuous truncated power law.
fn continuous_nll(alpha: f64, ln_lo: f64, span: f64, mean_ln: f64) -> f64 {
    let t = 1.0 - alpha;
    let ln_norm = if t.abs() < UNIT_EXPONENT_EPS {
        -span.ln()
    } else {
        (t / (t * span).exp_m1()).ln()
    };
    -ln_norm + t * ln_lo + alpha * mean_ln
}

/// Maximum-likelihood exponent of a sorted continuous sample.
///
/// The model is truncated to the sample's own endpoints. A result `<= 1` is
/// returned as-is; it is not an error here.
///
/// # Example
/// ```rust
/// use powerlaw_range::exponent_fit::fit_exponent;
///
/// // Quantiles of a power law with alpha = 2 on [1, 100]
/// let sample: Vec<f64> = (0..200)
///     .map(|i| {
///         let u = (i as f64 + 0.5) / 200.0;
///         1.0 / (1.0 - u * (1.0 - 0.01))
///     })
///     .collect();
/// let alpha = fit_exponent(&sample).unwrap();
/// assert!((alpha - 2.0).abs() < 0.05);
/// ```
pub fn fit_exponent(sample: &[f64]) -> PowerLawResult<f64> {
    fit_exponent_with_config(sample, &ExponentFitConfig::default())
}

/// [`fit_exponent`] with explicit search bounds and tolerances.
pub fn fit_exponent_with_config(sample: &[f64], config: &ExponentFitConfig) -> PowerLawResult<f64> {
    let moments = log_moments(sample)?;
    let ln_lo = moments.lo.ln();
    let span = (moments.hi / moments.lo).ln();
    let mean_ln = moments.mean_ln;

    brent_minimize(
        |alpha| continuous_nll(alpha, ln_lo, span, mean_ln),
        config.lower,
        config.upper,
        config.tolerance,
        config.max_iterations,
    )
}

/// Maximum-likelihood exponent of a sorted integer-valued sample.
///
/// The support is the integers between the rounded sample endpoints; each
/// likelihood evaluation sums over that support.
pub fn fit_exponent_discrete(sample: &[f64]) -> PowerLawResult<f64> {
    fit_exponent_discrete_with_config(sample, &ExponentFitConfig::default())
}

/// [`fit_exponent_discrete`] with explicit search bounds and tolerances.
pub fn fit_exponent_discrete_with_config(
    sample: &[f64],
    config: &ExponentFitConfig,
) -> PowerLawResult<f64> {
    let moments = log_moments(sample)?;
    let (lo, hi) = discrete_support(moments.lo, moments.hi)?;
    let ln_support: Vec<f64> = (lo..=hi).map(|k| (k as f64).ln()).collect();
    let mean_ln = moments.mean_ln;

    brent_minimize(
        |alpha| {
            let z: f64 = ln_support.iter().map(|&lk| (-alpha * lk).exp()).sum();
            z.ln() + alpha * mean_ln
        },
        config.lower,
        config.upper,
        config.tolerance,
        config.max_iterations,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{generate_discrete_power_law, generate_power_law};
    use crate::math_utils::sort_f64_slice;
    use crate::seeded_rng::SeededRng;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_brent_minimize_parabola() {
        let x = brent_minimize(|x| (x - 1.7).powi(2) + 3.0, 0.0, 10.0, 1e-10, 200).unwrap();
        assert_approx_eq!(x, 1.7, 1e-7);
    }

    #[test]
    fn test_brent_minimize_boundary_minimum() {
        let x = brent_minimize(|x| x, 2.0, 5.0, 1e-10, 200).unwrap();
        assert!((x - 2.0).abs() < 1e-6, "expected boundary minimum, got {}", x);
    }

    #[test]
    fn test_brent_minimize_rejects_bad_bracket() {
        assert!(brent_minimize(|x| x * x, 1.0, 1.0, 1e-8, 10).is_err());
        assert!(brent_minimize(|x| x * x, f64::NEG_INFINITY, 1.0, 1e-8, 10).is_err());
    }

    #[test]
    fn test_brent_minimize_tolerates_nan() {
        let x = brent_minimize(
            |x| if x < 1.0 { f64::NAN } else { (x - 3.0).powi(2) },
            0.0,
            10.0,
            1e-10,
            200,
        )
        .unwrap();
        assert_approx_eq!(x, 3.0, 1e-6);
    }

    #[test]
    fn test_continuous_nll_is_smooth_through_one() {
        let (ln_lo, span, mean_ln) = (0.0, 100f64.ln(), 1.3);
        let at = continuous_nll(1.0, ln_lo, span, mean_ln);
        let near = continuous_nll(1.0 + 1e-6, ln_lo, span, mean_ln);
        assert_approx_eq!(at, near, 1e-5);
    }

    #[test]
    fn test_fit_exponent_recovers_alpha() {
        let mut rng = SeededRng::with_seed(11);
        for &alpha in &[1.5, 2.0, 3.0] {
            let mut sample = generate_power_law(5000, 1.0, 1000.0, alpha, &mut rng).unwrap();
            sort_f64_slice(&mut sample);
            let fitted = fit_exponent(&sample).unwrap();
            assert!(
                (fitted - alpha).abs() < 0.1,
                "alpha {} fitted as {}",
                alpha,
                fitted
            );
        }
    }

    #[test]
    fn test_fit_exponent_uniform_data_is_below_one() {
        let sample: Vec<f64> = (0..200).map(|i| 1.0 + i as f64 * 0.5).collect();
        let fitted = fit_exponent(&sample).unwrap();
        assert!(fitted <= 1.0, "uniform data fitted as {}", fitted);
    }

    #[test]
    fn test_fit_exponent_errors() {
        assert!(matches!(
            fit_exponent(&[2.0]),
            Err(PowerLawError::InsufficientData { .. })
        ));
        assert!(matches!(
            fit_exponent(&[3.0, 3.0, 3.0]),
            Err(PowerLawError::InvalidParameter { .. })
        ));
        assert!(matches!(
            fit_exponent(&[0.0, 1.0, 2.0]),
            Err(PowerLawError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_fit_exponent_discrete_recovers_alpha() {
        let mut rng = SeededRng::with_seed(5);
        let mut sample = generate_discrete_power_law(4000, 1, 200, 2.2, &mut rng).unwrap();
        sort_f64_slice(&mut sample);
        let fitted = fit_exponent_discrete(&sample).unwrap();
        assert!((fitted - 2.2).abs() < 0.1, "fitted {}", fitted);
    }

    #[test]
    fn test_fit_exponent_discrete_rejects_huge_support() {
        let sample = [1.0, 1.0, 2.0, 3.0, 1e10];
        assert!(matches!(
            fit_exponent_discrete(&sample),
            Err(PowerLawError::InvalidParameter { .. })
        ));
        // The continuous fit has no support table and still works.
        assert!(fit_exponent(&sample).is_ok());
    }
}
