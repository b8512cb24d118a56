//! Synthetic truncated power-law samples.
//!
//! These generators drive the parametric bootstrap behind the true p-value,
//! and double as fixtures for validating the search on data with a known
//! scaling range.
//!
//! ## Available Generators
//!
//! - [`generate_power_law`]: continuous law on `[xmin, xmax]` by inverse-CDF sampling
//! - [`generate_discrete_power_law`]: integer law on `xmin..=xmax` by table lookup

use crate::distances::{discrete_power_law_cdf_table, MAX_DISCRETE_SUPPORT, UNIT_EXPONENT_EPS};
use crate::errors::{validate_parameter, PowerLawError, PowerLawResult};
use rand::Rng;

fn validate_range(xmin: f64, xmax: f64) -> PowerLawResult<()> {
    if !(xmin > 0.0 && xmin.is_finite()) {
        return Err(PowerLawError::InvalidParameter {
            parameter: "xmin".to_string(),
            value: xmin,
            constraint: "finite and strictly positive".to_string(),
        });
    }
    if !(xmax > xmin && xmax.is_finite()) {
        return Err(PowerLawError::InvalidParameter {
            parameter: "xmax".to_string(),
            value: xmax,
            constraint: format!("finite and greater than xmin = {}", xmin),
        });
    }
    Ok(())
}

/// Draw `n` values from the power law `p(x) ∝ x^-alpha` truncated to `[xmin, xmax]`.
///
/// Uses the inverse CDF `x = xmin · (1 + u·expm1(t·L))^(1/t)` with
/// `t = 1 - alpha` and `L = ln(xmax/xmin)`, falling back to the log-uniform
/// `xmin · (xmax/xmin)^u` at `alpha = 1`. Output is unsorted.
///
/// # Example
/// ```rust
/// use powerlaw_range::generators::generate_power_law;
/// use powerlaw_range::seeded_rng::SeededRng;
///
/// let mut rng = SeededRng::with_seed(1);
/// let x = generate_power_law(100, 5.0, 500.0, 2.5, &mut rng).unwrap();
/// assert!(x.iter().all(|&v| (5.0..=500.0).contains(&v)));
/// ```
pub fn generate_power_law<R>(
    n: usize,
    xmin: f64,
    xmax: f64,
    alpha: f64,
    rng: &mut R,
) -> PowerLawResult<Vec<f64>>
where
    R: Rng + ?Sized,
{
    validate_range(xmin, xmax)?;
    validate_parameter(alpha, f64::MIN, f64::MAX, "alpha")?;

    let t = 1.0 - alpha;
    let span = (xmax / xmin).ln();
    let scale = (t * span).exp_m1();

    let sample = (0..n)
        .map(|_| {
            let u: f64 = rng.gen();
            let x = if t.abs() < UNIT_EXPONENT_EPS {
                xmin * (u * span).exp()
            } else {
                xmin * ((u * scale).ln_1p() / t).exp()
            };
            x.clamp(xmin, xmax)
        })
        .collect();
    Ok(sample)
}

/// Draw `n` integers from the discrete power law `P(k) ∝ k^-alpha` on `xmin..=xmax`.
///
/// Values are returned as `f64` so they can be fed straight into the search.
pub fn generate_discrete_power_law<R>(
    n: usize,
    xmin: u64,
    xmax: u64,
    alpha: f64,
    rng: &mut R,
) -> PowerLawResult<Vec<f64>>
where
    R: Rng + ?Sized,
{
    if xmin == 0 || xmax < xmin {
        return Err(PowerLawError::InvalidParameter {
            parameter: "xmin".to_string(),
            value: xmin as f64,
            constraint: format!("1 <= xmin <= xmax = {}", xmax),
        });
    }
    if xmax - xmin >= MAX_DISCRETE_SUPPORT {
        return Err(PowerLawError::InvalidParameter {
            parameter: "xmax".to_string(),
            value: xmax as f64,
            constraint: format!("at most {} integers from xmin = {}", MAX_DISCRETE_SUPPORT, xmin),
        });
    }
    validate_parameter(alpha, f64::MIN, f64::MAX, "alpha")?;

    let table = discrete_power_law_cdf_table(xmin, xmax, alpha);
    let last = table.len() - 1;
    let sample = (0..n)
        .map(|_| {
            let u: f64 = rng.gen();
            let offset = table.partition_point(|&c| c <= u).min(last);
            (xmin + offset as u64) as f64
        })
        .collect();
    Ok(sample)
}
