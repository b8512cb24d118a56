//! Significance of a power-law fit over a candidate range.
//!
//! Two p-values are used to judge a candidate `(xmin, xmax)`:
//!
//! - **Approximate p-value** ([`approximate_p_value`]): closed-form Kolmogorov
//!   tail probability of the KS distance with a small-sample correction
//!   (Vrbik 2020). It ignores that alpha was fitted to the same data, so it
//!   always overestimates the true value. The search uses it only as a sieve.
//! - **True p-value** ([`find_true_p`]): parametric bootstrap following
//!   Deluca & Corral (2013). Surrogates are drawn from the fitted law, refitted,
//!   and the fraction fitting at least as badly as the data is the p-value.
//!   High p means the power-law hypothesis is plausible over the range.

use crate::config::TruePValueConfig;
use crate::errors::{validate_all_finite, validate_parameter, PowerLawError, PowerLawResult};
use crate::exponent_fit::fit_exponent;
use crate::generators::generate_power_law;
use crate::math_utils::{find_nearest_idx, sort_f64_slice, sorted_copy};
use crate::seeded_rng::SeededRng;
use crate::strategy::DistanceType;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Series terms used by [`approximate_p_value`].
pub const EXPFUN_TERMS: usize = 10;

/// Truncated Kolmogorov series `2 Σ_{i=1}^{numterms} (-1)^(i-1) exp(-2 i² x²)`.
///
/// With an even number of terms the partial sum lies in `[0, 1]`.
/// `expfun(0, 10) == 0`; for `x` above roughly 0.5 it matches the Kolmogorov
/// survival function and decays to 0.
///
/// # Example
/// ```rust
/// use powerlaw_range::monte_carlo::expfun;
///
/// assert_eq!(expfun(0.0, 10), 0.0);
/// assert!((expfun(1.0, 10) - 0.27).abs() < 1e-3);
/// ```
pub fn expfun(x: f64, numterms: usize) -> f64 {
    let x2 = x * x;
    let mut val = 0.0;
    for i in 1..=numterms {
        let term = (-2.0 * (i * i) as f64 * x2).exp();
        if i % 2 == 1 {
            val += term;
        } else {
            val -= term;
        }
    }
    2.0 * val
}

/// Approximate p-value of a KS-type `distance` over `n` points.
///
/// With `z = d·√n` this evaluates `expfun(z + 0.17/√n + (z - 1)/(4n))`.
/// Returns 0 for `n = 0`.
pub fn approximate_p_value(distance: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    let sqrt_n = nf.sqrt();
    let z = distance * sqrt_n;
    expfun(z + 0.17 / sqrt_n + (z - 1.0) / (4.0 * nf), EXPFUN_TERMS)
}

/// Monte Carlo p-value with its binomial standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PValueEstimate {
    /// Fraction of surrogates fitting at least as badly as the data
    pub p: f64,
    /// One-sigma standard error, `sqrt(p (1 - p) / runs)`
    pub sigma: f64,
    /// Surrogates drawn
    pub runs: usize,
}

impl PValueEstimate {
    /// Estimate from `count` exceedances out of `runs` surrogates.
    pub fn from_counts(count: usize, runs: usize) -> Self {
        let p = count as f64 / runs as f64;
        let sigma = (p * (1.0 - p) / runs as f64).sqrt();
        Self { p, sigma, runs }
    }

    /// Normal-approximation interval `p ± z·sigma` at `level`, clamped to `[0, 1]`.
    pub fn confidence_interval(&self, level: f64) -> PowerLawResult<(f64, f64)> {
        validate_parameter(level, 0.0, 1.0, "confidence level")?;
        if level >= 1.0 {
            return Ok((0.0, 1.0));
        }
        let normal = Normal::new(0.0, 1.0).map_err(|e| PowerLawError::NumericalError {
            reason: format!("standard normal unavailable: {}", e),
        })?;
        let z = normal.inverse_cdf(0.5 + 0.5 * level);
        Ok((
            (self.p - z * self.sigma).max(0.0),
            (self.p + z * self.sigma).min(1.0),
        ))
    }
}

/// True p-value of the range `[xmin, xmax]` within sorted data.
///
/// The boundaries are snapped with [`find_nearest_idx`]. The exponent is
/// always fitted with the continuous estimator and surrogates are continuous;
/// only the distance follows `distance_type` (its screening distance, so AD
/// runs compare KS distances).
pub fn find_true_p(
    sorted: &[f64],
    xmin: f64,
    xmax: f64,
    runs: usize,
    distance_type: DistanceType,
    rng: &mut SeededRng,
) -> PowerLawResult<PValueEstimate> {
    if runs == 0 {
        return Err(PowerLawError::InvalidParameter {
            parameter: "runs".to_string(),
            value: 0.0,
            constraint: "must be greater than 0".to_string(),
        });
    }
    let xmin_idx = find_nearest_idx(sorted, xmin);
    let xmax_idx = find_nearest_idx(sorted, xmax);
    if xmax_idx <= xmin_idx {
        return Err(PowerLawError::InvalidParameter {
            parameter: "xmax".to_string(),
            value: xmax,
            constraint: format!("must map above xmin = {} in the data", xmin),
        });
    }

    let trimmed = &sorted[xmin_idx..=xmax_idx];
    let n = trimmed.len();
    let alpha = fit_exponent(trimmed)?;
    let observed = distance_type.screening_distance(trimmed, alpha)?;

    let mut exceed = 0usize;
    for _ in 0..runs {
        let mut synthetic = generate_power_law(n, xmin, xmax, alpha, rng)?;
        sort_f64_slice(&mut synthetic);
        let alpha_synthetic = fit_exponent(&synthetic)?;
        let d_synthetic = distance_type.screening_distance(&synthetic, alpha_synthetic)?;
        if d_synthetic >= observed {
            exceed += 1;
        }
    }

    Ok(PValueEstimate::from_counts(exceed, runs))
}

/// True p-values for many candidate ranges of the same sorted data.
///
/// Candidate `i` draws from `SeededRng::for_stream(master_seed, i)`, so the
/// output does not depend on scheduling. With `parallel` set and the
/// `parallel` feature enabled, candidates are spread over the rayon pool.
pub fn find_true_p_batch(
    sorted: &[f64],
    candidates: &[(f64, f64)],
    runs: usize,
    distance_type: DistanceType,
    master_seed: u64,
    parallel: bool,
) -> PowerLawResult<Vec<f64>> {
    let estimate = |i: usize, &(xmin, xmax): &(f64, f64)| -> PowerLawResult<f64> {
        let mut rng = SeededRng::for_stream(master_seed, i);
        find_true_p(sorted, xmin, xmax, runs, distance_type, &mut rng).map(|e| e.p)
    };

    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return candidates
                .par_iter()
                .enumerate()
                .map(|(i, c)| estimate(i, c))
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| estimate(i, c))
        .collect()
}

/// True p-value of a fixed `[xmin, xmax]` in unsorted data (KS distance).
///
/// Discrete data are not supported yet and give
/// [`PowerLawError::NotImplemented`].
///
/// # Example
/// ```rust
/// use powerlaw_range::config::TruePValueConfig;
/// use powerlaw_range::generators::generate_power_law;
/// use powerlaw_range::monte_carlo::true_p_value;
/// use powerlaw_range::seeded_rng::SeededRng;
///
/// let mut rng = SeededRng::with_seed(4);
/// let data = generate_power_law(300, 1.0, 100.0, 2.0, &mut rng).unwrap();
/// let config = TruePValueConfig { runs: 40, seed: Some(1), ..Default::default() };
/// let estimate = true_p_value(&data, 1.0, 100.0, &config).unwrap();
/// assert!((0.0..=1.0).contains(&estimate.p));
/// ```
pub fn true_p_value(
    data: &[f64],
    xmin: f64,
    xmax: f64,
    config: &TruePValueConfig,
) -> PowerLawResult<PValueEstimate> {
    if config.discrete {
        log::error!("True p-value for discrete data requested; not implemented");
        return Err(PowerLawError::NotImplemented {
            feature: "true p-value for discrete data".to_string(),
        });
    }
    validate_all_finite(data, "data")?;
    let sorted = sorted_copy(data);
    let mut rng = match config.seed {
        Some(seed) => SeededRng::with_seed(seed),
        None => SeededRng::from_entropy(),
    };
    find_true_p(&sorted, xmin, xmax, config.runs, DistanceType::Ks, &mut rng)
}
