//! Random (xmin, xmax) proposals for the scaling-range sweep.
//!
//! Both boundaries are drawn log-uniformly between the data extremes and
//! snapped onto data values. A proposal is kept only when it spans at least
//! [`MIN_INDEX_SPAN`] index steps and a ratio of at least [`MIN_RANGE_RATIO`].

use crate::errors::{PowerLawError, PowerLawResult};
use crate::monte_carlo::approximate_p_value;
use crate::results::{Trial, DEGENERATE_DISTANCE, DEGENERATE_SCREENING_DISTANCE};
use crate::strategy::DistanceType;
use rand::Rng;

/// Minimum `xmax_idx - xmin_idx` of an accepted proposal.
pub const MIN_INDEX_SPAN: usize = 10;

/// Minimum `xmax / xmin` of an accepted proposal.
pub const MIN_RANGE_RATIO: f64 = 2.0;

/// Accepted boundaries of one proposal, as data values and their indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialBounds {
    /// Lower boundary
    pub xmin: f64,
    /// Upper boundary
    pub xmax: f64,
    /// Index of `xmin` in the sorted data
    pub xmin_idx: usize,
    /// Index of `xmax` in the sorted data
    pub xmax_idx: usize,
}

impl TrialBounds {
    /// Points between the boundaries, inclusive.
    pub fn point_count(&self) -> usize {
        self.xmax_idx - self.xmin_idx + 1
    }
}

/// Rejection sampler over one sorted dataset.
#[derive(Debug, Clone)]
pub struct TrialGenerator<'a> {
    sorted: &'a [f64],
    log_min: f64,
    log_span: f64,
    distance_type: DistanceType,
    max_attempts: Option<usize>,
}

impl<'a> TrialGenerator<'a> {
    /// Sampler over ascending, strictly positive data.
    ///
    /// `max_attempts` caps the redraws per proposal; `None` loops until a
    /// proposal is accepted, which never happens on data with fewer than
    /// `MIN_INDEX_SPAN + 1` points or a max/min ratio below `MIN_RANGE_RATIO`.
    pub fn new(
        sorted: &'a [f64],
        distance_type: DistanceType,
        max_attempts: Option<usize>,
    ) -> PowerLawResult<Self> {
        let (first, last) = match (sorted.first(), sorted.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Err(PowerLawError::InsufficientData {
                    required: MIN_INDEX_SPAN + 1,
                    actual: 0,
                })
            }
        };
        if !(first > 0.0) {
            return Err(PowerLawError::InvalidParameter {
                parameter: "data minimum".to_string(),
                value: first,
                constraint: "strictly positive".to_string(),
            });
        }
        let log_min = first.ln();
        Ok(Self {
            sorted,
            log_min,
            log_span: last.ln() - log_min,
            distance_type,
            max_attempts,
        })
    }

    fn draw_log_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        (self.log_min + u * self.log_span).exp()
    }

    /// Draw boundaries until one pair is acceptable.
    pub fn next_bounds<R: Rng + ?Sized>(&self, rng: &mut R) -> PowerLawResult<TrialBounds> {
        let mut attempts = 0usize;
        loop {
            if let Some(cap) = self.max_attempts {
                if attempts >= cap {
                    log::warn!("Trial sampler gave up after {} attempts", attempts);
                    return Err(PowerLawError::TrialBudgetExhausted { attempts });
                }
            }
            attempts += 1;

            let xmin_idx = self
                .distance_type
                .lower_index(self.sorted, self.draw_log_uniform(rng));
            let xmax_idx = self
                .distance_type
                .upper_index(self.sorted, self.draw_log_uniform(rng));
            let xmin = self.sorted[xmin_idx];
            let xmax = self.sorted[xmax_idx];

            if xmax_idx >= xmin_idx + MIN_INDEX_SPAN && xmax >= MIN_RANGE_RATIO * xmin {
                return Ok(TrialBounds {
                    xmin,
                    xmax,
                    xmin_idx,
                    xmax_idx,
                });
            }
        }
    }

    /// Fit and score the data between `bounds`.
    pub fn evaluate(&self, bounds: TrialBounds) -> PowerLawResult<Trial> {
        evaluate_trial(self.sorted, bounds, self.distance_type)
    }

    /// One accepted and scored proposal.
    pub fn next_trial<R: Rng + ?Sized>(&self, rng: &mut R) -> PowerLawResult<Trial> {
        let bounds = self.next_bounds(rng)?;
        self.evaluate(bounds)
    }
}

/// Fit and score `sorted[xmin_idx..=xmax_idx]`.
///
/// An exponent `<= 1` leaves the distance at [`DEGENERATE_DISTANCE`] and
/// screens with [`DEGENERATE_SCREENING_DISTANCE`].
pub fn evaluate_trial(
    sorted: &[f64],
    bounds: TrialBounds,
    distance_type: DistanceType,
) -> PowerLawResult<Trial> {
    let trimmed = &sorted[bounds.xmin_idx..=bounds.xmax_idx];
    let n = trimmed.len();
    let alpha = distance_type.fit(trimmed)?;

    let (distance, screening) = if alpha > 1.0 {
        let distance = distance_type.distance(trimmed, alpha)?;
        let screening = match distance_type {
            DistanceType::Ad => distance_type.screening_distance(trimmed, alpha)?,
            DistanceType::Ks | DistanceType::Discrete => distance,
        };
        (distance, screening)
    } else {
        (DEGENERATE_DISTANCE, DEGENERATE_SCREENING_DISTANCE)
    };

    Ok(Trial {
        xmin: bounds.xmin,
        xmax: bounds.xmax,
        xmin_idx: bounds.xmin_idx,
        xmax_idx: bounds.xmax_idx,
        alpha,
        distance,
        approx_p: approximate_p_value(screening, n),
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distances::ks_distance_sorted;
    use crate::generators::{generate_discrete_power_law, generate_power_law};
    use crate::math_utils::sorted_copy;
    use crate::seeded_rng::SeededRng;

    fn continuous_data() -> Vec<f64> {
        let mut rng = SeededRng::with_seed(5);
        sorted_copy(&generate_power_law(800, 1.0, 1000.0, 2.0, &mut rng).unwrap())
    }

    #[test]
    fn test_bounds_invariants_continuous() {
        let data = continuous_data();
        let gen = TrialGenerator::new(&data, DistanceType::Ks, Some(10_000)).unwrap();
        let mut rng = SeededRng::with_seed(1);
        for _ in 0..500 {
            let b = gen.next_bounds(&mut rng).unwrap();
            assert!(b.xmax_idx - b.xmin_idx >= MIN_INDEX_SPAN);
            assert!(b.xmax >= 2.0 * b.xmin);
            assert_eq!(data[b.xmin_idx], b.xmin);
            assert_eq!(data[b.xmax_idx], b.xmax);
            assert_eq!(b.point_count(), b.xmax_idx - b.xmin_idx + 1);
        }
    }

    #[test]
    fn test_bounds_invariants_discrete() {
        let mut rng = SeededRng::with_seed(2);
        let data = sorted_copy(&generate_discrete_power_law(1000, 1, 200, 1.8, &mut rng).unwrap());
        let gen = TrialGenerator::new(&data, DistanceType::Discrete, None).unwrap();
        for _ in 0..300 {
            let t = gen.next_trial(&mut rng).unwrap();
            assert!(t.xmax_idx - t.xmin_idx >= MIN_INDEX_SPAN);
            assert!(t.xmax >= 2.0 * t.xmin);
            assert!((0.0..=1.0).contains(&t.approx_p));
            assert_eq!(t.n, t.xmax_idx - t.xmin_idx + 1);
        }
    }

    #[test]
    fn test_same_seed_same_trials() {
        let data = continuous_data();
        let gen = TrialGenerator::new(&data, DistanceType::Ad, Some(1000)).unwrap();
        let mut a = SeededRng::with_seed(44);
        let mut b = SeededRng::with_seed(44);
        for _ in 0..20 {
            assert_eq!(gen.next_trial(&mut a).unwrap(), gen.next_trial(&mut b).unwrap());
        }
    }

    #[test]
    fn test_attempt_cap() {
        let narrow: Vec<f64> = (0..20).map(|i| 1.0 + i as f64 * 0.02).collect();
        let gen = TrialGenerator::new(&narrow, DistanceType::Ks, Some(50)).unwrap();
        let mut rng = SeededRng::with_seed(3);
        assert_eq!(
            gen.next_bounds(&mut rng),
            Err(PowerLawError::TrialBudgetExhausted { attempts: 50 })
        );
    }

    #[test]
    fn test_new_rejects_bad_data() {
        assert!(TrialGenerator::new(&[], DistanceType::Ks, None).is_err());
        assert!(TrialGenerator::new(&[0.0, 1.0, 2.0], DistanceType::Ks, None).is_err());
    }

    #[test]
    fn test_degenerate_exponent_asymmetry() {
        // Uniform data fit with an exponent near zero
        let data: Vec<f64> = (1..=200).map(|i| i as f64).collect();
        let bounds = TrialBounds {
            xmin: 1.0,
            xmax: 200.0,
            xmin_idx: 0,
            xmax_idx: 199,
        };
        let trial = evaluate_trial(&data, bounds, DistanceType::Ks).unwrap();
        assert!(trial.alpha <= 1.0);
        assert_eq!(trial.distance, DEGENERATE_DISTANCE);
        assert_eq!(trial.approx_p, approximate_p_value(1.0, 200));
        assert!(trial.approx_p < 1e-6);
    }

    #[test]
    fn test_ad_trial_screens_with_ks() {
        let data = continuous_data();
        let bounds = TrialBounds {
            xmin: data[0],
            xmax: data[799],
            xmin_idx: 0,
            xmax_idx: 799,
        };
        let trial = evaluate_trial(&data, bounds, DistanceType::Ad).unwrap();
        assert!(trial.alpha > 1.0);
        let ks = ks_distance_sorted(&data, trial.alpha).unwrap();
        assert_ne!(trial.distance, ks);
        assert_eq!(trial.approx_p, approximate_p_value(ks, 800));
        assert!(trial.approx_p > 0.01);
    }
}
