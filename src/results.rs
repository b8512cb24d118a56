//! Result and intermediate record types for the scaling-range search.

use crate::math_utils::argmax_first;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Recorded distance of a trial whose fitted exponent is `<= 1`.
///
/// Large enough that such a trial never looks like a good fit.
pub const DEGENERATE_DISTANCE: f64 = 1e12;

/// Distance fed to the approximate p-value when the fit is degenerate.
///
/// Deliberately not [`DEGENERATE_DISTANCE`]: a degenerate trial is screened as
/// if its KS distance were 1, which already gives a near-zero approximate
/// p-value for any trial of at least 11 points.
pub const DEGENERATE_SCREENING_DISTANCE: f64 = 1.0;

/// Final answer of a search: the scaling range and its exponent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalingRange {
    /// Lower bound of the scaling regime
    pub xmin: f64,
    /// Upper bound of the scaling regime
    pub xmax: f64,
    /// Maximum-likelihood power-law exponent over `[xmin, xmax]`
    pub alpha: f64,
}

impl ScalingRange {
    /// Placeholder returned by the sentinel-style entry point on invalid input.
    pub const SENTINEL: ScalingRange = ScalingRange {
        xmin: 0.0,
        xmax: 0.0,
        alpha: 1.0,
    };

    /// Ratio `xmax / xmin`.
    pub fn width(&self) -> f64 {
        self.xmax / self.xmin
    }

    /// Whether this is exactly [`ScalingRange::SENTINEL`].
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// `(xmin, xmax, alpha)`.
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.xmin, self.xmax, self.alpha)
    }
}

impl From<ScalingRange> for (f64, f64, f64) {
    fn from(range: ScalingRange) -> Self {
        range.as_tuple()
    }
}

/// Outcome of one random (xmin, xmax) proposal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trial {
    /// Lower boundary (a data value)
    pub xmin: f64,
    /// Upper boundary (a data value)
    pub xmax: f64,
    /// Index of `xmin` in the sorted data
    pub xmin_idx: usize,
    /// Index of `xmax` in the sorted data
    pub xmax_idx: usize,
    /// Fitted exponent
    pub alpha: f64,
    /// Goodness-of-fit distance, or [`DEGENERATE_DISTANCE`] when `alpha <= 1`
    pub distance: f64,
    /// Approximate p-value
    pub approx_p: f64,
    /// Points in the trimmed sample
    pub n: usize,
}

impl Trial {
    /// Scaling range described by this trial.
    pub fn range(&self) -> ScalingRange {
        ScalingRange {
            xmin: self.xmin,
            xmax: self.xmax,
            alpha: self.alpha,
        }
    }

    /// Ratio `xmax / xmin`.
    pub fn width(&self) -> f64 {
        self.xmax / self.xmin
    }
}

/// All trials of one search, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialBatch {
    /// The trials
    pub trials: Vec<Trial>,
}

impl TrialBatch {
    /// Empty batch with room for `runs` trials.
    pub fn with_capacity(runs: usize) -> Self {
        Self {
            trials: Vec::with_capacity(runs),
        }
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// Whether the batch holds no trials.
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Indices of trials with `approx_p > threshold`.
    pub fn candidates_above(&self, threshold: f64) -> CandidateSet {
        CandidateSet {
            indices: self
                .trials
                .iter()
                .enumerate()
                .filter(|(_, t)| t.approx_p > threshold)
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// Index of the first trial with the largest approximate p-value.
    pub fn best_approx_index(&self) -> Option<usize> {
        argmax_first(self.trials.iter().map(|t| t.approx_p))
    }
}

/// Subset of a [`TrialBatch`], as indices into it in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateSet {
    /// Batch indices of the surviving trials
    pub indices: Vec<usize>,
}

impl CandidateSet {
    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no trial survived.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Keep the candidates whose paired score exceeds `threshold`.
    ///
    /// `scores[k]` belongs to `self.indices[k]`.
    pub fn retain_above(&self, scores: &[f64], threshold: f64) -> CandidateSet {
        CandidateSet {
            indices: self
                .indices
                .iter()
                .zip(scores)
                .filter(|(_, &s)| s > threshold)
                .map(|(&i, _)| i)
                .collect(),
        }
    }

    /// The candidate trials, in order.
    pub fn trials<'a>(&'a self, batch: &'a TrialBatch) -> impl Iterator<Item = &'a Trial> + 'a {
        self.indices.iter().map(move |&i| &batch.trials[i])
    }
}

/// Which rule produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SelectionPath {
    /// Widest range among candidates passing both thresholds
    Widest,
    /// No trial passed `pqcrit`; best approximate p-value over all trials
    ApproxFallback,
    /// No candidate passed `pcrit`; best true p-value among candidates
    TrueFallback,
}

/// Full account of a search, for callers that want the diagnostics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchReport {
    /// Selected scaling range
    pub range: ScalingRange,
    /// Rule that selected it
    pub selection: SelectionPath,
    /// Batch index of the selected trial
    pub trial_index: usize,
    /// Approximate p-value of the selected trial
    pub approx_p: f64,
    /// True p-value of the selected trial, when the true p-value stage ran
    pub p_value: Option<f64>,
    /// Trials passing `pqcrit`
    pub approx_candidates: usize,
    /// Candidates passing the final threshold
    pub final_candidates: usize,
    /// Every trial drawn
    pub batch: TrialBatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(xmin: f64, xmax: f64, approx_p: f64) -> Trial {
        Trial {
            xmin,
            xmax,
            xmin_idx: 0,
            xmax_idx: 10,
            alpha: 2.0,
            distance: 0.05,
            approx_p,
            n: 11,
        }
    }

    #[test]
    fn test_sentinel() {
        assert!(ScalingRange::SENTINEL.is_sentinel());
        assert_eq!(ScalingRange::SENTINEL.as_tuple(), (0.0, 0.0, 1.0));
        let r = ScalingRange {
            xmin: 1.0,
            xmax: 4.0,
            alpha: 2.0,
        };
        assert!(!r.is_sentinel());
        assert_eq!(r.width(), 4.0);
        let t: (f64, f64, f64) = r.into();
        assert_eq!(t, (1.0, 4.0, 2.0));
    }

    #[test]
    fn test_candidate_filtering() {
        let batch = TrialBatch {
            trials: vec![
                trial(1.0, 4.0, 0.2),
                trial(1.0, 8.0, 0.5),
                trial(2.0, 8.0, 0.35),
                trial(1.0, 3.0, 0.9),
            ],
        };
        let candidates = batch.candidates_above(0.35);
        assert_eq!(candidates.indices, vec![1, 3]);
        assert_eq!(batch.best_approx_index(), Some(3));

        let kept = candidates.retain_above(&[0.3, 0.1], 0.25);
        assert_eq!(kept.indices, vec![1]);
        let widths: Vec<f64> = kept.trials(&batch).map(|t| t.width()).collect();
        assert_eq!(widths, vec![8.0]);
    }

    #[test]
    fn test_best_approx_ties_take_first() {
        let batch = TrialBatch {
            trials: vec![trial(1.0, 4.0, 0.4), trial(2.0, 9.0, 0.4)],
        };
        assert_eq!(batch.best_approx_index(), Some(0));
        assert_eq!(TrialBatch::default().best_approx_index(), None);
    }
}
