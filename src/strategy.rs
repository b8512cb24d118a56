//! Distance-type selection for the scaling-range search.
//!
//! The search supports exactly three goodness-of-fit modes. Each mode fixes
//! four things: how trial boundaries snap onto the data, how the exponent is
//! fitted, which statistic is recorded per trial, and which statistic feeds the
//! p-values. [`DistanceType`] is chosen once at entry; all dispatch after that
//! is a `match` on it.

use crate::distances::{ad_distance_sorted, discrete_ks_distance_sorted, ks_distance_sorted};
use crate::errors::{PowerLawError, PowerLawResult};
use crate::exponent_fit::{fit_exponent, fit_exponent_discrete};
use crate::math_utils::{find_nearest_idx, find_nearest_idx_discrete, Rounding};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Goodness-of-fit distance used by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceType {
    /// Kolmogorov-Smirnov distance on continuous data
    Ks,
    /// Anderson-Darling distance on continuous data (default)
    #[default]
    Ad,
    /// Discrete Kolmogorov-Smirnov distance on integer-step data
    Discrete,
}

impl DistanceType {
    /// Name accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            DistanceType::Ks => "KS",
            DistanceType::Ad => "AD",
            DistanceType::Discrete => "discrete",
        }
    }

    /// Whether the data must be integer-valued and at least one.
    pub fn is_discrete(&self) -> bool {
        matches!(self, DistanceType::Discrete)
    }

    /// Snap a lower boundary onto the sorted data.
    ///
    /// Discrete data round the boundary up so candidate ranges lean inward.
    pub fn lower_index(&self, sorted: &[f64], value: f64) -> usize {
        match self {
            DistanceType::Discrete => find_nearest_idx_discrete(sorted, value, Rounding::Up),
            DistanceType::Ks | DistanceType::Ad => find_nearest_idx(sorted, value),
        }
    }

    /// Snap an upper boundary onto the sorted data.
    ///
    /// Discrete data round the boundary down so candidate ranges lean inward.
    pub fn upper_index(&self, sorted: &[f64], value: f64) -> usize {
        match self {
            DistanceType::Discrete => find_nearest_idx_discrete(sorted, value, Rounding::Down),
            DistanceType::Ks | DistanceType::Ad => find_nearest_idx(sorted, value),
        }
    }

    /// Maximum-likelihood exponent of a trimmed, sorted sample.
    pub fn fit(&self, trimmed: &[f64]) -> PowerLawResult<f64> {
        match self {
            DistanceType::Discrete => fit_exponent_discrete(trimmed),
            DistanceType::Ks | DistanceType::Ad => fit_exponent(trimmed),
        }
    }

    /// Statistic recorded as the trial distance.
    pub fn distance(&self, trimmed: &[f64], alpha: f64) -> PowerLawResult<f64> {
        match self {
            DistanceType::Ks => ks_distance_sorted(trimmed, alpha),
            DistanceType::Ad => ad_distance_sorted(trimmed, alpha),
            DistanceType::Discrete => discrete_ks_distance_sorted(trimmed, alpha),
        }
    }

    /// KS-type statistic behind the approximate and true p-values.
    ///
    /// The approximate p-value formula is calibrated for KS distances, so AD
    /// mode still screens with plain KS.
    pub fn screening_distance(&self, trimmed: &[f64], alpha: f64) -> PowerLawResult<f64> {
        match self {
            DistanceType::Discrete => discrete_ks_distance_sorted(trimmed, alpha),
            DistanceType::Ks | DistanceType::Ad => ks_distance_sorted(trimmed, alpha),
        }
    }
}

impl FromStr for DistanceType {
    type Err = PowerLawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "KS" => Ok(DistanceType::Ks),
            "AD" => Ok(DistanceType::Ad),
            "discrete" => Ok(DistanceType::Discrete),
            other => Err(PowerLawError::InvalidDistanceType {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DistanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
