//! # Search Configuration
//!
//! Configuration structures for the scaling-range search and for standalone
//! true p-value estimation.

use crate::errors::{validate_parameter, PowerLawError, PowerLawResult};
use crate::strategy::DistanceType;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default cap on rejection-sampling attempts per trial.
pub const DEFAULT_MAX_TRIAL_ATTEMPTS: usize = 10_000;

/// p-value thresholds lie in the open interval (0, 1); at either end a filter
/// passes everything or nothing.
fn validate_threshold(value: f64, name: &str) -> PowerLawResult<()> {
    validate_parameter(value, 0.0, 1.0, name)?;
    if value <= 0.0 || value >= 1.0 {
        return Err(PowerLawError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "strictly between 0 and 1".to_string(),
        });
    }
    Ok(())
}

/// Configuration for the Monte Carlo scaling-range search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Number of random (xmin, xmax) trials. Above ~1000 results are usually
    /// good; beyond ~20000 rarely helps.
    pub runs: usize,
    /// Approximate p-value a trial must exceed to become a candidate, in (0, 1)
    pub pqcrit: f64,
    /// True p-value a candidate must exceed to be selectable, in (0, 1)
    pub pcrit: f64,
    /// Surrogate samples per candidate in the true p-value stage
    pub pruns: usize,
    /// Goodness-of-fit distance
    pub distance_type: DistanceType,
    /// Run the true p-value stage. When false, `pqcrit` also acts as `pcrit`.
    pub calc_p: bool,
    /// Seed for reproducible searches; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Refine candidates in parallel (needs the `parallel` feature)
    pub parallel: bool,
    /// Rejection-sampling attempts allowed per trial; `None` is unbounded
    pub max_trial_attempts: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            runs: 2000,
            pqcrit: 0.35,
            pcrit: 0.25,
            pruns: 100,
            distance_type: DistanceType::Ad,
            calc_p: true,
            seed: None,
            parallel: true,
            max_trial_attempts: Some(DEFAULT_MAX_TRIAL_ATTEMPTS),
        }
    }
}

impl SearchConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Threshold applied after the true p-value stage.
    ///
    /// Equal to `pqcrit` when `calc_p` is off.
    pub fn effective_pcrit(&self) -> f64 {
        if self.calc_p {
            self.pcrit
        } else {
            self.pqcrit
        }
    }

    /// Check all parameters.
    pub fn validate(&self) -> PowerLawResult<()> {
        if self.runs == 0 {
            return Err(PowerLawError::InvalidParameter {
                parameter: "runs".to_string(),
                value: 0.0,
                constraint: "must be greater than 0".to_string(),
            });
        }
        if self.calc_p && self.pruns == 0 {
            return Err(PowerLawError::InvalidParameter {
                parameter: "pruns".to_string(),
                value: 0.0,
                constraint: "must be greater than 0 when calc_p is set".to_string(),
            });
        }
        validate_threshold(self.pqcrit, "pqcrit")?;
        validate_threshold(self.pcrit, "pcrit")?;
        if self.max_trial_attempts == Some(0) {
            return Err(PowerLawError::InvalidParameter {
                parameter: "max_trial_attempts".to_string(),
                value: 0.0,
                constraint: "must be greater than 0 or None".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for the standalone true p-value of a fixed range.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TruePValueConfig {
    /// Surrogate samples; 150 puts p within roughly 10% of its limit
    pub runs: usize,
    /// Integer-step data (not supported yet)
    pub discrete: bool,
    /// Seed for reproducible estimates; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for TruePValueConfig {
    fn default() -> Self {
        Self {
            runs: 150,
            discrete: false,
            seed: None,
        }
    }
}
