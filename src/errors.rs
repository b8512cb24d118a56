//! Error types and validation functions for power-law range estimation.
//!
//! Every fallible operation in the crate returns [`PowerLawResult`]. Input
//! problems that the search can detect up front (bad distance names, discrete
//! data below one, too little data to ever produce a valid trial) are reported
//! as typed variants instead of sentinel values.

use thiserror::Error;

/// Error types for power-law range estimation.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PowerLawError {
    /// Insufficient data for the requested operation.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Numerical computation error due to instability or non-finite input.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
    },

    /// Unknown goodness-of-fit distance name.
    #[error("Invalid distance type '{name}': expected one of KS, AD or discrete")]
    InvalidDistanceType {
        /// The name that failed to parse
        name: String,
    },

    /// Discrete mode requires data normalised to integer steps of at least one.
    #[error("Discrete data must be normalised to the step size (all values >= 1), found minimum {minimum}")]
    DiscreteDomainViolation {
        /// Smallest value found in the data
        minimum: f64,
    },

    /// The data span too small a ratio for any trial to satisfy `xmax >= 2 * xmin`.
    #[error("Insufficient dynamic range: max/min = {ratio}, need at least {required}")]
    InsufficientDynamicRange {
        /// Observed max/min ratio
        ratio: f64,
        /// Required ratio
        required: f64,
    },

    /// The rejection sampler hit its attempt cap without producing a valid trial.
    #[error("No valid (xmin, xmax) trial found after {attempts} attempts")]
    TrialBudgetExhausted {
        /// Number of attempts made
        attempts: usize,
    },

    /// Feature not yet implemented.
    #[error("Feature not implemented: {feature}")]
    NotImplemented {
        /// Feature that is not yet implemented
        feature: String,
    },
}

/// Result type for power-law range estimation.
pub type PowerLawResult<T> = Result<T, PowerLawError>;

/// Validates that data has sufficient length.
///
/// # Example
/// ```rust
/// use powerlaw_range::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2, "test").is_ok());
/// assert!(validate_data_length(&data, 5, "test").is_err());
/// ```
pub fn validate_data_length(
    data: &[f64],
    min_required: usize,
    operation: &str,
) -> PowerLawResult<()> {
    if data.len() < min_required {
        log::debug!(
            "{} rejected input of {} points (requires {})",
            operation,
            data.len(),
            min_required
        );
        Err(PowerLawError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter is within inclusive bounds.
///
/// # Example
/// ```rust
/// use powerlaw_range::errors::validate_parameter;
///
/// assert!(validate_parameter(0.35, 0.0, 1.0, "pqcrit").is_ok());
/// assert!(validate_parameter(1.5, 0.0, 1.0, "pqcrit").is_err());
/// ```
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> PowerLawResult<()> {
    if value.is_nan() {
        return Err(PowerLawError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if min.is_nan() || max.is_nan() || min > max {
        return Err(PowerLawError::NumericalError {
            reason: format!(
                "Invalid bounds for parameter {}: min={}, max={}",
                name, min, max
            ),
        });
    }

    if value < min || value > max {
        Err(PowerLawError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value, naming its index.
///
/// # Example
/// ```rust
/// use powerlaw_range::errors::validate_all_finite;
///
/// assert!(validate_all_finite(&[1.0, 2.0], "data").is_ok());
/// assert!(validate_all_finite(&[1.0, f64::NAN], "data").is_err());
/// ```
pub fn validate_all_finite(data: &[f64], name: &str) -> PowerLawResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, &v)| !v.is_finite()) {
        let value_desc = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };

        return Err(PowerLawError::NumericalError {
            reason: format!(
                "{} contains non-finite value at index {}: {}",
                name, i, value_desc
            ),
        });
    }

    Ok(())
}

/// Validates that every value is strictly positive.
///
/// Log-uniform trial draws and the power-law likelihood both take logarithms
/// of the data.
pub fn validate_all_positive(data: &[f64], name: &str) -> PowerLawResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, &v)| v <= 0.0) {
        return Err(PowerLawError::InvalidParameter {
            parameter: format!("{}[{}]", name, i),
            value,
            constraint: "must be strictly positive".to_string(),
        });
    }
    Ok(())
}
