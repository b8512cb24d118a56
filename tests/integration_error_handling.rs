//! Integration tests for error handling and invalid input scenarios
//!
//! These tests check that bad inputs are reported as typed errors by the
//! search entry points, and that the legacy-shaped entry point turns every
//! failure into the `(0, 0, 1)` sentinel without panicking.

use powerlaw_range::{
    find_scaling_range, find_scaling_range_or_sentinel, generate_power_law, true_p_value,
    PowerLawError, ScalingRange, SearchConfig, SeededRng, TruePValueConfig,
};

fn quick_config() -> SearchConfig {
    SearchConfig {
        runs: 100,
        calc_p: false,
        ..SearchConfig::seeded(1)
    }
}

fn valid_data() -> Vec<f64> {
    let mut rng = SeededRng::with_seed(10);
    generate_power_law(300, 1.0, 100.0, 2.0, &mut rng).unwrap()
}

/// Test scenario: too few points for any trial to span ten index steps
#[test]
fn test_insufficient_data_error_handling() {
    let short: Vec<f64> = (1..=10).map(|i| (i * i) as f64).collect();
    match find_scaling_range(&short, &quick_config()) {
        Err(PowerLawError::InsufficientData { required, actual }) => {
            assert_eq!(required, 11);
            assert_eq!(actual, 10);
        }
        other => panic!("Expected InsufficientData error, got {:?}", other),
    }

    assert!(matches!(
        find_scaling_range(&[], &quick_config()),
        Err(PowerLawError::InsufficientData { actual: 0, .. })
    ));
}

/// Test scenario: data whose max/min ratio is below two
#[test]
fn test_insufficient_dynamic_range() {
    let narrow: Vec<f64> = (0..100).map(|i| 10.0 + i as f64 * 0.05).collect();
    match find_scaling_range(&narrow, &quick_config()) {
        Err(PowerLawError::InsufficientDynamicRange { ratio, required }) => {
            assert!(ratio < required);
            assert_eq!(required, 2.0);
        }
        other => panic!("Expected InsufficientDynamicRange error, got {:?}", other),
    }
}

/// Non-finite and non-positive values are rejected before the sweep.
#[test]
fn test_invalid_values_rejected() {
    let mut data = valid_data();
    data[17] = f64::INFINITY;
    assert!(find_scaling_range(&data, &quick_config()).is_err());

    let mut data = valid_data();
    data[3] = f64::NAN;
    assert!(find_scaling_range(&data, &quick_config()).is_err());

    let mut data = valid_data();
    data[0] = -1.0;
    assert!(matches!(
        find_scaling_range(&data, &quick_config()),
        Err(PowerLawError::InvalidParameter { .. })
    ));
}

/// Test scenario: enough points and range, but no valid trial exists
///
/// Every value above the minimum is a duplicate, so the upper boundary always
/// snaps next to the lower one and the attempt cap is hit.
#[test]
fn test_trial_budget_exhausted() {
    let mut data = vec![1.0];
    data.extend(std::iter::repeat(2.0).take(10));
    let config = SearchConfig {
        max_trial_attempts: Some(100),
        ..quick_config()
    };
    assert_eq!(
        find_scaling_range(&data, &config),
        Err(PowerLawError::TrialBudgetExhausted { attempts: 100 })
    );
    assert!(find_scaling_range_or_sentinel(&data, "KS", &config).is_sentinel());
}

/// Thresholds outside the open interval (0, 1) are rejected, endpoints included.
#[test]
fn test_invalid_config_rejected() {
    let data = valid_data();
    for (pcrit, pqcrit) in [(-0.1, 0.35), (1.0, 0.35), (0.0, 0.35), (0.25, 1.0), (0.25, 0.0)] {
        let config = SearchConfig {
            pcrit,
            pqcrit,
            ..quick_config()
        };
        assert!(
            matches!(
                find_scaling_range(&data, &config),
                Err(PowerLawError::InvalidParameter { .. })
            ),
            "pcrit = {}, pqcrit = {} should be rejected",
            pcrit,
            pqcrit
        );
    }
}

/// Discrete mode with values below one gives the sentinel, never a panic.
#[test]
fn test_discrete_guard_returns_sentinel() {
    let mut data: Vec<f64> = (1..=200).map(|i| i as f64).collect();
    data[50] = 0.5;

    let range = find_scaling_range_or_sentinel(&data, "discrete", &quick_config());
    assert_eq!(range, ScalingRange::SENTINEL);
    assert_eq!(range.as_tuple(), (0.0, 0.0, 1.0));

    let config = SearchConfig {
        distance_type: powerlaw_range::DistanceType::Discrete,
        ..quick_config()
    };
    assert_eq!(
        find_scaling_range(&data, &config),
        Err(PowerLawError::DiscreteDomainViolation { minimum: 0.5 })
    );
}

/// Unknown distance names give the sentinel.
#[test]
fn test_invalid_distance_type_returns_sentinel() {
    let data = valid_data();
    for name in ["XYZ", "ks", "Ad", ""] {
        assert!(
            find_scaling_range_or_sentinel(&data, name, &quick_config()).is_sentinel(),
            "{:?} should not be accepted",
            name
        );
    }
    assert!("XYZ".parse::<powerlaw_range::DistanceType>().is_err());
}

/// Valid names run the search normally through the legacy entry point.
#[test]
fn test_sentinel_wrapper_accepts_valid_names() {
    let data = valid_data();
    for name in ["KS", "AD"] {
        let range = find_scaling_range_or_sentinel(&data, name, &quick_config());
        assert!(!range.is_sentinel());
        assert!(range.xmax >= 2.0 * range.xmin);
    }
}

/// The fixed-range p-value refuses discrete data loudly.
#[test]
fn test_true_p_value_discrete_not_implemented() {
    let data = valid_data();
    let config = TruePValueConfig {
        discrete: true,
        ..Default::default()
    };
    assert!(matches!(
        true_p_value(&data, 1.0, 100.0, &config),
        Err(PowerLawError::NotImplemented { .. })
    ));
}
