//! Scaling-range search.
//!
//! The search draws `runs` random `(xmin, xmax)` trials, sieves them with the
//! approximate p-value, refines the survivors with the bootstrap p-value and
//! returns the widest range that passes both thresholds:
//!
//! 1. **Sweep**: `runs` proposals from one sequential random stream.
//! 2. **Approximate filter**: keep trials with `approx_p > pqcrit`. If none
//!    survive, the trial with the largest `approx_p` in the whole batch wins.
//! 3. **Refinement**: true p-value per survivor (skipped when `calc_p` is off,
//!    in which case `approx_p` stands in and `pqcrit` is the final threshold).
//! 4. **Final filter**: keep survivors with `p > pcrit`. If none, the survivor
//!    with the largest `p` wins.
//! 5. **Selection**: largest `xmax / xmin`; ties go to the earliest trial.
//!
//! # Example
//!
//! ```rust
//! use powerlaw_range::{find_scaling_range, generate_power_law, SearchConfig, SeededRng};
//!
//! let mut rng = SeededRng::with_seed(11);
//! let data = generate_power_law(1000, 5.0, 500.0, 2.5, &mut rng).unwrap();
//!
//! let config = SearchConfig {
//!     runs: 300,
//!     calc_p: false,
//!     ..SearchConfig::seeded(3)
//! };
//! let range = find_scaling_range(&data, &config).unwrap();
//! assert!(range.xmax >= 2.0 * range.xmin);
//! ```

use crate::config::SearchConfig;
use crate::distances::discrete_support;
use crate::errors::{
    validate_all_finite, validate_all_positive, validate_data_length, PowerLawError,
    PowerLawResult,
};
use crate::math_utils::{argmax_first, sorted_copy};
use crate::monte_carlo::find_true_p_batch;
use crate::results::{CandidateSet, ScalingRange, SearchReport, SelectionPath, TrialBatch};
use crate::seeded_rng::SeededRng;
use crate::strategy::DistanceType;
use crate::trial_generator::{TrialGenerator, MIN_INDEX_SPAN, MIN_RANGE_RATIO};

/// Find the scaling range of `data`.
///
/// Uses `config.seed` when set, OS entropy otherwise.
pub fn find_scaling_range(data: &[f64], config: &SearchConfig) -> PowerLawResult<ScalingRange> {
    find_scaling_range_report(data, config).map(|report| report.range)
}

/// Find the scaling range of `data` and keep the search diagnostics.
pub fn find_scaling_range_report(
    data: &[f64],
    config: &SearchConfig,
) -> PowerLawResult<SearchReport> {
    let mut rng = match config.seed {
        Some(seed) => SeededRng::with_seed(seed),
        None => SeededRng::from_entropy(),
    };
    find_scaling_range_with_rng(data, config, &mut rng)
}

/// Find the scaling range of `data`, drawing from `rng`.
///
/// `config.seed` is ignored. Two calls with identically seeded streams and
/// equal configurations return identical reports.
pub fn find_scaling_range_with_rng(
    data: &[f64],
    config: &SearchConfig,
    rng: &mut SeededRng,
) -> PowerLawResult<SearchReport> {
    config.validate()?;
    let sorted = prepare_data(data, config.distance_type)?;
    let batch = sweep(&sorted, config, rng)?;
    select(&sorted, batch, config, rng)
}

/// Legacy-shaped entry point returning [`ScalingRange::SENTINEL`] on any error.
///
/// `dist_type` is one of `"KS"`, `"AD"` or `"discrete"` and overrides
/// `config.distance_type`. Errors are logged at error level. Prefer
/// [`find_scaling_range`], which reports what went wrong.
pub fn find_scaling_range_or_sentinel(
    data: &[f64],
    dist_type: &str,
    config: &SearchConfig,
) -> ScalingRange {
    let result = dist_type.parse::<DistanceType>().and_then(|distance_type| {
        let config = SearchConfig {
            distance_type,
            ..config.clone()
        };
        find_scaling_range(data, &config)
    });
    match result {
        Ok(range) => range,
        Err(e) => {
            log::error!("Scaling range search failed: {}", e);
            ScalingRange::SENTINEL
        }
    }
}

/// Validate the input and return it sorted ascending.
fn prepare_data(data: &[f64], distance_type: DistanceType) -> PowerLawResult<Vec<f64>> {
    validate_all_finite(data, "data")?;
    if distance_type.is_discrete() {
        let minimum = data.iter().copied().fold(f64::INFINITY, f64::min);
        if minimum < 1.0 {
            return Err(PowerLawError::DiscreteDomainViolation { minimum });
        }
    }
    validate_all_positive(data, "data")?;
    validate_data_length(data, MIN_INDEX_SPAN + 1, "scaling range search")?;

    let sorted = sorted_copy(data);
    let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
    let ratio = max / min;
    if ratio < MIN_RANGE_RATIO {
        return Err(PowerLawError::InsufficientDynamicRange {
            ratio,
            required: MIN_RANGE_RATIO,
        });
    }
    if distance_type.is_discrete() {
        discrete_support(min, max)?;
    }
    Ok(sorted)
}

fn sweep(sorted: &[f64], config: &SearchConfig, rng: &mut SeededRng) -> PowerLawResult<TrialBatch> {
    let generator = TrialGenerator::new(sorted, config.distance_type, config.max_trial_attempts)?;
    let mut batch = TrialBatch::with_capacity(config.runs);
    for _ in 0..config.runs {
        batch.trials.push(generator.next_trial(rng)?);
    }
    log::debug!(
        "Swept {} {} trials over {} points",
        batch.len(),
        config.distance_type,
        sorted.len()
    );
    Ok(batch)
}

fn no_comparable(stage: &str) -> PowerLawError {
    PowerLawError::NumericalError {
        reason: format!("no comparable values when selecting {}", stage),
    }
}

fn select(
    sorted: &[f64],
    batch: TrialBatch,
    config: &SearchConfig,
    rng: &mut SeededRng,
) -> PowerLawResult<SearchReport> {
    let candidates = batch.candidates_above(config.pqcrit);
    log::debug!(
        "{} of {} trials passed pqcrit = {}",
        candidates.len(),
        batch.len(),
        config.pqcrit
    );

    if candidates.is_empty() {
        let index = batch
            .best_approx_index()
            .ok_or_else(|| no_comparable("approximate p-value fallback"))?;
        log::warn!(
            "No trial passed pqcrit = {}; falling back to the best approximate p-value ({:.4})",
            config.pqcrit,
            batch.trials[index].approx_p
        );
        return Ok(report(batch, SelectionPath::ApproxFallback, index, None, 0, 0));
    }

    let p_values = refine(sorted, &batch, &candidates, config, rng)?;
    choose(batch, &candidates, &p_values, config)
}

/// Final filter and selection over the screened candidates.
///
/// `p_values[k]` scores `candidates.indices[k]`.
fn choose(
    batch: TrialBatch,
    candidates: &CandidateSet,
    p_values: &[f64],
    config: &SearchConfig,
) -> PowerLawResult<SearchReport> {
    let pcrit = config.effective_pcrit();
    let survivors = candidates.retain_above(p_values, pcrit);
    log::debug!(
        "{} of {} candidates passed pcrit = {}",
        survivors.len(),
        candidates.len(),
        pcrit
    );
    let true_p = |index: usize| -> Option<f64> {
        if !config.calc_p {
            return None;
        }
        candidates
            .indices
            .binary_search(&index)
            .ok()
            .map(|k| p_values[k])
    };

    if survivors.is_empty() {
        let k = argmax_first(p_values.iter().copied())
            .ok_or_else(|| no_comparable("true p-value fallback"))?;
        let index = candidates.indices[k];
        log::warn!(
            "No candidate passed pcrit = {}; falling back to the best p-value ({:.4})",
            pcrit,
            p_values[k]
        );
        let p = true_p(index);
        let approx_count = candidates.len();
        return Ok(report(
            batch,
            SelectionPath::TrueFallback,
            index,
            p,
            approx_count,
            0,
        ));
    }

    let k = argmax_first(survivors.trials(&batch).map(|t| t.width()))
        .ok_or_else(|| no_comparable("widest range"))?;
    let index = survivors.indices[k];
    let p = true_p(index);
    let (approx_count, final_count) = (candidates.len(), survivors.len());
    Ok(report(
        batch,
        SelectionPath::Widest,
        index,
        p,
        approx_count,
        final_count,
    ))
}

/// Score paired with each candidate: the true p-value, or `approx_p` when
/// refinement is off.
fn refine(
    sorted: &[f64],
    batch: &TrialBatch,
    candidates: &CandidateSet,
    config: &SearchConfig,
    rng: &mut SeededRng,
) -> PowerLawResult<Vec<f64>> {
    if !config.calc_p {
        return Ok(candidates.trials(batch).map(|t| t.approx_p).collect());
    }
    let bounds: Vec<(f64, f64)> = candidates
        .trials(batch)
        .map(|t| (t.xmin, t.xmax))
        .collect();
    let refine_seed = rng.next_seed();
    log::debug!(
        "Estimating true p-values for {} candidates with {} surrogates each",
        bounds.len(),
        config.pruns
    );
    find_true_p_batch(
        sorted,
        &bounds,
        config.pruns,
        config.distance_type,
        refine_seed,
        config.parallel,
    )
}

fn report(
    batch: TrialBatch,
    selection: SelectionPath,
    trial_index: usize,
    p_value: Option<f64>,
    approx_candidates: usize,
    final_candidates: usize,
) -> SearchReport {
    let trial = batch.trials[trial_index];
    SearchReport {
        range: trial.range(),
        selection,
        trial_index,
        approx_p: trial.approx_p,
        p_value,
        approx_candidates,
        final_candidates,
        batch,
    }
}
