//! Resampling loop.

use rand::Rng;
use serde::Serialize;
use u_numflow::stats;

use super::config::{BootstrapConfig, Granularity};
use crate::capability::{IndexKind, SpecificationLimits};
use crate::constants::{seeded_rng, CancelToken};
use crate::dataset::{group_by_label, Dataset, Measurement, Subgroup};
use crate::error::{Result, SpcError};
use crate::subgroup::SubgroupStatistics;

/// Bootstrap result for one index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapSummary {
    pub kind: IndexKind,
    pub granularity: Granularity,
    /// Index computed on the full, non-resampled dataset.
    pub estimate: f64,
    /// Standard deviation of the successful replicates.
    pub std_error: f64,
    /// α/2 percentile of the replicates.
    pub lower: f64,
    /// 1 − α/2 percentile of the replicates.
    pub upper: f64,
    pub alpha: f64,
    /// Replicates that produced a value.
    pub reps: usize,
    /// Replicates discarded because their statistics were undefined.
    pub failed: usize,
}

impl BootstrapSummary {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Bootstraps `kind` on `dataset` with a generator seeded from `config`.
///
/// The point estimate is [`IndexKind::evaluate`] on the original data for
/// both granularities, so it matches
/// [`CapabilityIndices`](crate::capability::CapabilityIndices). Observation
/// replicates of Pp and Ppk skip the subgroup decomposition: μ and σ are the
/// mean and standard deviation of the resampled values.
///
/// # Errors
///
/// - `InvalidArgument` for an invalid `config`
/// - any error of the point estimate (`MissingSpecification`,
///   `InsufficientData`, `NumericDegeneracy`)
/// - `InsufficientData` if more than `max_failure_fraction` of the
///   replicates fail, or fewer than two succeed
///
/// # Examples
///
/// ```
/// use u_spc::bootstrap::{bootstrap_index, BootstrapConfig};
/// use u_spc::capability::{IndexKind, SpecificationLimits};
/// use u_spc::dataset::Dataset;
///
/// let data = Dataset::from_subgroups(&[
///     &[10.0, 11.0, 9.0, 10.0],
///     &[12.0, 14.0, 10.0, 12.0],
///     &[9.0, 10.0, 8.0, 9.0],
///     &[11.0, 11.5, 10.5, 11.0],
/// ])
/// .unwrap();
/// let limits = SpecificationLimits::two_sided(5.0, 15.0).unwrap();
/// let config = BootstrapConfig::default().with_reps(500).with_seed(11);
///
/// let summary = bootstrap_index(&data, IndexKind::Cp, &limits, &config).unwrap();
/// assert!(summary.lower <= summary.upper);
/// assert!(summary.std_error > 0.0);
/// ```
pub fn bootstrap_index(
    dataset: &Dataset,
    kind: IndexKind,
    limits: &SpecificationLimits,
    config: &BootstrapConfig,
) -> Result<BootstrapSummary> {
    bootstrap_index_cancellable(dataset, kind, limits, config, &CancelToken::new())
}

/// [`bootstrap_index`], checking `cancel` between replicates.
///
/// # Errors
///
/// `Cancelled` if the token fires; replicates gathered so far are dropped.
pub fn bootstrap_index_cancellable(
    dataset: &Dataset,
    kind: IndexKind,
    limits: &SpecificationLimits,
    config: &BootstrapConfig,
    cancel: &CancelToken,
) -> Result<BootstrapSummary> {
    let mut rng = seeded_rng(config.seed);
    bootstrap_index_with_rng(dataset, kind, limits, config, &mut rng, cancel)
}

/// [`bootstrap_index_cancellable`] driven by a caller-supplied generator.
/// `config.seed` is ignored.
pub fn bootstrap_index_with_rng<R>(
    dataset: &Dataset,
    kind: IndexKind,
    limits: &SpecificationLimits,
    config: &BootstrapConfig,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<BootstrapSummary>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    let overall_only = config.granularity == Granularity::Observation && !kind.is_short_term();

    let estimate = kind.evaluate(&SubgroupStatistics::from_dataset(dataset)?, limits)?;

    let groups = dataset.subgroups();
    let measurements = dataset.measurements();
    let mut replicates = Vec::with_capacity(config.reps);
    let mut values = Vec::with_capacity(measurements.len());

    for _ in 0..config.reps {
        if cancel.is_cancelled() {
            return Err(SpcError::Cancelled);
        }
        let replicate = match config.granularity {
            Granularity::Subgroup => {
                let drawn: Vec<Subgroup<'_>> = (0..groups.len())
                    .map(|_| groups[rng.random_range(0..groups.len())].clone())
                    .collect();
                SubgroupStatistics::from_subgroups(&drawn)
                    .and_then(|s| kind.evaluate(&s, limits))
            }
            Granularity::Observation if overall_only => {
                values.clear();
                values.extend(
                    (0..measurements.len())
                        .map(|_| measurements[rng.random_range(0..measurements.len())].value),
                );
                overall_index(kind, &values, limits)
            }
            Granularity::Observation => {
                let drawn: Vec<&Measurement> = (0..measurements.len())
                    .map(|_| &measurements[rng.random_range(0..measurements.len())])
                    .collect();
                SubgroupStatistics::from_subgroups(&group_by_label(drawn))
                    .and_then(|s| kind.evaluate(&s, limits))
            }
        };
        if let Ok(v) = replicate.and_then(finite) {
            replicates.push(v);
        }
    }

    let failed = config.reps - replicates.len();
    if failed > 0 {
        log::warn!(
            "{failed} of {} bootstrap replicates for {kind} had undefined statistics and were discarded",
            config.reps
        );
    }
    if failed as f64 > config.max_failure_fraction * config.reps as f64 {
        return Err(SpcError::insufficient(format!(
            "{failed} of {} bootstrap replicates failed, above the tolerated fraction {}",
            config.reps, config.max_failure_fraction
        )));
    }

    let (std_error, lower, upper) = match (
        stats::std_dev(&replicates),
        stats::quantile(&replicates, config.alpha / 2.0),
        stats::quantile(&replicates, 1.0 - config.alpha / 2.0),
    ) {
        (Some(se), Some(lo), Some(hi)) => (se, lo, hi),
        _ => {
            return Err(SpcError::insufficient(format!(
                "{} successful bootstrap replicates; at least 2 are needed",
                replicates.len()
            )))
        }
    };
    log::debug!(
        "bootstrap {kind}: estimate {estimate:.4}, se {std_error:.4}, interval [{lower:.4}, {upper:.4}] from {} replicates",
        replicates.len()
    );

    Ok(BootstrapSummary {
        kind,
        granularity: config.granularity,
        estimate,
        std_error,
        lower,
        upper,
        alpha: config.alpha,
        reps: replicates.len(),
        failed,
    })
}

fn finite(v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SpcError::NumericDegeneracy { statistic: "replicate" })
    }
}

/// Long-term index from raw values, without subgroups.
fn overall_index(kind: IndexKind, values: &[f64], limits: &SpecificationLimits) -> Result<f64> {
    let mean = stats::mean(values).ok_or_else(|| SpcError::insufficient("no observations"))?;
    let sigma = stats::std_dev(values)
        .ok_or_else(|| SpcError::insufficient("sigma_total needs at least 2 observations"))?;
    kind.compute(mean, sigma, limits)
}
