//! Pooled short-term and long-term statistics.

use serde::Serialize;
use u_numflow::stats;

use super::summary::SubgroupSummary;
use crate::dataset::{Dataset, Subgroup};
use crate::error::{Result, SpcError};

/// Statistics pooled across all subgroups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PooledStatistics {
    pub subgroup_count: usize,
    pub observation_count: usize,
    /// Mean of subgroup means (x-double-bar).
    pub grand_mean: f64,
    /// Mean of subgroup ranges (r-bar).
    pub r_bar: f64,
    /// Plain average of the defined subgroup standard deviations (s-bar),
    /// the center line of the S chart.
    pub s_bar: Option<f64>,
    /// Degrees-of-freedom-weighted within-subgroup standard deviation.
    /// `None` when no subgroup has two or more observations.
    pub sigma_short: Option<f64>,
    /// Standard deviation of every observation, ignoring subgroups.
    /// `None` for fewer than two observations.
    pub sigma_total: Option<f64>,
    /// Σ df_i across subgroups.
    pub total_df: usize,
}

/// Per-subgroup summaries together with their pooled statistics.
///
/// Always rebuilt from source data; nothing is updated in place.
///
/// # Examples
///
/// ```
/// use u_spc::dataset::Dataset;
/// use u_spc::subgroup::SubgroupStatistics;
///
/// let data = Dataset::from_subgroups(&[
///     &[10.0, 11.0, 9.0, 10.0],
///     &[12.0, 13.0, 11.0, 12.0],
///     &[9.0, 10.0, 8.0, 9.0],
/// ])
/// .unwrap();
/// let stats = SubgroupStatistics::from_dataset(&data).unwrap();
/// assert!((stats.pooled.grand_mean - 10.3333).abs() < 1e-3);
/// assert!((stats.pooled.sigma_short.unwrap() - 0.8165).abs() < 1e-3);
/// assert!((stats.pooled.sigma_total.unwrap() - 1.4975).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgroupStatistics {
    pub summaries: Vec<SubgroupSummary>,
    pub pooled: PooledStatistics,
}

impl SubgroupStatistics {
    /// # Errors
    ///
    /// `InsufficientData` if the dataset is empty.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        Self::from_subgroups(&dataset.subgroups())
    }

    /// Builds statistics from already-partitioned subgroups.
    pub fn from_subgroups(groups: &[Subgroup<'_>]) -> Result<Self> {
        if groups.is_empty() {
            return Err(SpcError::insufficient("dataset has no subgroups"));
        }
        let summaries = groups
            .iter()
            .map(|g| SubgroupSummary::from_values(g.label, &g.values))
            .collect::<Result<Vec<_>>>()?;
        let all: Vec<f64> = groups.iter().flat_map(|g| g.values.iter().copied()).collect();
        let pooled = pool(&summaries, &all)?;
        Ok(Self { summaries, pooled })
    }

    /// Common subgroup size, or `None` when sizes differ.
    pub fn constant_size(&self) -> Option<usize> {
        let first = self.summaries.first()?.count;
        self.summaries
            .iter()
            .all(|s| s.count == first)
            .then_some(first)
    }

    /// True when every subgroup holds a single observation.
    pub fn is_individuals(&self) -> bool {
        self.summaries.iter().all(|s| s.count == 1)
    }

    /// σ_short, or `InsufficientData` when it is undefined.
    pub fn sigma_short(&self) -> Result<f64> {
        self.pooled.sigma_short.ok_or_else(|| {
            SpcError::insufficient("no subgroup has 2 or more observations; sigma_short undefined")
        })
    }

    /// σ_total, or `InsufficientData` when it is undefined.
    pub fn sigma_total(&self) -> Result<f64> {
        self.pooled
            .sigma_total
            .ok_or_else(|| SpcError::insufficient("sigma_total needs at least 2 observations"))
    }
}

fn pool(summaries: &[SubgroupSummary], all_values: &[f64]) -> Result<PooledStatistics> {
    let means: Vec<f64> = summaries.iter().map(|s| s.mean).collect();
    let ranges: Vec<f64> = summaries.iter().map(|s| s.range).collect();
    let sds: Vec<f64> = summaries
        .iter()
        .filter(|s| s.has_spread())
        .map(|s| s.std_dev)
        .collect();

    let grand_mean = stats::mean(&means)
        .ok_or_else(|| SpcError::insufficient("no subgroup means to average"))?;
    let r_bar = stats::mean(&ranges)
        .ok_or_else(|| SpcError::insufficient("no subgroup ranges to average"))?;

    let total_df: usize = summaries.iter().map(|s| s.df).sum();
    let weighted: f64 = summaries
        .iter()
        .filter_map(|s| s.variance().map(|v| s.df as f64 * v))
        .sum();
    let sigma_short = (total_df > 0).then(|| (weighted / total_df as f64).sqrt());

    Ok(PooledStatistics {
        subgroup_count: summaries.len(),
        observation_count: all_values.len(),
        grand_mean,
        r_bar,
        s_bar: stats::mean(&sds),
        sigma_short,
        sigma_total: stats::std_dev(all_values),
        total_df,
    })
}
