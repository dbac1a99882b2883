//! One analysis over one dataset.
//!
//! [`Analysis`] owns the dataset, its subgroup statistics, the constant cache
//! and the bootstrap settings. Nothing is process-wide: two analyses never
//! share state, and dropping one releases everything it computed.

use std::path::Path;

use crate::bootstrap::{bootstrap_index_cancellable, BootstrapConfig, BootstrapSummary};
use crate::capability::{
    normal_interval, CapabilityIndices, IndexKind, NormalInterval, SpecificationLimits,
};
use crate::constants::{CancelToken, ConstantCache, EstimatorConfig};
use crate::dataset::{ColumnSelection, Dataset};
use crate::describe::{describe, Description};
use crate::error::Result;
use crate::spc::{recommended_chart, AverageMethod, ChartKind, ChartTable, ControlLimitCalculator};
use crate::subgroup::{PooledStatistics, SubgroupStatistics, SubgroupSummary};

/// Explicit context for a single SPC analysis.
///
/// Subgroup statistics are computed once at construction; the dataset is
/// immutable afterwards, so every chart and index reads the same numbers.
///
/// # Examples
///
/// ```
/// use u_spc::capability::SpecificationLimits;
/// use u_spc::constants::EstimatorConfig;
/// use u_spc::dataset::Dataset;
/// use u_spc::session::Analysis;
///
/// let data = Dataset::from_subgroups(&[
///     &[10.0, 11.0, 9.0, 10.0],
///     &[12.0, 13.0, 11.0, 12.0],
///     &[9.0, 10.0, 8.0, 9.0],
/// ])
/// .unwrap();
/// let analysis = Analysis::new(data)
///     .unwrap()
///     .with_estimator(EstimatorConfig::default().with_trials(5_000).with_seed(1));
///
/// let xbar = analysis.average_chart().unwrap();
/// assert_eq!(xbar.rows.len(), 3);
///
/// let limits = SpecificationLimits::two_sided(5.0, 15.0).unwrap();
/// assert!(analysis.capability(&limits).cp.unwrap() > 2.0);
/// ```
#[derive(Debug)]
pub struct Analysis {
    dataset: Dataset,
    statistics: SubgroupStatistics,
    constants: ConstantCache,
    bootstrap: BootstrapConfig,
    average_method: AverageMethod,
}

impl Analysis {
    /// # Errors
    ///
    /// `InsufficientData` if the dataset is empty.
    pub fn new(dataset: Dataset) -> Result<Self> {
        let statistics = SubgroupStatistics::from_dataset(&dataset)?;
        log::debug!(
            "analysis over {} observations in {} subgroups",
            statistics.pooled.observation_count,
            statistics.pooled.subgroup_count
        );
        Ok(Self {
            dataset,
            statistics,
            constants: ConstantCache::default(),
            bootstrap: BootstrapConfig::default(),
            average_method: AverageMethod::default(),
        })
    }

    /// Loads `columns` from a CSV file and starts an analysis on them.
    pub fn from_csv_path(path: impl AsRef<Path>, columns: &ColumnSelection) -> Result<Self> {
        Self::new(Dataset::from_csv_path(path, columns)?)
    }

    /// Replaces the constant cache with an empty one using `config`.
    pub fn with_estimator(mut self, config: EstimatorConfig) -> Self {
        self.constants = ConstantCache::new(config);
        self
    }

    pub fn with_bootstrap(mut self, config: BootstrapConfig) -> Self {
        self.bootstrap = config;
        self
    }

    pub fn with_average_method(mut self, method: AverageMethod) -> Self {
        self.average_method = method;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn statistics(&self) -> &SubgroupStatistics {
        &self.statistics
    }

    pub fn summaries(&self) -> &[SubgroupSummary] {
        &self.statistics.summaries
    }

    pub fn pooled(&self) -> &PooledStatistics {
        &self.statistics.pooled
    }

    pub fn constants(&self) -> &ConstantCache {
        &self.constants
    }

    pub fn bootstrap_config(&self) -> &BootstrapConfig {
        &self.bootstrap
    }

    /// Mean, standard deviation, skewness and kurtosis of every value.
    pub fn describe(&self) -> Result<Description> {
        describe(&self.dataset.values())
    }

    pub fn calculator(&self) -> ControlLimitCalculator<'_> {
        ControlLimitCalculator::new(&self.constants).with_average_method(self.average_method)
    }

    pub fn recommended_chart(&self) -> ChartKind {
        recommended_chart(&self.statistics)
    }

    pub fn chart(&self, kind: ChartKind) -> Result<ChartTable> {
        self.calculator().chart(kind, &self.dataset, &self.statistics)
    }

    pub fn average_chart(&self) -> Result<ChartTable> {
        self.calculator().average(&self.statistics)
    }

    pub fn stddev_chart(&self) -> Result<ChartTable> {
        self.calculator().stddev(&self.statistics)
    }

    pub fn range_chart(&self) -> Result<ChartTable> {
        self.calculator().range(&self.statistics)
    }

    pub fn moving_range_chart(&self) -> Result<ChartTable> {
        self.calculator().moving_range(&self.dataset)
    }

    /// The chart picked by [`recommended_chart`](Self::recommended_chart).
    pub fn variability_chart(&self) -> Result<ChartTable> {
        self.calculator().variability(&self.dataset, &self.statistics)
    }

    pub fn capability(&self, limits: &SpecificationLimits) -> CapabilityIndices {
        CapabilityIndices::new(&self.statistics, limits)
    }

    pub fn index(&self, kind: IndexKind, limits: &SpecificationLimits) -> Result<f64> {
        kind.evaluate(&self.statistics, limits)
    }

    /// Normal-theory interval at the bootstrap config's `alpha`.
    pub fn normal_interval(
        &self,
        kind: IndexKind,
        limits: &SpecificationLimits,
    ) -> Result<NormalInterval> {
        normal_interval(kind, &self.statistics, limits, self.bootstrap.alpha)
    }

    pub fn bootstrap(&self, kind: IndexKind, limits: &SpecificationLimits) -> Result<BootstrapSummary> {
        self.bootstrap_cancellable(kind, limits, &CancelToken::new())
    }

    pub fn bootstrap_cancellable(
        &self,
        kind: IndexKind,
        limits: &SpecificationLimits,
        cancel: &CancelToken,
    ) -> Result<BootstrapSummary> {
        bootstrap_index_cancellable(&self.dataset, kind, limits, &self.bootstrap, cancel)
    }
}
