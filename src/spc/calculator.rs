//! Chart selection and a calculator bound to one constant cache.

use super::chart::{ChartKind, ChartTable};
use super::variables::{average_chart, moving_range_chart, range_chart, stddev_chart, AverageMethod};
use crate::constants::ConstantCache;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::subgroup::SubgroupStatistics;

/// Picks the variability chart for a dataset: the moving-range chart when
/// every subgroup holds a single observation, otherwise the S chart.
pub fn recommended_chart(stats: &SubgroupStatistics) -> ChartKind {
    if stats.is_individuals() {
        ChartKind::MovingRange
    } else {
        ChartKind::StdDev
    }
}

/// Variables-chart calculator sharing one [`ConstantCache`], so each subgroup
/// size is simulated at most once across charts.
///
/// # Examples
///
/// ```
/// use u_spc::constants::{ConstantCache, EstimatorConfig};
/// use u_spc::dataset::Dataset;
/// use u_spc::spc::{ChartKind, ControlLimitCalculator};
/// use u_spc::subgroup::SubgroupStatistics;
///
/// let cache = ConstantCache::new(EstimatorConfig::default().with_trials(5_000).with_seed(1));
/// let calc = ControlLimitCalculator::new(&cache);
/// let data = Dataset::from_subgroups(&[&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]]).unwrap();
/// let stats = SubgroupStatistics::from_dataset(&data).unwrap();
///
/// let table = calc.chart(ChartKind::Range, &data, &stats).unwrap();
/// assert_eq!(table.center, 2.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ControlLimitCalculator<'a> {
    cache: &'a ConstantCache,
    average_method: AverageMethod,
}

impl<'a> ControlLimitCalculator<'a> {
    pub fn new(cache: &'a ConstantCache) -> Self {
        Self {
            cache,
            average_method: AverageMethod::default(),
        }
    }

    pub fn with_average_method(mut self, method: AverageMethod) -> Self {
        self.average_method = method;
        self
    }

    pub fn average(&self, stats: &SubgroupStatistics) -> Result<ChartTable> {
        average_chart(stats, self.average_method, self.cache)
    }

    pub fn stddev(&self, stats: &SubgroupStatistics) -> Result<ChartTable> {
        stddev_chart(stats, self.cache)
    }

    pub fn range(&self, stats: &SubgroupStatistics) -> Result<ChartTable> {
        range_chart(stats, self.cache)
    }

    pub fn moving_range(&self, dataset: &Dataset) -> Result<ChartTable> {
        moving_range_chart(dataset, self.cache)
    }

    /// Variability chart chosen by [`recommended_chart`].
    pub fn variability(&self, dataset: &Dataset, stats: &SubgroupStatistics) -> Result<ChartTable> {
        self.chart(recommended_chart(stats), dataset, stats)
    }

    /// Builds a variables chart by kind.
    ///
    /// Attributes charts take count data rather than measurements; asking
    /// for one here is an `InvalidArgument`.
    pub fn chart(
        &self,
        kind: ChartKind,
        dataset: &Dataset,
        stats: &SubgroupStatistics,
    ) -> Result<ChartTable> {
        match kind {
            ChartKind::Average => self.average(stats),
            ChartKind::StdDev => self.stddev(stats),
            ChartKind::Range => self.range(stats),
            ChartKind::MovingRange => self.moving_range(dataset),
            ChartKind::FractionDefective | ChartKind::CountDefective | ChartKind::DefectsPerUnit => {
                Err(crate::error::SpcError::invalid(
                    "kind",
                    format!("{kind:?} is an attributes chart; use p_chart/np_chart/u_chart"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EstimatorConfig;
    use crate::error::SpcError;

    fn cache() -> ConstantCache {
        ConstantCache::new(EstimatorConfig::default().with_trials(5_000).with_seed(21))
    }

    #[test]
    fn individuals_route_to_moving_range() {
        let data = Dataset::from_pairs([("1", 4.0), ("2", 6.0), ("3", 5.0)]).unwrap();
        let stats = SubgroupStatistics::from_dataset(&data).unwrap();
        assert_eq!(recommended_chart(&stats), ChartKind::MovingRange);
        let c = cache();
        let calc = ControlLimitCalculator::new(&c);
        let table = calc.variability(&data, &stats).unwrap();
        assert_eq!(table.kind, ChartKind::MovingRange);
        assert!(matches!(
            calc.stddev(&stats),
            Err(SpcError::InsufficientData { .. })
        ));
    }

    #[test]
    fn single_observation_routes_to_moving_range_and_rejects_s_chart() {
        let data = Dataset::from_pairs([("1", 4.0)]).unwrap();
        let stats = SubgroupStatistics::from_dataset(&data).unwrap();
        assert_eq!(recommended_chart(&stats), ChartKind::MovingRange);
        let c = cache();
        let calc = ControlLimitCalculator::new(&c);
        assert!(matches!(
            calc.chart(ChartKind::StdDev, &data, &stats),
            Err(SpcError::InsufficientData { .. })
        ));
    }

    #[test]
    fn subgroups_route_to_stddev() {
        let data = Dataset::from_subgroups(&[&[1.0, 2.0], &[2.0, 4.0]]).unwrap();
        let stats = SubgroupStatistics::from_dataset(&data).unwrap();
        assert_eq!(recommended_chart(&stats), ChartKind::StdDev);
        let c = cache();
        let table = ControlLimitCalculator::new(&c)
            .variability(&data, &stats)
            .unwrap();
        assert_eq!(table.kind, ChartKind::StdDev);
    }

    #[test]
    fn charts_share_cached_constants() {
        let data = Dataset::from_subgroups(&[&[1.0, 2.0, 3.0], &[2.0, 3.0, 5.0]]).unwrap();
        let stats = SubgroupStatistics::from_dataset(&data).unwrap();
        let c = cache();
        let calc = ControlLimitCalculator::new(&c).with_average_method(AverageMethod::Constants);
        calc.average(&stats).unwrap();
        calc.stddev(&stats).unwrap();
        assert_eq!(c.len(), 1);
        calc.range(&stats).unwrap();
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn attributes_kinds_rejected() {
        let data = Dataset::from_subgroups(&[&[1.0, 2.0]]).unwrap();
        let stats = SubgroupStatistics::from_dataset(&data).unwrap();
        let c = cache();
        assert!(matches!(
            ControlLimitCalculator::new(&c).chart(ChartKind::FractionDefective, &data, &stats),
            Err(SpcError::InvalidArgument { name: "kind", .. })
        ));
    }
}
