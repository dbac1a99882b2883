//! Variables control charts: average, standard deviation, range and moving
//! range.
//!
//! Factors (A3, B3, B4, D3, D4, d2) come from the simulated
//! [`ConstantCache`], looked up per subgroup size, so unequal subgroup sizes
//! get per-row limits.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 6: Control Charts for Variables.
//! - Shewhart, W.A. (1931). *Economic Control of Quality of Manufactured Product*.

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use super::chart::{ChartKind, ChartTable, ControlLimits, LimitRow};
use crate::constants::ConstantCache;
use crate::dataset::Dataset;
use crate::error::{Result, SpcError};
use crate::subgroup::SubgroupStatistics;

/// How the average chart's half-width is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AverageMethod {
    /// `3 σ_short / sqrt(n_i)`, keeping each subgroup's own size.
    #[default]
    Direct,
    /// `A3(n_i) · s-bar`.
    Constants,
}

/// Average (X-bar) chart.
///
/// CL = x-double-bar; limits per subgroup are CL ± 3 σ_short/√n_i
/// ([`AverageMethod::Direct`]) or CL ± A3(n_i)·s-bar
/// ([`AverageMethod::Constants`]).
///
/// # Errors
///
/// `InsufficientData` when σ_short (direct) or s-bar (constants) is
/// undefined, i.e. no subgroup has two or more observations.
pub fn average_chart(
    stats: &SubgroupStatistics,
    method: AverageMethod,
    cache: &ConstantCache,
) -> Result<ChartTable> {
    let center = stats.pooled.grand_mean;
    let rows: Vec<LimitRow> = match method {
        AverageMethod::Direct => {
            let sigma = stats.sigma_short()?;
            stats
                .summaries
                .iter()
                .map(|s| {
                    let se = sigma / (s.count as f64).sqrt();
                    LimitRow::new(
                        &s.label,
                        s.count as f64,
                        s.mean,
                        ControlLimits::symmetric(center, 3.0 * se),
                    )
                })
                .collect()
        }
        AverageMethod::Constants => {
            let s_bar = stats.pooled.s_bar.ok_or_else(|| {
                SpcError::insufficient("s-bar undefined: no subgroup has 2 or more observations")
            })?;
            require_spread(stats, ChartKind::Average)?;
            stats
                .summaries
                .iter()
                .map(|s| {
                    let a3 = cache.stddev(s.count)?.a3;
                    Ok(LimitRow::new(
                        &s.label,
                        s.count as f64,
                        s.mean,
                        ControlLimits::symmetric(center, a3 * s_bar),
                    ))
                })
                .collect::<Result<Vec<_>>>()?
        }
    };
    Ok(ChartTable {
        kind: ChartKind::Average,
        center,
        rows,
    })
}

/// Standard deviation (S) chart: CL = s-bar, LCL = B3·s-bar, UCL = B4·s-bar.
///
/// # Errors
///
/// `InsufficientData` if any subgroup has fewer than two observations. Data
/// made of individual observations belongs on the moving-range chart.
pub fn stddev_chart(stats: &SubgroupStatistics, cache: &ConstantCache) -> Result<ChartTable> {
    require_spread(stats, ChartKind::StdDev)?;
    let s_bar = stats
        .pooled
        .s_bar
        .ok_or_else(|| SpcError::insufficient("s-bar undefined"))?;
    let rows = stats
        .summaries
        .iter()
        .map(|s| {
            let k = cache.stddev(s.count)?;
            Ok(LimitRow::new(
                &s.label,
                s.count as f64,
                s.std_dev,
                ControlLimits {
                    ucl: k.ucl_factor * s_bar,
                    cl: s_bar,
                    lcl: k.lcl_factor * s_bar,
                },
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ChartTable {
        kind: ChartKind::StdDev,
        center: s_bar,
        rows,
    })
}

/// Range (R) chart: CL = r-bar, LCL = D3·r-bar, UCL = D4·r-bar.
///
/// # Errors
///
/// `InsufficientData` if any subgroup has fewer than two observations.
pub fn range_chart(stats: &SubgroupStatistics, cache: &ConstantCache) -> Result<ChartTable> {
    require_spread(stats, ChartKind::Range)?;
    let r_bar = stats.pooled.r_bar;
    let rows = stats
        .summaries
        .iter()
        .map(|s| {
            let k = cache.range(s.count)?;
            Ok(LimitRow::new(
                &s.label,
                s.count as f64,
                s.range,
                ControlLimits {
                    ucl: k.ucl_factor * r_bar,
                    cl: r_bar,
                    lcl: k.lcl_factor * r_bar,
                },
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ChartTable {
        kind: ChartKind::Range,
        center: r_bar,
        rows,
    })
}

/// Moving range (mR) chart for individual observations.
///
/// mR_i = |y_i - y_(i-1)| in recorded order; CL = mR-bar, LCL = 0,
/// UCL = mR-bar + 3·(mR-bar / d2). The subgroup size is 1, so σ_short =
/// mR-bar/d2 is also the standard error. d2 here is the expected absolute
/// difference of two consecutive standard-normal draws, i.e. the range
/// constant at n = 2.
///
/// Row `i` is labeled with the later of the two observations.
///
/// # Errors
///
/// `InsufficientData` for fewer than two observations.
pub fn moving_range_chart(dataset: &Dataset, cache: &ConstantCache) -> Result<ChartTable> {
    let m = dataset.measurements();
    if m.len() < 2 {
        return Err(SpcError::insufficient(format!(
            "moving range needs at least 2 observations, got {}",
            m.len()
        )));
    }
    let moving: Vec<f64> = m.windows(2).map(|w| (w[1].value - w[0].value).abs()).collect();
    let mr_bar = stats::mean(&moving)
        .ok_or_else(|| SpcError::insufficient("no moving ranges to average"))?;
    let d2 = cache.range(2)?.d2;
    let sigma_short = mr_bar / d2;
    let limits = ControlLimits {
        ucl: mr_bar + 3.0 * sigma_short,
        cl: mr_bar,
        lcl: 0.0,
    };
    let rows = m[1..]
        .iter()
        .zip(&moving)
        .map(|(obs, &mr)| LimitRow::new(&obs.label, 1.0, mr, limits))
        .collect();
    Ok(ChartTable {
        kind: ChartKind::MovingRange,
        center: mr_bar,
        rows,
    })
}

fn require_spread(stats: &SubgroupStatistics, kind: ChartKind) -> Result<()> {
    if let Some(s) = stats.summaries.iter().find(|s| !s.has_spread()) {
        return Err(SpcError::insufficient(format!(
            "{kind:?} chart needs subgroups of size >= 2; subgroup `{}` has {} observation(s) (use the moving-range chart)",
            s.label, s.count
        )));
    }
    Ok(())
}
