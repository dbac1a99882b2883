//! Normal-approximation confidence intervals for capability indices.
//!
//! Uses the large-sample standard errors
//!
//! - Cp, Pp: `se = Ĉ · sqrt(1 / 2ν)`
//! - Cpk, Ppk: `se = sqrt(Ĉ² / 2ν + 1 / 9N)`
//!
//! where ν is Σ(nᵢ − 1) for the short-term indices and N − 1 for the
//! long-term ones. The interval is `Ĉ ± z(1 − α/2) · se`. For small samples
//! or skewed data prefer [`bootstrap_index`](crate::bootstrap::bootstrap_index).
//!
//! # References
//!
//! - Bissell, A.F. (1990), "How Reliable is Your Capability Index?",
//!   *Applied Statistics* 39(3), pp. 331--340.

use serde::Serialize;
use u_numflow::special;

use super::indices::IndexKind;
use super::limits::SpecificationLimits;
use crate::error::{Result, SpcError};
use crate::subgroup::SubgroupStatistics;

/// Point estimate with a symmetric normal-theory interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalInterval {
    pub kind: IndexKind,
    pub estimate: f64,
    pub std_error: f64,
    /// Degrees of freedom behind the sigma estimate.
    pub df: usize,
    pub lower: f64,
    pub upper: f64,
}

/// # Errors
///
/// - `InvalidArgument` unless `0 < alpha < 1`
/// - any error of [`IndexKind::evaluate`]
///
/// # Examples
///
/// ```
/// use u_spc::capability::{normal_interval, IndexKind, SpecificationLimits};
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
/// let limits = SpecificationLimits::two_sided(5.0, 15.0).unwrap();
/// let ci = normal_interval(IndexKind::Cp, &stats, &limits, 0.05).unwrap();
/// assert!(ci.lower < ci.estimate && ci.estimate < ci.upper);
/// assert_eq!(ci.df, 9);
/// ```
pub fn normal_interval(
    kind: IndexKind,
    stats: &SubgroupStatistics,
    limits: &SpecificationLimits,
    alpha: f64,
) -> Result<NormalInterval> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(SpcError::invalid("alpha", format!("must lie in (0, 1), got {alpha}")));
    }
    let estimate = kind.evaluate(stats, limits)?;
    let n = stats.pooled.observation_count;
    let df = if kind.is_short_term() {
        stats.pooled.total_df
    } else {
        n.saturating_sub(1)
    };
    if df == 0 {
        return Err(SpcError::insufficient(format!(
            "{kind} interval needs at least one degree of freedom"
        )));
    }

    let nu = df as f64;
    let variance = match kind {
        IndexKind::Cp | IndexKind::Pp => estimate * estimate / (2.0 * nu),
        IndexKind::Cpk | IndexKind::Ppk => {
            estimate * estimate / (2.0 * nu) + 1.0 / (9.0 * n as f64)
        }
    };
    let std_error = variance.sqrt();
    let z = normal_quantile(1.0 - alpha / 2.0);
    Ok(NormalInterval {
        kind,
        estimate,
        std_error,
        df,
        lower: estimate - z * std_error,
        upper: estimate + z * std_error,
    })
}

/// Standard-normal quantile. The rational approximation is only good to
/// about 5e-4, so one Newton step on the CDF is taken from it.
fn normal_quantile(p: f64) -> f64 {
    let z = special::inverse_normal_cdf(p);
    let density = special::standard_normal_pdf(z);
    if density > 0.0 {
        z - (special::standard_normal_cdf(z) - p) / density
    } else {
        z
    }
}
