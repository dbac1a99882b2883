//! Process capability (Cp, Cpk) and performance (Pp, Ppk) indices.
//!
//! Capability indices use the pooled within-subgroup deviation σ_short and
//! assume a stable process. Performance indices use σ_total, the deviation of
//! every observation regardless of subgroup.
//!
//! | Index | Formula | Limits needed |
//! |-------|---------|---------------|
//! | Cp  | \|U − L\| / 6σ_short | both |
//! | Pp  | \|U − L\| / 6σ_total | both |
//! | Cpk | min(\|μ − L\|, \|U − μ\|) / 3σ_short | at least one |
//! | Ppk | min(\|μ − L\|, \|U − μ\|) / 3σ_total | at least one |
//!
//! Distances are absolute, so a mean lying outside a limit still yields a
//! positive Cpk. With a single limit the centering indices are one-sided.
//! Whenever μ and both limits are given, `Pp·Cpk = Ppk·Cp`.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.
//! - Kane (1986), "Process Capability Indices", *Journal of Quality Technology*
//!   18(1), pp. 41--52.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::limits::SpecificationLimits;
use crate::error::{Result, SpcError};
use crate::subgroup::SubgroupStatistics;

/// Which index to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    Cp,
    Pp,
    Cpk,
    Ppk,
}

impl IndexKind {
    pub const ALL: [IndexKind; 4] = [IndexKind::Cp, IndexKind::Pp, IndexKind::Cpk, IndexKind::Ppk];

    pub fn name(self) -> &'static str {
        match self {
            IndexKind::Cp => "Cp",
            IndexKind::Pp => "Pp",
            IndexKind::Cpk => "Cpk",
            IndexKind::Ppk => "Ppk",
        }
    }

    /// True for indices built on σ_short (Cp, Cpk).
    pub fn is_short_term(self) -> bool {
        matches!(self, IndexKind::Cp | IndexKind::Cpk)
    }

    /// Computes the index from an explicit mean and the matching sigma.
    pub fn compute(self, mean: f64, sigma: f64, limits: &SpecificationLimits) -> Result<f64> {
        match self {
            IndexKind::Cp => cp(sigma, limits),
            IndexKind::Pp => pp(sigma, limits),
            IndexKind::Cpk => cpk(mean, sigma, limits),
            IndexKind::Ppk => ppk(mean, sigma, limits),
        }
    }

    /// Computes the index from subgroup statistics, taking μ as the grand
    /// mean and σ_short or σ_total as appropriate.
    pub fn evaluate(self, stats: &SubgroupStatistics, limits: &SpecificationLimits) -> Result<f64> {
        let sigma = if self.is_short_term() {
            stats.sigma_short()?
        } else {
            stats.sigma_total()?
        };
        self.compute(stats.pooled.grand_mean, sigma, limits)
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cp = |U − L| / (6·σ_short).
///
/// # Errors
///
/// - `MissingSpecification` unless both limits are present
/// - `NumericDegeneracy` if `sigma_short` is zero
/// - `InvalidArgument` if `sigma_short` is negative or non-finite
///
/// # Examples
///
/// ```
/// use u_spc::capability::{cp, SpecificationLimits};
///
/// let limits = SpecificationLimits::two_sided(80.0, 100.0).unwrap();
/// assert!((cp(2.0, &limits).unwrap() - 20.0 / 12.0).abs() < 1e-12);
/// ```
pub fn cp(sigma_short: f64, limits: &SpecificationLimits) -> Result<f64> {
    spread_index("Cp", "sigma_short", sigma_short, limits)
}

/// Pp = |U − L| / (6·σ_total). Errors as for [`cp`].
pub fn pp(sigma_total: f64, limits: &SpecificationLimits) -> Result<f64> {
    spread_index("Pp", "sigma_total", sigma_total, limits)
}

/// Cpk = min(|μ − L|, |U − μ|) / (3·σ_short), one-sided when only one limit
/// is supplied.
///
/// # Errors
///
/// - `MissingSpecification` if neither limit is present
/// - `NumericDegeneracy` if `sigma_short` is zero
/// - `InvalidArgument` if `mean` or `sigma_short` is non-finite
///
/// # Examples
///
/// ```
/// use u_spc::capability::{cpk, SpecificationLimits};
///
/// let both = SpecificationLimits::two_sided(1.95, 2.05).unwrap();
/// assert!((cpk(2.01, 0.02, &both).unwrap() - 2.0 / 3.0).abs() < 1e-9);
///
/// let upper = SpecificationLimits::upper_only(3.0).unwrap();
/// assert!((cpk(5.0, 2.0, &upper).unwrap() - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn cpk(mean: f64, sigma_short: f64, limits: &SpecificationLimits) -> Result<f64> {
    centering_index("Cpk", "sigma_short", mean, sigma_short, limits)
}

/// Ppk: [`cpk`] with σ_total in place of σ_short.
pub fn ppk(mean: f64, sigma_total: f64, limits: &SpecificationLimits) -> Result<f64> {
    centering_index("Ppk", "sigma_total", mean, sigma_total, limits)
}

fn spread_index(
    index: &'static str,
    statistic: &'static str,
    sigma: f64,
    limits: &SpecificationLimits,
) -> Result<f64> {
    let width = limits.width().ok_or(SpcError::MissingSpecification {
        index,
        needed: "both lower and upper limits",
    })?;
    check_sigma(statistic, sigma)?;
    Ok(width / (6.0 * sigma))
}

fn centering_index(
    index: &'static str,
    statistic: &'static str,
    mean: f64,
    sigma: f64,
    limits: &SpecificationLimits,
) -> Result<f64> {
    let to_lower = limits.lower().map(|l| (mean - l).abs());
    let to_upper = limits.upper().map(|u| (u - mean).abs());
    let distance = match (to_lower, to_upper) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => {
            return Err(SpcError::MissingSpecification {
                index,
                needed: "a lower or upper limit",
            })
        }
    };
    if !mean.is_finite() {
        return Err(SpcError::invalid("mean", format!("must be finite, got {mean}")));
    }
    check_sigma(statistic, sigma)?;
    Ok(distance / (3.0 * sigma))
}

fn check_sigma(statistic: &'static str, sigma: f64) -> Result<()> {
    if sigma == 0.0 {
        return Err(SpcError::NumericDegeneracy { statistic });
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(SpcError::invalid(
            "sigma",
            format!("{statistic} must be positive and finite, got {sigma}"),
        ));
    }
    Ok(())
}

/// All four indices for one dataset and one set of limits.
///
/// An index is `None` when the limits it needs are missing or its sigma is
/// undefined, and `f64::INFINITY` when its sigma is exactly zero.
///
/// # Examples
///
/// ```
/// use u_spc::capability::{CapabilityIndices, SpecificationLimits};
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
/// let table = CapabilityIndices::new(&stats, &limits);
///
/// assert!((table.cp.unwrap() - 2.041).abs() < 1e-3);
/// assert!((table.pp.unwrap() - 1.113).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityIndices {
    pub mean: f64,
    pub sigma_short: Option<f64>,
    pub sigma_total: Option<f64>,
    pub cp: Option<f64>,
    pub pp: Option<f64>,
    pub cpk: Option<f64>,
    pub ppk: Option<f64>,
}

impl CapabilityIndices {
    pub fn new(stats: &SubgroupStatistics, limits: &SpecificationLimits) -> Self {
        let mean = stats.pooled.grand_mean;
        let sigma_short = stats.pooled.sigma_short;
        let sigma_total = stats.pooled.sigma_total;
        let index = |kind: IndexKind| {
            let sigma = if kind.is_short_term() {
                sigma_short
            } else {
                sigma_total
            };
            sigma.and_then(|s| infinite_on_degeneracy(kind.compute(mean, s, limits)))
        };
        Self {
            mean,
            sigma_short,
            sigma_total,
            cp: index(IndexKind::Cp),
            pp: index(IndexKind::Pp),
            cpk: index(IndexKind::Cpk),
            ppk: index(IndexKind::Ppk),
        }
    }

    pub fn get(&self, kind: IndexKind) -> Option<f64> {
        match kind {
            IndexKind::Cp => self.cp,
            IndexKind::Pp => self.pp,
            IndexKind::Cpk => self.cpk,
            IndexKind::Ppk => self.ppk,
        }
    }
}

fn infinite_on_degeneracy(result: Result<f64>) -> Option<f64> {
    match result {
        Ok(v) => Some(v),
        Err(SpcError::NumericDegeneracy { .. }) => Some(f64::INFINITY),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn limits(lower: Option<f64>, upper: Option<f64>) -> SpecificationLimits {
        SpecificationLimits::new(lower, upper).unwrap()
    }

    fn scenario() -> SubgroupStatistics {
        let data = Dataset::from_subgroups(&[
            &[10.0, 11.0, 9.0, 10.0],
            &[12.0, 13.0, 11.0, 12.0],
            &[9.0, 10.0, 8.0, 9.0],
        ])
        .unwrap();
        SubgroupStatistics::from_dataset(&data).unwrap()
    }

    // -----------------------------------------------------------------------
    // Individual indices
    // -----------------------------------------------------------------------

    #[test]
    fn cpk_two_sided_and_one_sided() {
        assert!((cpk(5.0, 2.0, &limits(Some(3.0), Some(7.0))).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((cpk(5.0, 2.0, &limits(Some(3.0), None)).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((cpk(90.0, 2.0, &limits(Some(80.0), Some(100.0))).unwrap() - 10.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn ppk_uses_total_sigma() {
        assert!((ppk(5.0, 1.5, &limits(Some(2.0), Some(8.0))).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((ppk(90.0, 2.5, &limits(Some(80.0), Some(100.0))).unwrap() - 10.0 / 7.5).abs() < 1e-12);
    }

    #[test]
    fn cp_width_is_absolute() {
        let reversed = limits(Some(15.0), Some(5.0));
        assert!((cp(1.0, &reversed).unwrap() - 10.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn mean_outside_limit_gives_positive_cpk() {
        let v = cpk(20.0, 1.0, &limits(Some(5.0), Some(15.0))).unwrap();
        assert!((v - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn missing_limits_reported() {
        let upper = limits(None, Some(10.0));
        assert!(matches!(
            cp(1.0, &upper),
            Err(SpcError::MissingSpecification { index: "Cp", .. })
        ));
        assert!(matches!(
            pp(1.0, &upper),
            Err(SpcError::MissingSpecification { index: "Pp", .. })
        ));
        let none = SpecificationLimits::default();
        assert!(matches!(
            cpk(0.0, 1.0, &none),
            Err(SpcError::MissingSpecification { index: "Cpk", .. })
        ));
        assert!(matches!(
            ppk(0.0, 1.0, &none),
            Err(SpcError::MissingSpecification { index: "Ppk", .. })
        ));
    }

    #[test]
    fn zero_sigma_is_degenerate() {
        let both = limits(Some(0.0), Some(1.0));
        assert!(matches!(
            cp(0.0, &both),
            Err(SpcError::NumericDegeneracy { statistic: "sigma_short" })
        ));
        assert!(matches!(
            ppk(0.5, 0.0, &both),
            Err(SpcError::NumericDegeneracy { statistic: "sigma_total" })
        ));
        assert!(matches!(
            cp(-1.0, &both),
            Err(SpcError::InvalidArgument { name: "sigma", .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Statistics-driven
    // -----------------------------------------------------------------------

    #[test]
    fn scenario_indices() {
        let stats = scenario();
        let both = limits(Some(5.0), Some(15.0));
        let s_short = (2.0_f64 / 3.0).sqrt();
        let s_total = stats.pooled.sigma_total.unwrap();
        let mu = 31.0 / 3.0;

        let table = CapabilityIndices::new(&stats, &both);
        assert!((table.cp.unwrap() - 10.0 / (6.0 * s_short)).abs() < 1e-12);
        assert!((table.pp.unwrap() - 10.0 / (6.0 * s_total)).abs() < 1e-12);
        assert!((table.cpk.unwrap() - (15.0 - mu) / (3.0 * s_short)).abs() < 1e-12);
        assert!((table.ppk.unwrap() - (15.0 - mu) / (3.0 * s_total)).abs() < 1e-12);

        assert!((table.cp.unwrap() - 2.041).abs() < 1e-3);
        assert!((table.pp.unwrap() - 1.113).abs() < 1e-3);
        assert!((table.cpk.unwrap() - 1.905).abs() < 1e-3);
        assert!((table.ppk.unwrap() - 1.039).abs() < 1e-3);

        for kind in IndexKind::ALL {
            assert_eq!(kind.evaluate(&stats, &both).ok(), table.get(kind));
        }
    }

    #[test]
    fn table_with_one_sided_limits() {
        let table = CapabilityIndices::new(&scenario(), &limits(Some(5.0), None));
        assert!(table.cp.is_none());
        assert!(table.pp.is_none());
        assert!(table.cpk.is_some());
        assert!(table.ppk.is_some());
    }

    #[test]
    fn identical_subgroups_report_infinity() {
        let data = Dataset::from_subgroups(&[&[3.0, 3.0], &[3.0, 3.0]]).unwrap();
        let stats = SubgroupStatistics::from_dataset(&data).unwrap();
        let table = CapabilityIndices::new(&stats, &limits(Some(0.0), Some(6.0)));
        assert_eq!(table.cp, Some(f64::INFINITY));
        assert_eq!(table.cpk, Some(f64::INFINITY));
        assert_eq!(table.pp, Some(f64::INFINITY));
        assert!(matches!(
            IndexKind::Cp.evaluate(&stats, &limits(Some(0.0), Some(6.0))),
            Err(SpcError::NumericDegeneracy { .. })
        ));
    }

    #[test]
    fn individuals_leave_short_term_undefined() {
        let data = Dataset::from_subgroups(&[&[1.0], &[2.0], &[4.0]]).unwrap();
        let stats = SubgroupStatistics::from_dataset(&data).unwrap();
        let table = CapabilityIndices::new(&stats, &limits(Some(0.0), Some(6.0)));
        assert!(table.cp.is_none());
        assert!(table.pp.is_some());
        assert!(matches!(
            IndexKind::Cpk.evaluate(&stats, &limits(Some(0.0), Some(6.0))),
            Err(SpcError::InsufficientData { .. })
        ));
    }

    #[test]
    fn kind_display() {
        assert_eq!(IndexKind::Ppk.to_string(), "Ppk");
        assert!(IndexKind::Cpk.is_short_term());
        assert!(!IndexKind::Pp.is_short_term());
    }
}
