//! Attributes control charts: p, np and u.
//!
//! | Chart | Data | Limits |
//! |-------|------|--------|
//! | p     | defectives / inspected | p-bar ± 3 sqrt(p-bar (1 - p-bar) / n_i) |
//! | np    | defectives | n_i p-bar ± 3 sqrt(n_i p-bar (1 - p-bar)) |
//! | u     | defects / units | u-bar ± 3 sqrt(u-bar / n_i) |
//!
//! Every lower limit is floored at zero: fractions and counts cannot be
//! negative.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 7: Control Charts for Attributes.

use serde::Deserialize;

use super::chart::{ChartKind, ChartTable, ControlLimits, LimitRow};
use crate::error::{Result, SpcError};

/// Defective items found in one inspected sample.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefectiveSample {
    pub label: String,
    pub defectives: u64,
    pub inspected: u64,
}

impl DefectiveSample {
    pub fn new(label: impl Into<String>, defectives: u64, inspected: u64) -> Self {
        Self {
            label: label.into(),
            defectives,
            inspected,
        }
    }
}

/// Defects counted over an area of opportunity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefectSample {
    pub label: String,
    pub defects: u64,
    /// Units inspected; may be fractional (area, length).
    pub units: f64,
}

impl DefectSample {
    pub fn new(label: impl Into<String>, defects: u64, units: f64) -> Self {
        Self {
            label: label.into(),
            defects,
            units,
        }
    }

    /// A sample of exactly one unit.
    pub fn per_unit(label: impl Into<String>, defects: u64) -> Self {
        Self::new(label, defects, 1.0)
    }
}

/// Fraction defective (p) chart. Limits vary with each sample's size.
///
/// ```
/// use u_spc::spc::{p_chart, DefectiveSample};
///
/// let samples: Vec<_> = [2, 3, 1, 4, 2, 3, 1, 2, 3, 2]
///     .iter()
///     .enumerate()
///     .map(|(i, &d)| DefectiveSample::new((i + 1).to_string(), d, 100))
///     .collect();
/// let chart = p_chart(&samples).unwrap();
/// assert!((chart.center - 0.023).abs() < 1e-12);
/// assert_eq!(chart.rows[0].limits.lcl, 0.0);
/// ```
pub fn p_chart(samples: &[DefectiveSample]) -> Result<ChartTable> {
    let p_bar = pooled_fraction(samples)?;
    let rows = samples
        .iter()
        .map(|s| {
            let n = s.inspected as f64;
            let sigma = (p_bar * (1.0 - p_bar) / n).sqrt();
            LimitRow::new(
                &s.label,
                n,
                s.defectives as f64 / n,
                ControlLimits::non_negative(p_bar, 3.0 * sigma),
            )
        })
        .collect();
    Ok(ChartTable {
        kind: ChartKind::FractionDefective,
        center: p_bar,
        rows,
    })
}

/// Count defective (np) chart. The table center is p-bar times the mean
/// sample size; each row's center is n_i·p-bar.
pub fn np_chart(samples: &[DefectiveSample]) -> Result<ChartTable> {
    let p_bar = pooled_fraction(samples)?;
    let mean_n = samples.iter().map(|s| s.inspected as f64).sum::<f64>() / samples.len() as f64;
    let rows = samples
        .iter()
        .map(|s| {
            let n = s.inspected as f64;
            let sigma = (n * p_bar * (1.0 - p_bar)).sqrt();
            LimitRow::new(
                &s.label,
                n,
                s.defectives as f64,
                ControlLimits::non_negative(n * p_bar, 3.0 * sigma),
            )
        })
        .collect();
    Ok(ChartTable {
        kind: ChartKind::CountDefective,
        center: mean_n * p_bar,
        rows,
    })
}

/// Defects per unit (u) chart. u-bar = Σ defects / Σ units.
pub fn u_chart(samples: &[DefectSample]) -> Result<ChartTable> {
    if samples.is_empty() {
        return Err(SpcError::insufficient("u chart needs at least one sample"));
    }
    if let Some(bad) = samples
        .iter()
        .find(|s| !s.units.is_finite() || s.units <= 0.0)
    {
        return Err(SpcError::invalid(
            "units",
            format!("sample `{}` has non-positive units {}", bad.label, bad.units),
        ));
    }
    let total_defects: u64 = samples.iter().map(|s| s.defects).sum();
    let total_units: f64 = samples.iter().map(|s| s.units).sum();
    let u_bar = total_defects as f64 / total_units;
    let rows = samples
        .iter()
        .map(|s| {
            let sigma = (u_bar / s.units).sqrt();
            LimitRow::new(
                &s.label,
                s.units,
                s.defects as f64 / s.units,
                ControlLimits::non_negative(u_bar, 3.0 * sigma),
            )
        })
        .collect();
    Ok(ChartTable {
        kind: ChartKind::DefectsPerUnit,
        center: u_bar,
        rows,
    })
}

fn pooled_fraction(samples: &[DefectiveSample]) -> Result<f64> {
    if samples.is_empty() {
        return Err(SpcError::insufficient(
            "defective chart needs at least one sample",
        ));
    }
    if let Some(bad) = samples
        .iter()
        .find(|s| s.inspected == 0 || s.defectives > s.inspected)
    {
        return Err(SpcError::invalid(
            "samples",
            format!(
                "sample `{}` has {} defectives out of {} inspected",
                bad.label, bad.defectives, bad.inspected
            ),
        ));
    }
    let defectives: u64 = samples.iter().map(|s| s.defectives).sum();
    let inspected: u64 = samples.iter().map(|s| s.inspected).sum();
    Ok(defectives as f64 / inspected as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defectives(counts: &[u64], n: u64) -> Vec<DefectiveSample> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &d)| DefectiveSample::new((i + 1).to_string(), d, n))
            .collect()
    }

    #[test]
    fn p_chart_constant_size() {
        let chart = p_chart(&defectives(&[2, 3, 1, 4, 2, 3, 1, 2, 3, 2], 100)).unwrap();
        let p = 0.023;
        let sigma = (p * (1.0 - p) / 100.0_f64).sqrt();
        assert!((chart.center - p).abs() < 1e-12);
        let row = &chart.rows[3];
        assert!((row.value - 0.04).abs() < 1e-12);
        assert!((row.limits.ucl - (p + 3.0 * sigma)).abs() < 1e-12);
        assert_eq!(row.limits.lcl, 0.0);
        assert!(chart.is_in_control());
    }

    #[test]
    fn p_chart_limits_narrow_with_larger_samples() {
        let samples = vec![
            DefectiveSample::new("a", 5, 100),
            DefectiveSample::new("b", 20, 400),
        ];
        let chart = p_chart(&samples).unwrap();
        let w_small = chart.rows[0].limits.ucl - chart.center;
        let w_large = chart.rows[1].limits.ucl - chart.center;
        assert!((w_small / w_large - 2.0).abs() < 1e-12);
    }

    #[test]
    fn p_chart_flags_spike() {
        let mut counts = vec![2; 12];
        counts[7] = 15;
        let chart = p_chart(&defectives(&counts, 100)).unwrap();
        let flagged: Vec<_> = chart.out_of_control().map(|r| r.label.as_str()).collect();
        assert_eq!(flagged, vec!["8"]);
    }

    #[test]
    fn np_chart_limits() {
        let chart = np_chart(&defectives(&[2, 3, 1, 4, 2, 3, 1, 2, 3, 2], 100)).unwrap();
        let np = 2.3;
        let sigma = (100.0 * 0.023 * 0.977_f64).sqrt();
        assert!((chart.center - np).abs() < 1e-9);
        assert!((chart.rows[0].limits.ucl - (np + 3.0 * sigma)).abs() < 1e-9);
        assert_eq!(chart.rows[0].limits.lcl, 0.0);
    }

    #[test]
    fn invalid_defective_samples_rejected() {
        assert!(matches!(
            p_chart(&[]),
            Err(SpcError::InsufficientData { .. })
        ));
        let err = np_chart(&[DefectiveSample::new("x", 5, 3)]).unwrap_err();
        assert!(matches!(err, SpcError::InvalidArgument { name: "samples", .. }));
        assert!(p_chart(&[DefectiveSample::new("x", 0, 0)]).is_err());
    }

    #[test]
    fn u_chart_per_unit() {
        let samples: Vec<_> = [5, 7, 4, 8, 6, 7, 5, 6, 8, 7]
            .iter()
            .enumerate()
            .map(|(i, &d)| DefectSample::per_unit((i + 1).to_string(), d))
            .collect();
        let chart = u_chart(&samples).unwrap();
        assert!((chart.center - 6.3).abs() < 1e-12);
        let half = 3.0 * 6.3_f64.sqrt();
        assert!((chart.rows[0].limits.ucl - (6.3 + half)).abs() < 1e-12);
        assert!((chart.rows[0].limits.lcl - (6.3 - half).max(0.0)).abs() < 1e-12);
        assert!(chart.is_in_control());
    }

    #[test]
    fn u_chart_floors_and_scales_by_units() {
        let samples = vec![DefectSample::new("a", 1, 0.5), DefectSample::new("b", 1, 2.0)];
        let chart = u_chart(&samples).unwrap();
        assert!((chart.center - 0.8).abs() < 1e-12);
        assert_eq!(chart.rows[0].limits.lcl, 0.0);
        assert!((chart.rows[0].value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn u_chart_rejects_bad_units() {
        let err = u_chart(&[DefectSample::new("a", 1, 0.0)]).unwrap_err();
        assert!(matches!(err, SpcError::InvalidArgument { name: "units", .. }));
    }
}
