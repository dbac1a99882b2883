//! Control limit tables shared by every chart type.
//!
//! A chart is emitted as a plain table: one [`LimitRow`] per plotted point,
//! each with its own limits (limits vary per row whenever subgroup sizes
//! differ). Rendering is left to the caller.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587: Standard Practice for Use of Control Charts

use serde::Serialize;

/// Chart families supported by the limit calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    /// Subgroup averages (X-bar).
    Average,
    /// Subgroup standard deviations (S).
    StdDev,
    /// Subgroup ranges (R).
    Range,
    /// Moving ranges of individual observations (mR).
    MovingRange,
    /// Fraction defective (p).
    FractionDefective,
    /// Count defective (np).
    CountDefective,
    /// Defects per unit (u).
    DefectsPerUnit,
}

/// Control limits for one point.
///
/// # Invariants
///
/// - `lcl <= cl <= ucl`
/// - `lcl >= 0` for ranges, standard deviations, fractions and counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlLimits {
    /// Upper control limit.
    pub ucl: f64,
    /// Center line.
    pub cl: f64,
    /// Lower control limit.
    pub lcl: f64,
}

impl ControlLimits {
    /// Symmetric limits `cl ± half_width`.
    pub fn symmetric(cl: f64, half_width: f64) -> Self {
        Self {
            ucl: cl + half_width,
            cl,
            lcl: cl - half_width,
        }
    }

    /// Symmetric limits with the lower limit floored at zero, for quantities
    /// that cannot be negative.
    pub fn non_negative(cl: f64, half_width: f64) -> Self {
        Self {
            ucl: cl + half_width,
            cl,
            lcl: (cl - half_width).max(0.0),
        }
    }

    /// Whether `value` falls outside `[lcl, ucl]`.
    pub fn is_violated_by(&self, value: f64) -> bool {
        value > self.ucl || value < self.lcl
    }
}

/// One plotted point with its limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitRow {
    /// Subgroup label.
    pub label: String,
    /// Subgroup size, sample size, or units inspected.
    pub size: f64,
    /// Plotted statistic.
    pub value: f64,
    pub limits: ControlLimits,
    pub out_of_control: bool,
}

impl LimitRow {
    pub fn new(label: impl Into<String>, size: f64, value: f64, limits: ControlLimits) -> Self {
        Self {
            label: label.into(),
            size,
            value,
            out_of_control: limits.is_violated_by(value),
            limits,
        }
    }
}

/// A complete chart: its center parameter and one row per point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTable {
    pub kind: ChartKind,
    /// Pooled center parameter (x-double-bar, s-bar, r-bar, mR-bar, p-bar,
    /// n-bar * p-bar or u-bar).
    pub center: f64,
    pub rows: Vec<LimitRow>,
}

impl ChartTable {
    /// True when no row lies outside its limits.
    pub fn is_in_control(&self) -> bool {
        self.rows.iter().all(|r| !r.out_of_control)
    }

    /// Rows outside their limits.
    pub fn out_of_control(&self) -> impl Iterator<Item = &LimitRow> {
        self.rows.iter().filter(|r| r.out_of_control)
    }

    /// Widest upper and lowest lower limit across rows.
    pub fn envelope(&self) -> Option<ControlLimits> {
        let first = self.rows.first()?;
        Some(self.rows.iter().fold(first.limits, |acc, r| ControlLimits {
            ucl: acc.ucl.max(r.limits.ucl),
            cl: self.center,
            lcl: acc.lcl.min(r.limits.lcl),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_limits() {
        let limits = ControlLimits::symmetric(25.0, 5.0);
        assert!((limits.ucl - 30.0).abs() < f64::EPSILON);
        assert!((limits.cl - 25.0).abs() < f64::EPSILON);
        assert!((limits.lcl - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_negative_floors_at_zero() {
        let limits = ControlLimits::non_negative(0.02, 0.05);
        assert_eq!(limits.lcl, 0.0);
        assert!((limits.ucl - 0.07).abs() < 1e-15);
    }

    #[test]
    fn row_flags_violation() {
        let limits = ControlLimits::symmetric(10.0, 1.0);
        assert!(!LimitRow::new("1", 4.0, 10.5, limits).out_of_control);
        assert!(LimitRow::new("2", 4.0, 11.5, limits).out_of_control);
        assert!(LimitRow::new("3", 4.0, 8.9, limits).out_of_control);
    }

    #[test]
    fn table_in_control_and_envelope() {
        let table = ChartTable {
            kind: ChartKind::Average,
            center: 10.0,
            rows: vec![
                LimitRow::new("1", 4.0, 10.2, ControlLimits::symmetric(10.0, 1.0)),
                LimitRow::new("2", 2.0, 12.0, ControlLimits::symmetric(10.0, 1.5)),
            ],
        };
        assert!(!table.is_in_control());
        assert_eq!(table.out_of_control().count(), 1);
        let env = table.envelope().unwrap();
        assert!((env.ucl - 11.5).abs() < 1e-12);
        assert!((env.lcl - 8.5).abs() < 1e-12);
    }
}
