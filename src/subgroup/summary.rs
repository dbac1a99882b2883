//! Descriptive statistics of a single subgroup.

use serde::Serialize;
use u_numflow::stats;

use crate::error::{Result, SpcError};

/// Statistics of one subgroup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgroupSummary {
    pub label: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN when `count == 1`.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Degrees of freedom, `count - 1`.
    pub df: usize,
}

impl SubgroupSummary {
    /// Summarizes one subgroup's values.
    ///
    /// # Errors
    ///
    /// `InsufficientData` if `values` is empty.
    ///
    /// ```
    /// use u_spc::subgroup::SubgroupSummary;
    ///
    /// let s = SubgroupSummary::from_values("1", &[10.0, 11.0, 9.0, 10.0]).unwrap();
    /// assert_eq!(s.range, 2.0);
    /// assert_eq!(s.df, 3);
    /// ```
    pub fn from_values(label: &str, values: &[f64]) -> Result<Self> {
        let empty = || SpcError::insufficient(format!("subgroup `{label}` has no observations"));
        let mean = stats::mean(values).ok_or_else(empty)?;
        let min = stats::min(values).ok_or_else(empty)?;
        let max = stats::max(values).ok_or_else(empty)?;
        Ok(Self {
            label: label.to_string(),
            count: values.len(),
            mean,
            std_dev: stats::std_dev(values).unwrap_or(f64::NAN),
            min,
            max,
            range: max - min,
            df: values.len() - 1,
        })
    }

    /// Whether a standard deviation is defined for this subgroup.
    pub fn has_spread(&self) -> bool {
        self.df > 0
    }

    /// Sample variance, `None` for a single observation.
    pub fn variance(&self) -> Option<f64> {
        self.has_spread().then(|| self.std_dev * self.std_dev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_summary() {
        let s = SubgroupSummary::from_values("a", &[12.0, 13.0, 11.0, 12.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean - 12.0).abs() < 1e-12);
        assert!((s.std_dev - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 11.0);
        assert_eq!(s.max, 13.0);
        assert_eq!(s.range, 2.0);
        assert_eq!(s.df, 3);
    }

    #[test]
    fn single_observation_has_no_spread() {
        let s = SubgroupSummary::from_values("a", &[5.0]).unwrap();
        assert!(s.std_dev.is_nan());
        assert_eq!(s.df, 0);
        assert_eq!(s.range, 0.0);
        assert!(!s.has_spread());
        assert!(s.variance().is_none());
    }

    #[test]
    fn empty_subgroup_rejected() {
        assert!(matches!(
            SubgroupSummary::from_values("x", &[]),
            Err(SpcError::InsufficientData { .. })
        ));
    }
}
