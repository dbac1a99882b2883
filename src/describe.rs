//! Process overview statistics for a series of measurements.

use serde::Serialize;
use u_numflow::stats;

use crate::error::{Result, SpcError};

/// Location, spread and shape of a value series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    pub skewness: f64,
    /// Excess kurtosis (0 for a normal distribution).
    pub kurtosis: f64,
}

impl Description {
    /// One-line caption, values rounded to two decimals.
    ///
    /// ```
    /// use u_spc::describe::describe;
    ///
    /// let d = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    /// assert!(d.caption().starts_with("Process Mean: 3 | SD: 1.58"));
    /// ```
    pub fn caption(&self) -> String {
        format!(
            "Process Mean: {} | SD: {} | Skewness: {} | Kurtosis: {}",
            round2(self.mean),
            round2(self.std_dev),
            round2(self.skewness),
            round2(self.kurtosis)
        )
    }
}

/// Describes a value series.
///
/// Skewness and kurtosis need at least four values; shorter series fail with
/// [`SpcError::InsufficientData`].
pub fn describe(values: &[f64]) -> Result<Description> {
    if values.len() < 4 {
        return Err(SpcError::insufficient(format!(
            "describe needs at least 4 values, got {}",
            values.len()
        )));
    }
    let missing = || SpcError::insufficient("series contains non-finite values");
    Ok(Description {
        count: values.len(),
        mean: stats::mean(values).ok_or_else(missing)?,
        std_dev: stats::std_dev(values).ok_or_else(missing)?,
        // Zero spread leaves shape undefined; report it as flat.
        skewness: stats::skewness(values).unwrap_or(0.0),
        kurtosis: stats::kurtosis(values).unwrap_or(0.0),
    })
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
