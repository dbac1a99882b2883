//! Control limit calculation.
//!
//! Combines [`SubgroupStatistics`](crate::subgroup::SubgroupStatistics) with
//! simulated constants to produce center lines and limits for variables and
//! attributes charts. Output is a plain [`ChartTable`]; drawing it is the
//! caller's business.
//!
//! # Variables charts
//!
//! - [`average_chart`]: subgroup averages, direct or A3-based limits
//! - [`stddev_chart`]: subgroup standard deviations (B3, B4)
//! - [`range_chart`]: subgroup ranges (D3, D4)
//! - [`moving_range_chart`]: individual observations (d2 at n = 2)
//!
//! # Attributes charts
//!
//! - [`p_chart`]: fraction defective
//! - [`np_chart`]: count defective
//! - [`u_chart`]: defects per unit
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587: Standard Practice for Use of Control Charts

mod attributes;
mod calculator;
mod chart;
mod variables;

pub use attributes::{np_chart, p_chart, u_chart, DefectSample, DefectiveSample};
pub use calculator::{recommended_chart, ControlLimitCalculator};
pub use chart::{ChartKind, ChartTable, ControlLimits, LimitRow};
pub use variables::{average_chart, moving_range_chart, range_chart, stddev_chart, AverageMethod};
