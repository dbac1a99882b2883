//! Control-chart constants estimated by Monte Carlo simulation.
//!
//! The constants d2, d3 (range) and b2, b3 (standard deviation) are the mean
//! and standard deviation of a summary statistic computed on `n` independent
//! standard-normal draws. They depend only on `n`, never on the data, so they
//! are estimated once per subgroup size and cached.
//!
//! # Derived factors
//!
//! | Statistic | Center | Lower factor | Upper factor |
//! |-----------|--------|--------------|--------------|
//! | Range     | d2     | D3 = max(0, 1 - 3 d3/d2) | D4 = 1 + 3 d3/d2 |
//! | Std. dev. | b2 (= c4) | B3 = max(0, 1 - 3 b3/b2) | B4 = 1 + 3 b3/b2 |
//!
//! plus A3 = 3 / (b2 sqrt(n)) for the average chart.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587: Standard Practice for Use of Control Charts

mod cache;
mod estimate;
mod reference;
mod source;

pub use cache::{ConstantCache, EstimatorConfig};
pub use estimate::{
    estimate_range_constants, estimate_range_constants_cancellable, estimate_stddev_constants,
    estimate_stddev_constants_cancellable, RangeConstants, StdDevConstants, DEFAULT_TRIALS,
    RELIABLE_TRIALS,
};
pub use reference::{c4, tabulated, TabulatedFactors};
pub use source::{seeded_rng, CancelToken, NormalSource};
