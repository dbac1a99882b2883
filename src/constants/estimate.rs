//! Repeated-trial estimation of range and standard-deviation constants.

use serde::Serialize;
use u_numflow::stats;

use super::source::{CancelToken, NormalSource};
use crate::error::{Result, SpcError};

/// Default number of simulated trials per estimate.
pub const DEFAULT_TRIALS: usize = 10_000;

/// Below this many trials the estimates are noisy enough to mislead; a
/// warning is logged.
pub const RELIABLE_TRIALS: usize = 500;

/// Constants for range-based charts at subgroup size `n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeConstants {
    pub n: usize,
    pub trials: usize,
    /// Mean of the simulated ranges.
    pub d2: f64,
    /// Standard deviation of the simulated ranges.
    pub d3: f64,
    /// D3 = max(0, 1 - 3 d3/d2). Floored at zero because a range cannot be
    /// negative.
    pub lcl_factor: f64,
    /// D4 = 1 + 3 d3/d2.
    pub ucl_factor: f64,
}

/// Constants for standard-deviation charts at subgroup size `n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StdDevConstants {
    pub n: usize,
    pub trials: usize,
    /// Mean of the simulated sample standard deviations.
    pub b2: f64,
    /// Standard deviation of the simulated sample standard deviations.
    pub b3: f64,
    /// Bias-correction factor of the sample standard deviation; equal to b2.
    pub c4: f64,
    /// A3 = 3 / (b2 sqrt(n)), the average-chart multiplier for s-bar.
    pub a3: f64,
    /// B3 = max(0, 1 - 3 b3/b2). Floored at zero.
    pub lcl_factor: f64,
    /// B4 = 1 + 3 b3/b2.
    pub ucl_factor: f64,
}

/// Estimates d2, d3, D3 and D4 for subgroups of size `n`.
///
/// Each trial draws `n` standard-normal values and records `max - min`.
/// The result is stochastic; larger `trials` gives tighter estimates.
///
/// For `n = 1` every range is zero, so d2 = d3 = 0 and the factors are
/// reported as D3 = 0, D4 = 1.
///
/// # Errors
///
/// - `InvalidArgument` if `n == 0` or `trials == 0`
/// - `InsufficientData` if `trials == 1`. One trial is a valid count, but
///   d3 is the spread of the simulated ranges and needs at least two of
///   them, so the accepted minimum is two trials.
///
/// # Examples
///
/// ```
/// use u_spc::constants::{estimate_range_constants, seeded_rng};
///
/// let mut rng = seeded_rng(Some(42));
/// let k = estimate_range_constants(2, 20_000, &mut rng).unwrap();
/// assert!((k.d2 - 1.128).abs() < 0.03);
/// assert!(k.lcl_factor <= k.ucl_factor);
/// ```
pub fn estimate_range_constants<S>(n: usize, trials: usize, source: &mut S) -> Result<RangeConstants>
where
    S: NormalSource + ?Sized,
{
    estimate_range_constants_cancellable(n, trials, source, &CancelToken::new())
}

/// [`estimate_range_constants`] with cooperative cancellation between trials.
pub fn estimate_range_constants_cancellable<S>(
    n: usize,
    trials: usize,
    source: &mut S,
    cancel: &CancelToken,
) -> Result<RangeConstants>
where
    S: NormalSource + ?Sized,
{
    validate(n, 1, trials)?;
    let ranges = simulate(n, trials, source, cancel, |draws| {
        let (lo, hi) = draws
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        hi - lo
    })?;
    let (d2, d3) = mean_and_spread(&ranges)?;
    let ratio = spread_ratio(d3, d2);
    // n = 1: every range is zero, so both limits collapse onto the center.
    let lcl_factor = if d2 == 0.0 {
        0.0
    } else {
        (1.0 - 3.0 * ratio).max(0.0)
    };

    Ok(RangeConstants {
        n,
        trials,
        d2,
        d3,
        lcl_factor,
        ucl_factor: 1.0 + 3.0 * ratio,
    })
}

/// Estimates b2, b3, C4, A3, B3 and B4 for subgroups of size `n`.
///
/// Each trial draws `n` standard-normal values and records their sample
/// standard deviation (n - 1 denominator).
///
/// # Errors
///
/// - `InvalidArgument` if `n == 0` or `trials == 0`
/// - `InsufficientData` if `n == 1` (a single draw has no standard
///   deviation) or `trials == 1`
///
/// # Examples
///
/// ```
/// use u_spc::constants::{c4, estimate_stddev_constants, seeded_rng};
///
/// let mut rng = seeded_rng(Some(42));
/// let k = estimate_stddev_constants(5, 50_000, &mut rng).unwrap();
/// let exact = c4(5).unwrap();
/// assert!((k.c4 - exact).abs() / exact < 0.01);
/// ```
pub fn estimate_stddev_constants<S>(
    n: usize,
    trials: usize,
    source: &mut S,
) -> Result<StdDevConstants>
where
    S: NormalSource + ?Sized,
{
    estimate_stddev_constants_cancellable(n, trials, source, &CancelToken::new())
}

/// [`estimate_stddev_constants`] with cooperative cancellation between trials.
pub fn estimate_stddev_constants_cancellable<S>(
    n: usize,
    trials: usize,
    source: &mut S,
    cancel: &CancelToken,
) -> Result<StdDevConstants>
where
    S: NormalSource + ?Sized,
{
    validate(n, 1, trials)?;
    if n < 2 {
        return Err(SpcError::insufficient(
            "standard deviation constants need subgroup size n >= 2",
        ));
    }
    let sds = simulate(n, trials, source, cancel, |draws| {
        stats::std_dev(draws).unwrap_or(f64::NAN)
    })?;
    let (b2, b3) = mean_and_spread(&sds)?;
    let ratio = spread_ratio(b3, b2);

    Ok(StdDevConstants {
        n,
        trials,
        b2,
        b3,
        c4: b2,
        a3: 3.0 / (b2 * (n as f64).sqrt()),
        lcl_factor: (1.0 - 3.0 * ratio).max(0.0),
        ucl_factor: 1.0 + 3.0 * ratio,
    })
}

fn validate(n: usize, min_n: usize, trials: usize) -> Result<()> {
    if n < min_n {
        return Err(SpcError::invalid(
            "n",
            format!("subgroup size must be >= {min_n}, got {n}"),
        ));
    }
    if trials == 0 {
        return Err(SpcError::invalid("trials", "must be >= 1, got 0"));
    }
    if trials < RELIABLE_TRIALS {
        log::warn!(
            "{trials} trials is below {RELIABLE_TRIALS}; simulated constants for n={n} will be unreliable"
        );
    }
    Ok(())
}

/// Runs `trials` repetitions of `statistic` over `n` fresh draws.
///
/// One draw buffer is reused across trials.
fn simulate<S, F>(
    n: usize,
    trials: usize,
    source: &mut S,
    cancel: &CancelToken,
    statistic: F,
) -> Result<Vec<f64>>
where
    S: NormalSource + ?Sized,
    F: Fn(&[f64]) -> f64,
{
    let mut draws = vec![0.0; n];
    let mut out = Vec::with_capacity(trials);
    for _ in 0..trials {
        if cancel.is_cancelled() {
            return Err(SpcError::Cancelled);
        }
        source.fill_standard_normal(&mut draws);
        out.push(statistic(&draws));
    }
    Ok(out)
}

fn mean_and_spread(samples: &[f64]) -> Result<(f64, f64)> {
    let mean = stats::mean(samples)
        .ok_or_else(|| SpcError::insufficient("no simulated statistics to average"))?;
    let spread = stats::std_dev(samples).ok_or_else(|| {
        SpcError::insufficient("at least 2 trials are needed to estimate spread")
    })?;
    Ok((mean, spread))
}

/// `spread / center`, defined as 0 when the center is 0 (n = 1 ranges).
fn spread_ratio(spread: f64, center: f64) -> f64 {
    if center == 0.0 {
        0.0
    } else {
        spread / center
    }
}
