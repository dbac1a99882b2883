//! Per-subgroup-size cache of simulated constants.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::Deserialize;

use super::estimate::{
    estimate_range_constants_cancellable, estimate_stddev_constants_cancellable, RangeConstants,
    StdDevConstants, DEFAULT_TRIALS,
};
use super::source::{seeded_rng, CancelToken};
use crate::error::Result;

/// Settings for constant estimation.
///
/// ```
/// use u_spc::constants::EstimatorConfig;
///
/// let config = EstimatorConfig::default().with_trials(50_000).with_seed(7);
/// assert_eq!(config.trials, 50_000);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Simulated trials per estimate.
    pub trials: usize,
    /// Base seed; `None` draws a fresh seed per estimate.
    pub seed: Option<u64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

impl EstimatorConfig {
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed for one (statistic, n) estimate, so seeded runs are reproducible
    /// regardless of the order in which subgroup sizes are requested.
    fn seed_for(&self, salt: u64, n: usize) -> Option<u64> {
        self.seed.map(|s| {
            s ^ salt
                .wrapping_add(n as u64)
                .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        })
    }
}

const RANGE_SALT: u64 = 0x5241_4e47;
const STDDEV_SALT: u64 = 0x5354_4456;

/// Compute-once cache of [`RangeConstants`] and [`StdDevConstants`] keyed by
/// subgroup size.
///
/// Reads take a shared lock. On a miss the estimate runs without holding any
/// lock; if two callers race on the same `n`, the first to store wins and both
/// receive the stored value.
///
/// ```
/// use u_spc::constants::{ConstantCache, EstimatorConfig};
///
/// let cache = ConstantCache::new(EstimatorConfig::default().with_trials(2_000).with_seed(1));
/// let first = cache.range(4).unwrap();
/// let again = cache.range(4).unwrap();
/// assert_eq!(first, again);
/// ```
#[derive(Debug, Default)]
pub struct ConstantCache {
    config: EstimatorConfig,
    range: RwLock<HashMap<usize, RangeConstants>>,
    stddev: RwLock<HashMap<usize, StdDevConstants>>,
}

impl ConstantCache {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            range: RwLock::default(),
            stddev: RwLock::default(),
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Range constants for subgroup size `n`.
    pub fn range(&self, n: usize) -> Result<RangeConstants> {
        self.range_cancellable(n, &CancelToken::new())
    }

    pub fn range_cancellable(&self, n: usize, cancel: &CancelToken) -> Result<RangeConstants> {
        get_or_compute(&self.range, n, || {
            let mut rng = seeded_rng(self.config.seed_for(RANGE_SALT, n));
            estimate_range_constants_cancellable(n, self.config.trials, &mut rng, cancel)
        })
    }

    /// Standard-deviation constants for subgroup size `n`.
    pub fn stddev(&self, n: usize) -> Result<StdDevConstants> {
        self.stddev_cancellable(n, &CancelToken::new())
    }

    pub fn stddev_cancellable(&self, n: usize, cancel: &CancelToken) -> Result<StdDevConstants> {
        get_or_compute(&self.stddev, n, || {
            let mut rng = seeded_rng(self.config.seed_for(STDDEV_SALT, n));
            estimate_stddev_constants_cancellable(n, self.config.trials, &mut rng, cancel)
        })
    }

    /// Number of cached entries (range + standard deviation).
    pub fn len(&self) -> usize {
        let r = self.range.read().unwrap_or_else(PoisonError::into_inner).len();
        let s = self.stddev.read().unwrap_or_else(PoisonError::into_inner).len();
        r + s
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn get_or_compute<T, F>(slot: &RwLock<HashMap<usize, T>>, n: usize, compute: F) -> Result<T>
where
    T: Copy,
    F: FnOnce() -> Result<T>,
{
    if let Some(hit) = slot
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&n)
    {
        log::debug!("constant cache hit for n={n}");
        return Ok(*hit);
    }
    log::debug!("constant cache miss for n={n}; simulating");
    let value = compute()?;
    let mut map = slot.write().unwrap_or_else(PoisonError::into_inner);
    Ok(*map.entry(n).or_insert(value))
}
