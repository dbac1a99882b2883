use serde::{Deserialize, Serialize};

use crate::error::{Result, SpcError};

/// Default number of bootstrap replicates.
pub const DEFAULT_REPS: usize = 1000;

/// Fewer replicates than this log a warning.
pub const RELIABLE_REPS: usize = 500;

/// What a bootstrap replicate draws with replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Whole subgroups; as many draws as there are subgroups.
    #[default]
    Subgroup,
    /// Individual measurements; as many draws as there are observations.
    Observation,
}

/// Settings for [`bootstrap_index`](super::bootstrap_index).
///
/// ```
/// use u_spc::bootstrap::{BootstrapConfig, Granularity};
///
/// let config = BootstrapConfig::default()
///     .with_reps(2_000)
///     .with_granularity(Granularity::Observation)
///     .with_seed(3);
/// assert_eq!(config.alpha, 0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub reps: usize,
    /// Two-sided significance level of the percentile interval.
    pub alpha: f64,
    pub granularity: Granularity,
    /// Largest tolerated share of failed replicates, in `[0, 1]`.
    pub max_failure_fraction: f64,
    /// `None` seeds from the thread-local generator.
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            reps: DEFAULT_REPS,
            alpha: 0.05,
            granularity: Granularity::Subgroup,
            max_failure_fraction: 0.5,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    pub fn with_reps(mut self, reps: usize) -> Self {
        self.reps = reps;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_max_failure_fraction(mut self, fraction: f64) -> Self {
        self.max_failure_fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// # Errors
    ///
    /// `InvalidArgument` naming the first out-of-range field.
    pub fn validate(&self) -> Result<()> {
        if self.reps == 0 {
            return Err(SpcError::invalid("reps", "must be >= 1, got 0"));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(SpcError::invalid(
                "alpha",
                format!("must lie in (0, 1), got {}", self.alpha),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_failure_fraction) {
            return Err(SpcError::invalid(
                "max_failure_fraction",
                format!("must lie in [0, 1], got {}", self.max_failure_fraction),
            ));
        }
        if self.reps < RELIABLE_REPS {
            log::warn!(
                "{} bootstrap replicates is below {RELIABLE_REPS}; interval endpoints will be noisy",
                self.reps
            );
        }
        Ok(())
    }
}
