//! Bootstrap confidence intervals for capability indices.
//!
//! Each replicate resamples the dataset with replacement, recomputes the
//! requested index, and records it. The standard error is the standard
//! deviation of the replicates and the interval is their empirical
//! `[α/2, 1 − α/2]` percentiles.
//!
//! Two resampling schemes are offered (see [`Granularity`]):
//!
//! - **Subgroup**: draw whole subgroups, keeping within-subgroup structure
//!   and the distribution of subgroup sizes.
//! - **Observation**: draw individual measurements, ignoring subgroups.
//!
//! # References
//!
//! - Efron, B. & Tibshirani, R.J. (1993). *An Introduction to the Bootstrap*.
//! - Franklin, L.A. & Wasserman, G.S. (1991), "Bootstrap Confidence Interval
//!   Estimates of Cpk", *Communications in Statistics* 20(1), pp. 231--242.

mod config;
mod engine;

pub use config::{BootstrapConfig, Granularity, DEFAULT_REPS, RELIABLE_REPS};
pub use engine::{
    bootstrap_index, bootstrap_index_cancellable, bootstrap_index_with_rng, BootstrapSummary,
};
