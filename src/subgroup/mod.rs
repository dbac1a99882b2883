//! Within- and between-subgroup statistics.
//!
//! Partitions a [`Dataset`](crate::dataset::Dataset) by subgroup label, then
//! pools the per-subgroup results into short-term (within) and long-term
//! (total) spread estimates.
//!
//! # Pooling rule
//!
//! σ_short is always the degrees-of-freedom-weighted pool
//!
//! ```text
//! σ_short = sqrt( Σ df_i · s_i² / Σ df_i ),   df_i = n_i - 1
//! ```
//!
//! which reduces to the root mean of subgroup variances when all subgroups
//! have the same size. Subgroups of size 1 have df = 0 and drop out.

mod pooled;
mod summary;

pub use pooled::{PooledStatistics, SubgroupStatistics};
pub use summary::SubgroupSummary;
