//! Process capability analysis.
//!
//! Compares the spread of a process with its specification limits.
//!
//! # Indices
//!
//! - **Cp**, **Cpk**: capability, from within-subgroup variation (σ_short)
//! - **Pp**, **Ppk**: performance, from overall variation (σ_total)
//!
//! [`CapabilityIndices`] collects all four for a dataset. Sampling
//! uncertainty is available as a normal-theory interval here, or by
//! resampling in [`crate::bootstrap`].
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.

mod indices;
mod interval;
mod limits;

pub use indices::{cp, cpk, pp, ppk, CapabilityIndices, IndexKind};
pub use interval::{normal_interval, NormalInterval};
pub use limits::SpecificationLimits;
