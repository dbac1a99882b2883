//! # u-spc
//!
//! Statistical process control (SPC) engine: control-chart constants by
//! simulation, subgroup statistics, control limits, process capability
//! indices and bootstrap confidence intervals.
//!
//! The engine emits plain numeric tables. Plotting them is left to the
//! caller.
//!
//! ## Modules
//!
//! - [`dataset`]: Labeled measurements, subgroup partitioning, CSV input
//! - [`describe`]: Process overview (mean, SD, skewness, kurtosis)
//! - [`constants`]: Monte Carlo d2/d3, b2/b3 and derived factors, with a cache
//! - [`subgroup`]: Per-subgroup summaries and pooled σ_short / σ_total
//! - [`spc`]: Control limits for X̄, S, R, mR, p, np and u charts
//! - [`capability`]: Cp, Pp, Cpk, Ppk and normal-theory intervals
//! - [`bootstrap`]: Resampling intervals for any capability index
//! - [`session`]: [`Analysis`](session::Analysis), one context per analysis
//! - [`error`]: Error taxonomy shared by every stage
//!
//! ## Design Philosophy
//!
//! - **Explicit context**: no global state; every run takes its dataset as an argument
//! - **Numerical stability**: Leverages `u-numflow` for stable statistics
//! - **Typed failures**: missing limits, undefined sigma and zero spread are distinct errors

pub mod bootstrap;
pub mod capability;
pub mod constants;
pub mod dataset;
pub mod describe;
pub mod error;
pub mod session;
pub mod spc;
pub mod subgroup;

pub use error::{Result, SpcError};
