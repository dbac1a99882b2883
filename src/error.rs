//! Error types shared by every stage of the SPC pipeline.
//!
//! All failures are returned to the immediate caller. Nothing is retried:
//! simulation and resampling failures are deterministic for their inputs.

use thiserror::Error;

/// Errors produced by the SPC engine.
#[derive(Debug, Error)]
pub enum SpcError {
    /// A parameter is out of range (subgroup size, trial count, alpha, ...).
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A capability index was requested without the limits it needs.
    #[error("{index} requires {needed}")]
    MissingSpecification {
        index: &'static str,
        needed: &'static str,
    },

    /// Not enough observations for the requested statistic.
    #[error("insufficient data: {context}")]
    InsufficientData { context: String },

    /// A divisor (usually a standard deviation) is zero.
    #[error("{statistic} is zero; the index is infinite")]
    NumericDegeneracy { statistic: &'static str },

    /// A long-running simulation was cancelled; partial results were dropped.
    #[error("computation cancelled")]
    Cancelled,

    /// A requested column does not exist in the input table.
    #[error("column `{column}` not found in input header")]
    MissingColumn { column: String },

    /// A value in the input table could not be parsed as a number.
    #[error("row {row}: cannot parse `{text}` in column `{column}` as a number")]
    InvalidValue {
        row: usize,
        column: String,
        text: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SpcError>;

impl SpcError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SpcError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn insufficient(context: impl Into<String>) -> Self {
        SpcError::InsufficientData {
            context: context.into(),
        }
    }
}
