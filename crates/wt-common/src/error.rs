//! Input validation errors.
//!
//! Segments are validated in full before any accumulator state is touched,
//! so a rejected segment never leaves partial updates behind.

use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Errors raised when supplied data does not fit the bin space.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error(
        "array length mismatch: {assignments} assignments, {weights} weights, {populations} population rows"
    )]
    LengthMismatch {
        assignments: usize,
        weights: usize,
        populations: usize,
    },

    #[error("bin {bin} at sample {index} is outside [0, {n_bins})")]
    BinOutOfRange {
        index: usize,
        bin: u32,
        n_bins: usize,
    },

    #[error("population row {index} has {actual} entries, expected {expected}")]
    PopulationWidth {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("segment contains no samples")]
    EmptySegment,

    #[error("bin digest must be {expected} bytes, got {actual}")]
    DigestLength { expected: usize, actual: usize },

    #[error("count matrices differ in size: {left} vs {right} bins")]
    MatrixSize { left: usize, right: usize },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::LengthMismatch { .. } => 10,
            ValidationError::BinOutOfRange { .. } => 11,
            ValidationError::PopulationWidth { .. } => 12,
            ValidationError::EmptySegment => 13,
            ValidationError::DigestLength { .. } => 14,
            ValidationError::MatrixSize { .. } => 15,
        }
    }
}
