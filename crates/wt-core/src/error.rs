//! Error types for transition accumulation and analysis runs.
//!
//! Every variant carries a stable numeric code and a category:
//! - 10-19: input validation
//! - 20-29: accumulator state
//! - 30-39: record store
//! - 40-49: configuration
//! - 50-59: trajectory supplier

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wt_common::ValidationError;
use wt_store::StoreError;

use crate::config::ConfigError;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Input,
    State,
    Store,
    Config,
    Supplier,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::State => write!(f, "state"),
            ErrorCategory::Store => write!(f, "store"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Supplier => write!(f, "supplier"),
        }
    }
}

/// Unified error type for the core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("no prior state: continue_accumulation needs a preceding start_accumulation or set_state")]
    NoPriorState,

    #[error("snapshot is for {actual} bins, accumulator has {expected}")]
    SnapshotMismatch { expected: usize, actual: usize },

    #[error("no saved branch point to restore")]
    NoBranchPoint,

    #[error("inconsistent snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("record store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("trajectory supplier failed: {0}")]
    Supplier(String),
}

impl Error {
    /// Returns the error code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Error::Validation(e) => e.code(),
            Error::NoPriorState => 20,
            Error::SnapshotMismatch { .. } => 21,
            Error::NoBranchPoint => 22,
            Error::InvalidSnapshot(_) => 23,
            Error::Store(e) => e.code(),
            Error::Config(e) => e.code(),
            Error::Supplier(_) => 50,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation(_) => ErrorCategory::Input,
            Error::NoPriorState
            | Error::SnapshotMismatch { .. }
            | Error::NoBranchPoint
            | Error::InvalidSnapshot(_) => ErrorCategory::State,
            Error::Store(_) => ErrorCategory::Store,
            Error::Config(_) => ErrorCategory::Config,
            Error::Supplier(_) => ErrorCategory::Supplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_category_ranges() {
        let cases: Vec<(Error, ErrorCategory)> = vec![
            (
                Error::Validation(ValidationError::EmptySegment),
                ErrorCategory::Input,
            ),
            (Error::NoPriorState, ErrorCategory::State),
            (
                Error::SnapshotMismatch {
                    expected: 3,
                    actual: 4,
                },
                ErrorCategory::State,
            ),
            (Error::NoBranchPoint, ErrorCategory::State),
            (
                Error::InvalidSnapshot("last_exit has 1 entries, expected 3".into()),
                ErrorCategory::State,
            ),
            (Error::Store(StoreError::Closed), ErrorCategory::Store),
            (
                Error::Config(ConfigError::InvalidValue {
                    field: "x".into(),
                    message: "y".into(),
                }),
                ErrorCategory::Config,
            ),
            (Error::Supplier("eof".into()), ErrorCategory::Supplier),
        ];

        for (err, category) in cases {
            assert_eq!(err.category(), category, "{}", err);
            let range = match category {
                ErrorCategory::Input => 10..20,
                ErrorCategory::State => 20..30,
                ErrorCategory::Store => 30..40,
                ErrorCategory::Config => 40..50,
                ErrorCategory::Supplier => 50..60,
            };
            assert!(range.contains(&err.code()), "{} -> {}", err, err.code());
        }
    }

    #[test]
    fn test_validation_converts() {
        let err: Error = ValidationError::EmptySegment.into();
        assert!(matches!(err, Error::Validation(ValidationError::EmptySegment)));
        assert_eq!(err.to_string(), "invalid input: segment contains no samples");
    }
}
