//! Weighted-ensemble transition analysis: shared types and errors.
//!
//! This crate provides the vocabulary shared by the store and the core:
//! - Bin indices, record column widths, and the opaque bin-space digest
//! - Trajectory segments as delivered by a trajectory supplier
//! - Transition records and the cumulative transition count matrix
//! - The per-run analysis summary
//! - Input validation errors

pub mod bin;
pub mod error;
pub mod matrix;
pub mod record;
pub mod segment;
pub mod summary;

pub use bin::{BinDigest, BinIndex, BinWidth, BIN_DIGEST_LEN};
pub use error::{ValidationError, ValidationResult};
pub use matrix::CountMatrix;
pub use record::TransitionRecord;
pub use segment::Segment;
pub use summary::AnalysisSummary;

/// Schema version for records and summaries written by this workspace.
pub const SCHEMA_VERSION: &str = "1.0.0";
