//! Transition event accumulation for weighted-ensemble trajectories.
//!
//! This crate provides:
//! - The streaming [`TransitionEventAccumulator`] with buffered output and
//!   branch-point snapshots
//! - The [`TransitionAnalysis`] run driver fed by a [`TrajectorySupplier`]
//! - Configuration loading and structured logging

pub mod accumulator;
pub mod analysis;
pub mod config;
pub mod error;
pub mod logging;

pub use accumulator::{AccumulatorState, Cursor, TransitionEventAccumulator, WritePath};
pub use analysis::{EventList, SegmentKind, SupplierEvent, TrajectorySupplier, TransitionAnalysis};
pub use config::{AccumulatorConfig, AnalysisConfig, ConfigError, RunSettings, StoreSettings};
pub use error::{Error, ErrorCategory, Result};

pub use wt_common::{
    AnalysisSummary, BinDigest, BinIndex, CountMatrix, Segment, TransitionRecord, ValidationError,
};
pub use wt_store::{MemoryStore, ParquetStore, RecordStore};
