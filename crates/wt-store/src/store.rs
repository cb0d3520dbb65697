//! The growable record store interface.

use thiserror::Error;
use wt_common::{AnalysisSummary, BinWidth, TransitionRecord};

/// Errors from record store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("non-contiguous write at offset {offset}, store holds {written} records")]
    NonContiguous { offset: u64, written: u64 },

    #[error("write of [{offset}, {end}) exceeds store length {len}; resize first")]
    OutOfBounds { offset: u64, end: u64, len: u64 },

    #[error("cannot shrink store from {written} written records to {requested}")]
    Shrink { written: u64, requested: u64 },

    #[error("store already closed")]
    Closed,

    #[error("column {column} has unexpected type {found}")]
    ColumnType { column: String, found: String },

    #[error("bin {bin} does not fit a {width} bin column; store was created for fewer bins")]
    BinOverflow { bin: u32, width: BinWidth },
}

impl StoreError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            StoreError::Io(_) => 30,
            StoreError::Parquet(_) => 31,
            StoreError::Arrow(_) => 32,
            StoreError::Json(_) => 33,
            StoreError::NonContiguous { .. } => 34,
            StoreError::OutOfBounds { .. } => 35,
            StoreError::Shrink { .. } => 36,
            StoreError::Closed => 37,
            StoreError::ColumnType { .. } => 38,
            StoreError::BinOverflow { .. } => 39,
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only, growable storage of fixed-width transition records.
///
/// Mirrors a resizable dataset: callers grow it with [`RecordStore::resize`]
/// and then fill `[offset, offset + records.len())` with
/// [`RecordStore::write_range`]. Retries, if any, belong to implementations.
pub trait RecordStore {
    /// Current length in records (including reserved, not yet written rows).
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the length to `new_len` records.
    ///
    /// `resize(0)` discards everything written so far.
    fn resize(&mut self, new_len: u64) -> StoreResult<()>;

    /// Write `records` starting at `offset`. The range must lie within `len()`.
    fn write_range(&mut self, offset: u64, records: &[TransitionRecord]) -> StoreResult<()>;

    /// Persist the once-per-run aggregate outputs.
    fn write_summary(&mut self, summary: &AnalysisSummary) -> StoreResult<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn len(&self) -> u64 {
        (**self).len()
    }

    fn resize(&mut self, new_len: u64) -> StoreResult<()> {
        (**self).resize(new_len)
    }

    fn write_range(&mut self, offset: u64, records: &[TransitionRecord]) -> StoreResult<()> {
        (**self).write_range(offset, records)
    }

    fn write_summary(&mut self, summary: &AnalysisSummary) -> StoreResult<()> {
        (**self).write_summary(summary)
    }
}
