//! Transition record storage.
//!
//! This crate provides:
//! - The [`RecordStore`] trait: the create/resize/bulk-write primitives the
//!   accumulator needs from a growable, append-only record store
//! - The Arrow schema for the transition table
//! - An in-memory store for tests and small runs
//! - A Parquet-backed store with temp-file + atomic-rename finalisation

pub mod batch;
pub mod memory;
pub mod reader;
pub mod schema;
pub mod store;
pub mod writer;

pub use memory::MemoryStore;
pub use reader::read_transitions;
pub use schema::{bin_data_type, transitions_schema, TRANSITIONS_TABLE};
pub use store::{RecordStore, StoreError, StoreResult};
pub use writer::{Compression, ParquetStore, StoreConfig, StorePaths};

/// Default row group size, in records, for the transition table.
pub const DEFAULT_ROW_GROUP_SIZE: usize = 4096;
