//! In-memory record store.

use wt_common::{AnalysisSummary, TransitionRecord};

use crate::store::{RecordStore, StoreError, StoreResult};

/// Vector-backed [`RecordStore`].
///
/// Resizing pads with zeroed records that are later overwritten, the same
/// way a growable dataset exposes fill values until written.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<TransitionRecord>,
    summary: Option<AnalysisSummary>,
    resize_calls: usize,
}

const FILL: TransitionRecord = TransitionRecord {
    block_id: 0,
    timepoint: 0,
    initial_bin: 0,
    final_bin: 0,
    initial_weight: 0.0,
    final_weight: 0.0,
    initial_bin_population: 0.0,
    duration: 0,
    first_passage_time: 0,
};

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TransitionRecord> {
        self.records
    }

    pub fn summary(&self) -> Option<&AnalysisSummary> {
        self.summary.as_ref()
    }

    /// Number of times the store has been grown or truncated.
    pub fn resize_calls(&self) -> usize {
        self.resize_calls
    }
}

impl RecordStore for MemoryStore {
    fn len(&self) -> u64 {
        self.records.len() as u64
    }

    fn resize(&mut self, new_len: u64) -> StoreResult<()> {
        self.records.resize(new_len as usize, FILL);
        self.resize_calls += 1;
        Ok(())
    }

    fn write_range(&mut self, offset: u64, records: &[TransitionRecord]) -> StoreResult<()> {
        let start = offset as usize;
        let end = start + records.len();
        if end > self.records.len() {
            return Err(StoreError::OutOfBounds {
                offset,
                end: end as u64,
                len: self.len(),
            });
        }
        self.records[start..end].copy_from_slice(records);
        Ok(())
    }

    fn write_summary(&mut self, summary: &AnalysisSummary) -> StoreResult<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}
