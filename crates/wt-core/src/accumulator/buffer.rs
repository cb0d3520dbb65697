//! Capacity-bounded record buffer in front of a growable store.
//!
//! Two write paths: batches that fit are buffered; a batch larger than the
//! whole buffer goes straight to the store after the buffer is flushed.
//! Either way the store sees records in append order, so the final table is
//! independent of capacity.

use tracing::{debug, trace};
use wt_common::TransitionRecord;
use wt_store::{RecordStore, StoreResult};

/// Which path an appended batch took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePath {
    Buffered,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Buffering,
    Flushing,
}

/// Append buffer owning the output store and the store write cursor.
pub struct RecordBuffer<S> {
    store: S,
    buffer: Vec<TransitionRecord>,
    capacity: usize,
    output_offset: u64,
    truncate_pending: bool,
    mode: Mode,
}

impl<S: RecordStore> RecordBuffer<S> {
    /// Wrap `store`, appending after whatever it already holds.
    pub fn new(store: S, capacity: usize) -> Self {
        let output_offset = store.len();
        RecordBuffer {
            store,
            buffer: Vec::new(),
            capacity: capacity.max(1),
            output_offset,
            truncate_pending: false,
            mode: Mode::Buffering,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records waiting in memory.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Records handed to the store so far.
    pub fn records_written(&self) -> u64 {
        self.output_offset
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Queue `records`, flushing or writing directly when they do not fit.
    ///
    /// Also applies a truncation left pending by [`clear`](Self::clear), even
    /// for an empty batch. On failure the batch is kept in the buffer so a
    /// later flush can retry it.
    pub fn append(&mut self, records: &[TransitionRecord]) -> StoreResult<WritePath> {
        match self.try_append(records) {
            Ok(path) => Ok(path),
            Err(err) => {
                self.buffer.extend_from_slice(records);
                Err(err)
            }
        }
    }

    /// Truncate the store now if a [`clear`](Self::clear) is pending.
    pub fn apply_pending_truncate(&mut self) -> StoreResult<()> {
        if self.truncate_pending {
            self.store.resize(0)?;
            self.truncate_pending = false;
            debug!("store truncated after clear");
        }
        Ok(())
    }

    // Records reach the buffer only on success, so a failed call has neither
    // buffered nor written any of them.
    fn try_append(&mut self, records: &[TransitionRecord]) -> StoreResult<WritePath> {
        debug_assert_eq!(self.mode, Mode::Buffering);
        self.apply_pending_truncate()?;
        if records.is_empty() {
            return Ok(WritePath::Buffered);
        }

        if self.buffer.len() + records.len() > self.capacity {
            self.flush()?;
            if records.len() > self.capacity {
                trace!(records = records.len(), "batch exceeds buffer, writing directly");
                self.write_to_store(records)?;
                return Ok(WritePath::Direct);
            }
        }

        self.buffer.extend_from_slice(records);
        Ok(WritePath::Buffered)
    }

    /// Write all buffered records to the store in append order.
    ///
    /// On failure the buffered records are kept.
    pub fn flush(&mut self) -> StoreResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.mode = Mode::Flushing;
        let mut pending = std::mem::take(&mut self.buffer);
        let result = self.write_to_store(&pending);
        if result.is_ok() {
            pending.clear();
        }
        self.buffer = pending;
        self.mode = Mode::Buffering;
        result
    }

    /// Drop buffered records and rewind the output cursor.
    ///
    /// The store itself is truncated lazily, on the next write.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.output_offset = 0;
        self.truncate_pending = true;
        self.mode = Mode::Buffering;
    }

    fn write_to_store(&mut self, records: &[TransitionRecord]) -> StoreResult<()> {
        self.apply_pending_truncate()?;

        let ub = self.output_offset + records.len() as u64;
        if ub > self.store.len() {
            self.store.resize(ub)?;
        }
        self.store.write_range(self.output_offset, records)?;
        debug!(
            records = records.len(),
            offset = self.output_offset,
            "wrote transition records"
        );
        self.output_offset = ub;
        Ok(())
    }
}
