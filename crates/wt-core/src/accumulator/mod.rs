//! Transition event accumulator.
//!
//! Consumes a trajectory one segment at a time, detects bin-to-bin
//! crossings, emits a [`TransitionRecord`] for every transition a crossing
//! completes, and keeps the cumulative count matrix. Records are buffered
//! in front of a [`RecordStore`].
//!
//! Branching trajectories are walked depth-first by the caller, who saves
//! and restores per-trajectory state with [`TransitionEventAccumulator::get_state`]
//! and [`TransitionEventAccumulator::set_state`] at branch points.
//!
//! Single-threaded: use one accumulator per worker and merge count
//! matrices afterwards.

pub mod buffer;
mod detect;
mod series;
pub mod state;

pub use buffer::{RecordBuffer, WritePath};
pub use state::{AccumulatorState, Cursor};

use tracing::trace;
use wt_common::{CountMatrix, Segment, TransitionRecord, ValidationError};
use wt_store::RecordStore;

use crate::config::AccumulatorConfig;
use crate::error::{Error, Result};
use detect::{apply_crossing, Crossing};
use series::SampleSeries;

/// Streaming transition detector bound to a bin count and an output store.
pub struct TransitionEventAccumulator<S: RecordStore> {
    n_bins: usize,
    config: AccumulatorConfig,
    state: AccumulatorState,
    n_trans: CountMatrix,
    buffer: RecordBuffer<S>,
}

impl<S: RecordStore> TransitionEventAccumulator<S> {
    pub fn new(n_bins: usize, store: S, config: AccumulatorConfig) -> Self {
        let buffer = RecordBuffer::new(store, config.buffer_capacity);
        TransitionEventAccumulator {
            n_bins,
            config,
            state: AccumulatorState::new(n_bins),
            n_trans: CountMatrix::new(n_bins),
            buffer,
        }
    }

    pub fn with_defaults(n_bins: usize, store: S) -> Self {
        Self::new(n_bins, store, AccumulatorConfig::default())
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    pub fn config(&self) -> &AccumulatorConfig {
        &self.config
    }

    /// Cumulative transition counts.
    pub fn n_trans(&self) -> &CountMatrix {
        &self.n_trans
    }

    /// Records handed to the store so far (excludes buffered records).
    pub fn records_written(&self) -> u64 {
        self.buffer.records_written()
    }

    /// Records held in memory, not yet written.
    pub fn records_buffered(&self) -> usize {
        self.buffer.buffered()
    }

    pub fn store(&self) -> &S {
        self.buffer.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.buffer.store_mut()
    }

    /// Flush and hand back the store.
    pub fn finish(mut self) -> Result<S> {
        self.flush()?;
        Ok(self.buffer.into_store())
    }

    /// Reset counts, buffered records, the output cursor, and trajectory state.
    pub fn clear(&mut self) {
        self.clear_state();
        self.n_trans.reset();
        self.buffer.clear();
    }

    /// Reset only the per-trajectory state, keeping counts and output.
    pub fn clear_state(&mut self) {
        self.state.reset();
    }

    /// Independent copy of the per-trajectory state.
    pub fn get_state(&self) -> AccumulatorState {
        self.state.clone()
    }

    /// Replace the per-trajectory state with a snapshot.
    ///
    /// Snapshots restored from storage are checked against this
    /// accumulator's bin count before being accepted.
    pub fn set_state(&mut self, snapshot: AccumulatorState) -> Result<()> {
        if snapshot.n_bins() != self.n_bins {
            return Err(Error::SnapshotMismatch {
                expected: self.n_bins,
                actual: snapshot.n_bins(),
            });
        }
        if let Some(reason) = snapshot.shape_error() {
            return Err(Error::InvalidSnapshot(reason));
        }
        self.state = snapshot;
        Ok(())
    }

    /// Write all buffered records to the store.
    pub fn flush(&mut self) -> Result<()> {
        self.buffer.flush()?;
        Ok(())
    }

    /// Apply a store truncation left pending by [`clear`](Self::clear).
    ///
    /// Processing any segment does this implicitly; call it when a run may
    /// finish without processing one.
    pub fn reset_output(&mut self) -> Result<()> {
        self.buffer.apply_pending_truncate()?;
        Ok(())
    }

    /// Process the first segment of a new trajectory.
    ///
    /// Trajectory state is reset; timepoints start at 0.
    pub fn start_accumulation(&mut self, segment: &Segment) -> Result<()> {
        segment.validate(self.n_bins)?;
        if segment.is_empty() {
            return Err(ValidationError::EmptySegment.into());
        }
        self.clear_state();
        self.accumulate(&SampleSeries::fresh(segment), segment.block_id)
    }

    /// Process the next segment of the trajectory in progress.
    ///
    /// Behaves as if the previous segments and this one had been passed to
    /// a single [`start_accumulation`](Self::start_accumulation), without
    /// re-emitting earlier records.
    pub fn continue_accumulation(&mut self, segment: &Segment) -> Result<()> {
        segment.validate(self.n_bins)?;
        let cursor = self.state.cursor.ok_or(Error::NoPriorState)?;
        self.accumulate(&SampleSeries::continued(cursor, segment), segment.block_id)
    }

    /// On a store error the segment is only partly processed: every detected
    /// record is counted and held in the buffer or the store, but the
    /// trajectory cursor is dropped so the trajectory cannot be continued.
    /// Restore a snapshot or start a new trajectory to go on.
    fn accumulate(&mut self, series: &SampleSeries<'_>, block_id: u64) -> Result<()> {
        let result = self.detect_and_append(series, block_id);
        if result.is_err() {
            self.state.cursor = None;
        }
        result
    }

    fn detect_and_append(&mut self, series: &SampleSeries<'_>, block_id: u64) -> Result<()> {
        let burst_limit = self.config.burst_limit();
        let mut pending: Vec<TransitionRecord> = Vec::new();

        for k in 1..series.len() {
            let initial_bin = series.bin(k - 1);
            let final_bin = series.bin(k);
            if initial_bin == final_bin {
                continue;
            }

            let crossing = Crossing {
                block_id,
                timepoint: series.timepoint(k),
                initial_bin,
                final_bin,
                arrival_weight: series.weight(k),
                initial_bin_population: series.population(k - 1, initial_bin),
            };
            apply_crossing(
                &mut self.state,
                &mut self.n_trans,
                self.config.calc_fpts,
                &crossing,
                &mut pending,
            );

            if pending.len() as f64 > burst_limit {
                trace!(records = pending.len(), "burst flush");
                self.buffer.append(&pending)?;
                pending.clear();
                self.buffer.flush()?;
            }
        }

        self.buffer.append(&pending)?;
        self.state.cursor = series.final_cursor();
        Ok(())
    }
}
