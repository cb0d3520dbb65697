//! Analysis run driver.
//!
//! Pulls segments from a [`TrajectorySupplier`], feeds them to a
//! [`TransitionEventAccumulator`], and writes the run's aggregate outputs.
//! The supplier owns the traversal order; branch points reach the driver as
//! explicit save/restore/drop events, which map onto accumulator snapshots.

use tracing::{debug, info};
use wt_common::{AnalysisSummary, BinDigest, Segment};
use wt_store::RecordStore;

use crate::accumulator::{AccumulatorState, TransitionEventAccumulator};
use crate::config::{AccumulatorConfig, RunSettings};
use crate::error::{Error, Result};
use crate::logging::generate_run_id;

/// Whether a segment begins a trajectory or extends the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    NewTrajectory,
    Continuation,
}

/// One step of a trajectory traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum SupplierEvent {
    Segment { kind: SegmentKind, segment: Segment },
    /// Remember the current trajectory state; children follow.
    SaveBranchPoint,
    /// Return to the most recently saved state, keeping it saved.
    RestoreBranchPoint,
    /// Forget the most recently saved state.
    DropBranchPoint,
}

/// Source of trajectory segments, in traversal order.
pub trait TrajectorySupplier {
    /// Next event, or `None` when the traversal is complete.
    fn next_event(&mut self) -> Result<Option<SupplierEvent>>;

    /// Total number of segments, when known, for progress reporting.
    fn total_segments(&self) -> Option<u64> {
        None
    }
}

/// Supplier over a pre-built sequence of events.
pub struct EventList<I> {
    events: I,
    total: Option<u64>,
}

impl<I: Iterator<Item = SupplierEvent>> EventList<I> {
    pub fn new(events: impl IntoIterator<IntoIter = I>) -> Self {
        EventList {
            events: events.into_iter(),
            total: None,
        }
    }

    pub fn with_total_segments(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }
}

impl<I: Iterator<Item = SupplierEvent>> TrajectorySupplier for EventList<I> {
    fn next_event(&mut self) -> Result<Option<SupplierEvent>> {
        Ok(self.events.next())
    }

    fn total_segments(&self) -> Option<u64> {
        self.total
    }
}

/// One analysis run over a range of iterations.
pub struct TransitionAnalysis<S: RecordStore> {
    run_id: String,
    settings: RunSettings,
    accumulator: TransitionEventAccumulator<S>,
    branch_points: Vec<AccumulatorState>,
    segments_visited: u64,
}

impl<S: RecordStore> TransitionAnalysis<S> {
    pub fn new(
        n_bins: usize,
        store: S,
        accumulator: AccumulatorConfig,
        settings: RunSettings,
    ) -> Self {
        TransitionAnalysis {
            run_id: generate_run_id(),
            settings,
            accumulator: TransitionEventAccumulator::new(n_bins, store, accumulator),
            branch_points: Vec::new(),
            segments_visited: 0,
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn segments_visited(&self) -> u64 {
        self.segments_visited
    }

    pub fn accumulator(&self) -> &TransitionEventAccumulator<S> {
        &self.accumulator
    }

    /// Hand back the output store.
    pub fn into_store(self) -> Result<S> {
        self.accumulator.finish()
    }

    /// Drive the supplier to completion and write the run summary.
    ///
    /// The accumulator is cleared afterwards, ready for another run; the
    /// next run replaces this run's records even if it finds none.
    pub fn run<T: TrajectorySupplier>(
        &mut self,
        supplier: &mut T,
        first_iter: u64,
        last_iter: u64,
        bin_digest: BinDigest,
    ) -> Result<AnalysisSummary> {
        let total = supplier.total_segments();
        info!(
            run_id = %self.run_id,
            n_bins = self.accumulator.n_bins(),
            first_iter,
            last_iter,
            total_segments = ?total,
            "finding transitions"
        );

        self.segments_visited = 0;
        self.branch_points.clear();
        self.accumulator.reset_output()?;

        while let Some(event) = supplier.next_event()? {
            self.handle(event, total)?;
        }

        self.accumulator.flush()?;
        let summary = AnalysisSummary::new(
            self.run_id.clone(),
            self.accumulator.n_trans().clone(),
            first_iter,
            last_iter,
            bin_digest,
            self.accumulator.records_written(),
        );
        self.accumulator.store_mut().write_summary(&summary)?;

        info!(
            run_id = %self.run_id,
            segments = self.segments_visited,
            records = summary.n_records,
            transitions = summary.n_trans.total(),
            "transition analysis complete"
        );

        self.accumulator.clear();
        self.branch_points.clear();
        Ok(summary)
    }

    fn handle(&mut self, event: SupplierEvent, total: Option<u64>) -> Result<()> {
        match event {
            SupplierEvent::Segment { kind, segment } => {
                match kind {
                    SegmentKind::NewTrajectory => self.accumulator.start_accumulation(&segment)?,
                    SegmentKind::Continuation => {
                        self.accumulator.continue_accumulation(&segment)?
                    }
                }
                self.segments_visited += 1;
                self.report_progress(total);
            }
            SupplierEvent::SaveBranchPoint => {
                self.branch_points.push(self.accumulator.get_state());
            }
            SupplierEvent::RestoreBranchPoint => {
                let saved = self.branch_points.last().ok_or(Error::NoBranchPoint)?;
                self.accumulator.set_state(saved.clone())?;
            }
            SupplierEvent::DropBranchPoint => {
                self.branch_points.pop().ok_or(Error::NoBranchPoint)?;
            }
        }
        Ok(())
    }

    fn report_progress(&self, total: Option<u64>) {
        let visited = self.segments_visited;
        let at_end = total == Some(visited);
        if visited % self.settings.progress_interval.max(1) != 0 && !at_end {
            return;
        }
        match total {
            Some(total) if total > 0 => info!(
                run_id = %self.run_id,
                visited,
                total,
                percent = %format!("{:.1}", visited as f64 / total as f64 * 100.0),
                "segments analyzed"
            ),
            _ => debug!(run_id = %self.run_id, visited, "segments analyzed"),
        }
    }
}
