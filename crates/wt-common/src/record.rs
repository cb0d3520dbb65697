//! Transition records.

use serde::{Deserialize, Serialize};

use crate::bin::BinIndex;

/// One completed `initial_bin -> final_bin` transition.
///
/// Immutable once emitted. `first_passage_time` is 0 when the pair had no
/// earlier completion, and always 0 when first-passage times are disabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub block_id: u64,
    /// Timepoint of the crossing that completed the transition.
    pub timepoint: u64,
    pub initial_bin: BinIndex,
    pub final_bin: BinIndex,
    /// Weight captured when the trajectory last left `initial_bin`.
    pub initial_weight: f64,
    /// Arrival weight at `timepoint`.
    pub final_weight: f64,
    /// Population of `initial_bin` just before the last departure from it.
    pub initial_bin_population: f64,
    pub duration: u64,
    pub first_passage_time: u64,
}

impl TransitionRecord {
    /// `(initial_bin, final_bin)` as a pair.
    pub fn bins(&self) -> (BinIndex, BinIndex) {
        (self.initial_bin, self.final_bin)
    }
}
