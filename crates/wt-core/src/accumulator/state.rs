//! Per-trajectory accumulator state and its snapshots.

use serde::{Deserialize, Serialize};
use wt_common::BinIndex;

/// Where the previous segment of a trajectory ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub timepoint: u64,
    pub bin: BinIndex,
    /// Total weight in `bin` at `timepoint`.
    pub bin_population: f64,
}

/// Crossing bookkeeping for one in-flight trajectory.
///
/// Timepoint value 0 means "never". All timepoints are non-decreasing over
/// the lifetime of a trajectory. A snapshot is a plain value: cloning it
/// shares nothing with the live accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorState {
    n_bins: usize,
    /// Most recent departure from each bin.
    pub(crate) last_exit: Vec<u64>,
    /// Most recent arrival into each bin.
    pub(crate) last_entry: Vec<u64>,
    /// `[i * n_bins + j]`: when an `i -> j` transition was last recorded.
    pub(crate) last_completion: Vec<u64>,
    /// Arrival weight captured at the last departure from each bin.
    pub(crate) weight_last_exit: Vec<f64>,
    /// Origin-bin population captured at the last departure from each bin.
    pub(crate) bin_pop_last_exit: Vec<f64>,
    pub(crate) cursor: Option<Cursor>,
}

impl AccumulatorState {
    pub fn new(n_bins: usize) -> Self {
        AccumulatorState {
            n_bins,
            last_exit: vec![0; n_bins],
            last_entry: vec![0; n_bins],
            last_completion: vec![0; n_bins * n_bins],
            weight_last_exit: vec![0.0; n_bins],
            bin_pop_last_exit: vec![0.0; n_bins],
            cursor: None,
        }
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Resume point for a continuation, if a segment has been processed.
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn last_exit(&self, bin: BinIndex) -> u64 {
        self.last_exit[bin as usize]
    }

    pub fn last_entry(&self, bin: BinIndex) -> u64 {
        self.last_entry[bin as usize]
    }

    pub fn last_completion(&self, initial: BinIndex, fin: BinIndex) -> u64 {
        self.last_completion[initial as usize * self.n_bins + fin as usize]
    }

    /// First inconsistency between the arrays, the cursor and `n_bins`.
    ///
    /// Snapshots built in-process are always consistent; deserialized ones
    /// need not be.
    pub(crate) fn shape_error(&self) -> Option<String> {
        let n = self.n_bins;
        let cells = n.checked_mul(n).unwrap_or(usize::MAX);
        let lengths = [
            ("last_exit", self.last_exit.len(), n),
            ("last_entry", self.last_entry.len(), n),
            ("last_completion", self.last_completion.len(), cells),
            ("weight_last_exit", self.weight_last_exit.len(), n),
            ("bin_pop_last_exit", self.bin_pop_last_exit.len(), n),
        ];
        for (field, actual, expected) in lengths {
            if actual != expected {
                return Some(format!(
                    "{} has {} entries, expected {}",
                    field, actual, expected
                ));
            }
        }
        match self.cursor {
            Some(cursor) if cursor.bin as usize >= n => Some(format!(
                "cursor bin {} out of range for {} bins",
                cursor.bin, n
            )),
            _ => None,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.last_exit.iter_mut().for_each(|v| *v = 0);
        self.last_entry.iter_mut().for_each(|v| *v = 0);
        self.last_completion.iter_mut().for_each(|v| *v = 0);
        self.weight_last_exit.iter_mut().for_each(|v| *v = 0.0);
        self.bin_pop_last_exit.iter_mut().for_each(|v| *v = 0.0);
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_blank() {
        let state = AccumulatorState::new(3);
        assert_eq!(state.n_bins(), 3);
        assert_eq!(state.last_completion.len(), 9);
        assert!(state.cursor().is_none());
        assert_eq!(state.last_exit(2), 0);
    }

    #[test]
    fn test_clone_does_not_alias() {
        let mut live = AccumulatorState::new(2);
        live.last_exit[0] = 5;
        let snapshot = live.clone();
        live.last_exit[0] = 9;
        live.last_completion[1] = 9;
        assert_eq!(snapshot.last_exit(0), 5);
        assert_eq!(snapshot.last_completion(0, 1), 0);
    }

    #[test]
    fn test_fresh_and_cloned_states_are_consistent() {
        let mut state = AccumulatorState::new(4);
        state.cursor = Some(Cursor {
            timepoint: 3,
            bin: 3,
            bin_population: 1.0,
        });
        assert_eq!(state.shape_error(), None);
        assert_eq!(state.clone().shape_error(), None);
    }

    #[test]
    fn test_shape_error_names_field() {
        let mut state = AccumulatorState::new(3);
        state.last_completion.pop();
        let reason = state.shape_error().unwrap();
        assert!(reason.starts_with("last_completion has 8"), "{}", reason);

        let mut state = AccumulatorState::new(3);
        state.cursor = Some(Cursor {
            timepoint: 1,
            bin: 3,
            bin_population: 0.0,
        });
        assert!(state.shape_error().unwrap().contains("cursor bin 3"));
    }

    #[test]
    fn test_reset_keeps_size() {
        let mut state = AccumulatorState::new(2);
        state.last_entry[1] = 4;
        state.cursor = Some(Cursor {
            timepoint: 4,
            bin: 1,
            bin_population: 0.5,
        });
        state.reset();
        assert_eq!(state, AccumulatorState::new(2));
    }
}
