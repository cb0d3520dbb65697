//! Crossing and completion detection.

use wt_common::{BinIndex, CountMatrix, TransitionRecord};

use super::state::AccumulatorState;

/// One bin-to-bin change between consecutive samples.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crossing {
    pub block_id: u64,
    /// Timepoint of the arrival sample.
    pub timepoint: u64,
    pub initial_bin: BinIndex,
    pub final_bin: BinIndex,
    /// Weight carried at the arrival sample.
    pub arrival_weight: f64,
    /// Population of `initial_bin` at the departure sample.
    pub initial_bin_population: f64,
}

/// Apply one crossing to `state` and emit every transition it completes.
///
/// A pending `i -> final_bin` transition completes when the trajectory has
/// left `i` at some point and entered `final_bin` more recently than the
/// last recorded `i -> final_bin` completion. Completions are emitted in
/// increasing `i`, and `i == final_bin` is never a candidate.
pub(crate) fn apply_crossing(
    state: &mut AccumulatorState,
    n_trans: &mut CountMatrix,
    calc_fpts: bool,
    crossing: &Crossing,
    out: &mut Vec<TransitionRecord>,
) {
    let n_bins = state.n_bins();
    let t = crossing.timepoint;
    let ibin = crossing.initial_bin as usize;
    let fbin = crossing.final_bin as usize;

    state.bin_pop_last_exit[ibin] = crossing.initial_bin_population;
    state.last_exit[ibin] = t;
    state.last_entry[fbin] = t;
    state.weight_last_exit[ibin] = crossing.arrival_weight;

    let entry = state.last_entry[fbin];
    for i in 0..n_bins {
        if i == fbin || state.last_exit[i] == 0 {
            continue;
        }
        let slot = i * n_bins + fbin;
        let last_completion = state.last_completion[slot];
        if entry <= last_completion {
            continue;
        }

        let first_passage_time = if calc_fpts && last_completion > 0 {
            t - last_completion
        } else {
            0
        };

        out.push(TransitionRecord {
            block_id: crossing.block_id,
            timepoint: t,
            initial_bin: i as BinIndex,
            final_bin: crossing.final_bin,
            initial_weight: state.weight_last_exit[i],
            final_weight: crossing.arrival_weight,
            initial_bin_population: state.bin_pop_last_exit[i],
            duration: t - state.last_exit[i] + 1,
            first_passage_time,
        });

        state.last_completion[slot] = t;
        n_trans.increment(i as BinIndex, crossing.final_bin);
    }
}
