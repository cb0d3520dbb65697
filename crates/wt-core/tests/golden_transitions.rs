//! Hand-checked transition records for a short three-bin trajectory.
//!
//! Trajectory (timepoint: bin): 0:0 1:0 2:1 3:1 4:2 5:2 6:1 7:0

use wt_core::{AccumulatorConfig, TransitionEventAccumulator};
use wt_common::{BinIndex, Segment, TransitionRecord};
use wt_store::MemoryStore;

const ASSIGNMENTS: [BinIndex; 8] = [0, 0, 1, 1, 2, 2, 1, 0];
const WEIGHTS: [f64; 8] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];

fn one_hot(assignments: &[BinIndex]) -> Vec<Vec<f64>> {
    assignments
        .iter()
        .map(|&b| {
            let mut row = vec![0.0; 3];
            row[b as usize] = 1.0;
            row
        })
        .collect()
}

fn run(segments: &[Segment], calc_fpts: bool) -> (Vec<TransitionRecord>, Vec<Vec<u64>>) {
    let config = AccumulatorConfig::default()
        .with_buffer_capacity(64)
        .with_calc_fpts(calc_fpts);
    let mut acc = TransitionEventAccumulator::new(3, MemoryStore::new(), config);
    acc.start_accumulation(&segments[0]).unwrap();
    for segment in &segments[1..] {
        acc.continue_accumulation(segment).unwrap();
    }
    let counts = acc.n_trans().to_rows();
    (acc.finish().unwrap().into_records(), counts)
}

fn whole(weights: &[f64]) -> Segment {
    Segment::new(7, ASSIGNMENTS.to_vec(), weights.to_vec(), one_hot(&ASSIGNMENTS))
}

/// (timepoint, initial, final, duration, fpt)
type Row = (u64, BinIndex, BinIndex, u64, u64);

fn rows(records: &[TransitionRecord]) -> Vec<Row> {
    records
        .iter()
        .map(|r| {
            (
                r.timepoint,
                r.initial_bin,
                r.final_bin,
                r.duration,
                r.first_passage_time,
            )
        })
        .collect()
}

#[test]
fn test_golden_records_with_fpts() {
    let (records, counts) = run(&[whole(&[1.0; 8])], true);

    assert_eq!(
        rows(&records),
        vec![
            (2, 0, 1, 1, 0),
            (4, 0, 2, 3, 0),
            (4, 1, 2, 1, 0),
            (6, 0, 1, 5, 4),
            (6, 2, 1, 1, 0),
            (7, 1, 0, 1, 0),
            (7, 2, 0, 2, 0),
        ]
    );
    assert!(records.iter().all(|r| r.block_id == 7));
    assert!(records.iter().all(|r| r.initial_bin_population == 1.0));
    assert_eq!(counts, vec![vec![0, 2, 1], vec![1, 0, 1], vec![1, 1, 0]]);
}

#[test]
fn test_golden_records_without_fpts() {
    let (with, _) = run(&[whole(&[1.0; 8])], true);
    let (without, counts) = run(&[whole(&[1.0; 8])], false);

    assert_eq!(without.len(), with.len());
    assert!(without.iter().all(|r| r.first_passage_time == 0));
    for (a, b) in with.iter().zip(&without) {
        assert_eq!(a.bins(), b.bins());
        assert_eq!(a.duration, b.duration);
    }
    assert_eq!(counts[0][1], 2);
}

#[test]
fn test_golden_weights() {
    let (records, _) = run(&[whole(&WEIGHTS)], true);

    let weights: Vec<(f64, f64)> = records
        .iter()
        .map(|r| (r.initial_weight, r.final_weight))
        .collect();
    assert_eq!(
        weights,
        vec![
            (0.3, 0.3),
            (0.3, 0.5),
            (0.5, 0.5),
            (0.3, 0.7),
            (0.7, 0.7),
            (0.8, 0.8),
            (0.7, 0.8),
        ]
    );
}

#[test]
fn test_golden_split_matches_whole() {
    let pops = one_hot(&ASSIGNMENTS);
    let head = Segment::new(7, ASSIGNMENTS[..4].to_vec(), WEIGHTS[..4].to_vec(), pops[..4].to_vec());
    let tail = Segment::new(7, ASSIGNMENTS[4..].to_vec(), WEIGHTS[4..].to_vec(), pops[4..].to_vec());

    let (split, split_counts) = run(&[head, tail], true);
    let (joined, joined_counts) = run(&[whole(&WEIGHTS)], true);

    assert_eq!(split, joined);
    assert_eq!(split_counts, joined_counts);
}

#[test]
fn test_golden_split_at_every_boundary() {
    let pops = one_hot(&ASSIGNMENTS);
    let (joined, _) = run(&[whole(&WEIGHTS)], true);

    for cut in 1..ASSIGNMENTS.len() {
        let head = Segment::new(7, ASSIGNMENTS[..cut].to_vec(), WEIGHTS[..cut].to_vec(), pops[..cut].to_vec());
        let tail = Segment::new(7, ASSIGNMENTS[cut..].to_vec(), WEIGHTS[cut..].to_vec(), pops[cut..].to_vec());
        let (split, _) = run(&[head, tail], true);
        assert_eq!(split, joined, "cut at {}", cut);
    }
}

#[test]
fn test_single_sample_start_emits_nothing() {
    let segment = Segment::new(1, vec![2], vec![1.0], vec![vec![0.0, 0.0, 1.0]]);
    let (records, counts) = run(&[segment], true);
    assert!(records.is_empty());
    assert!(counts.iter().flatten().all(|&c| c == 0));
}
