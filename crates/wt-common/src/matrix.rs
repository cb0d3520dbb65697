//! Cumulative transition count matrix.

use serde::{Deserialize, Serialize};

use crate::bin::BinIndex;
use crate::error::{ValidationError, ValidationResult};

/// `n_trans[i][j]`: number of completed `i -> j` transitions.
///
/// Counts only ever go up; the only way back to zero is [`CountMatrix::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMatrix {
    n_bins: usize,
    counts: Vec<u64>,
}

impl CountMatrix {
    /// Create an all-zero `n_bins x n_bins` matrix.
    pub fn new(n_bins: usize) -> Self {
        CountMatrix {
            n_bins,
            counts: vec![0; n_bins * n_bins],
        }
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    pub fn get(&self, initial: BinIndex, fin: BinIndex) -> u64 {
        self.counts[initial as usize * self.n_bins + fin as usize]
    }

    pub fn increment(&mut self, initial: BinIndex, fin: BinIndex) {
        self.counts[initial as usize * self.n_bins + fin as usize] += 1;
    }

    /// Row `initial` as a slice over final bins.
    pub fn row(&self, initial: BinIndex) -> &[u64] {
        let start = initial as usize * self.n_bins;
        &self.counts[start..start + self.n_bins]
    }

    /// Sum over all bin pairs.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Element-wise sum of another worker's counts into this matrix.
    pub fn merge(&mut self, other: &CountMatrix) -> ValidationResult<()> {
        if other.n_bins != self.n_bins {
            return Err(ValidationError::MatrixSize {
                left: self.n_bins,
                right: other.n_bins,
            });
        }
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
        Ok(())
    }

    /// Iterate `(initial, final, count)` over non-zero entries in row-major order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (BinIndex, BinIndex, u64)> + '_ {
        let n = self.n_bins;
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(move |(k, &c)| ((k / n) as BinIndex, (k % n) as BinIndex, c))
    }

    /// Dense nested representation, row-major.
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        if self.n_bins == 0 {
            return Vec::new();
        }
        self.counts.chunks(self.n_bins).map(|r| r.to_vec()).collect()
    }

    pub fn reset(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
    }
}
