//! Trajectory segments as delivered by a trajectory supplier.

use serde::{Deserialize, Serialize};

use crate::bin::BinIndex;
use crate::error::{ValidationError, ValidationResult};

/// One contiguous chunk of a trajectory's time series.
///
/// All three per-timepoint arrays run in time order and must have the same
/// length. `bin_populations[t][i]` is the total weight resident in bin `i`
/// at timepoint `t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Provenance tag attached to every record produced from this segment.
    pub block_id: u64,
    pub assignments: Vec<BinIndex>,
    pub weights: Vec<f64>,
    pub bin_populations: Vec<Vec<f64>>,
}

impl Segment {
    pub fn new(
        block_id: u64,
        assignments: Vec<BinIndex>,
        weights: Vec<f64>,
        bin_populations: Vec<Vec<f64>>,
    ) -> Self {
        Segment {
            block_id,
            assignments,
            weights,
            bin_populations,
        }
    }

    /// Build a segment whose statistical weight is constant over its timepoints.
    pub fn with_uniform_weight(
        block_id: u64,
        assignments: Vec<BinIndex>,
        weight: f64,
        bin_populations: Vec<Vec<f64>>,
    ) -> Self {
        let weights = vec![weight; assignments.len()];
        Segment::new(block_id, assignments, weights, bin_populations)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Check array lengths, population row widths, and bin ranges.
    pub fn validate(&self, n_bins: usize) -> ValidationResult<()> {
        let n = self.assignments.len();
        if self.weights.len() != n || self.bin_populations.len() != n {
            return Err(ValidationError::LengthMismatch {
                assignments: n,
                weights: self.weights.len(),
                populations: self.bin_populations.len(),
            });
        }

        for (index, &bin) in self.assignments.iter().enumerate() {
            if bin as usize >= n_bins {
                return Err(ValidationError::BinOutOfRange { index, bin, n_bins });
            }
        }

        for (index, row) in self.bin_populations.iter().enumerate() {
            if row.len() != n_bins {
                return Err(ValidationError::PopulationWidth {
                    index,
                    expected: n_bins,
                    actual: row.len(),
                });
            }
        }

        Ok(())
    }
}
