//! Per-run aggregate outputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bin::BinDigest;
use crate::matrix::CountMatrix;

/// Aggregate outputs written once at the end of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub schema_version: String,
    pub run_id: String,
    pub n_bins: usize,
    pub n_trans: CountMatrix,
    pub first_iter: u64,
    pub last_iter: u64,
    pub bin_digest: BinDigest,
    /// Number of transition records written to the store.
    pub n_records: u64,
    pub created_at: DateTime<Utc>,
}

impl AnalysisSummary {
    pub fn new(
        run_id: impl Into<String>,
        n_trans: CountMatrix,
        first_iter: u64,
        last_iter: u64,
        bin_digest: BinDigest,
        n_records: u64,
    ) -> Self {
        AnalysisSummary {
            schema_version: crate::SCHEMA_VERSION.to_string(),
            run_id: run_id.into(),
            n_bins: n_trans.n_bins(),
            n_trans,
            first_iter,
            last_iter,
            bin_digest,
            n_records,
            created_at: Utc::now(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
