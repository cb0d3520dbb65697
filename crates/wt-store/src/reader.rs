//! Reading a finalised transition table back into records.

use std::fs::File;
use std::path::Path;

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use wt_common::TransitionRecord;

use crate::batch::batch_to_records;
use crate::store::StoreResult;

/// Read every record of a transition table, in stored order.
pub fn read_transitions(path: &Path) -> StoreResult<Vec<TransitionRecord>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        records.extend(batch_to_records(&batch?)?);
    }
    Ok(records)
}
