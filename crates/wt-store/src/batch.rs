//! Conversion between transition records and Arrow record batches.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, Float64Array, RecordBatch, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, SchemaRef};
use wt_common::{BinWidth, TransitionRecord};

use crate::schema::*;
use crate::store::{StoreError, StoreResult};

fn narrow<T: TryFrom<u32>>(bin: u32, width: BinWidth) -> StoreResult<T> {
    T::try_from(bin).map_err(|_| StoreError::BinOverflow { bin, width })
}

fn bin_column(width: BinWidth, bins: impl Iterator<Item = u32>) -> StoreResult<ArrayRef> {
    Ok(match width {
        BinWidth::U8 => Arc::new(UInt8Array::from(
            bins.map(|b| narrow::<u8>(b, width))
                .collect::<StoreResult<Vec<_>>>()?,
        )),
        BinWidth::U16 => Arc::new(UInt16Array::from(
            bins.map(|b| narrow::<u16>(b, width))
                .collect::<StoreResult<Vec<_>>>()?,
        )),
        BinWidth::U32 => Arc::new(UInt32Array::from_iter_values(bins)),
    })
}

fn u64_column(records: &[TransitionRecord], f: impl Fn(&TransitionRecord) -> u64) -> ArrayRef {
    Arc::new(UInt64Array::from_iter_values(records.iter().map(f)))
}

fn f64_column(records: &[TransitionRecord], f: impl Fn(&TransitionRecord) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(records.iter().map(f)))
}

/// Build a record batch matching `transitions_schema(width)`.
///
/// Fails with [`StoreError::BinOverflow`] if a bin does not fit `width`.
pub fn records_to_batch(
    schema: &SchemaRef,
    width: BinWidth,
    records: &[TransitionRecord],
) -> StoreResult<RecordBatch> {
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            u64_column(records, |r| r.block_id),
            u64_column(records, |r| r.timepoint),
            bin_column(width, records.iter().map(|r| r.initial_bin))?,
            bin_column(width, records.iter().map(|r| r.final_bin))?,
            f64_column(records, |r| r.initial_weight),
            f64_column(records, |r| r.final_weight),
            f64_column(records, |r| r.initial_bin_population),
            u64_column(records, |r| r.duration),
            u64_column(records, |r| r.first_passage_time),
        ],
    )?;
    Ok(batch)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> StoreResult<&'a ArrayRef> {
    batch.column_by_name(name).ok_or_else(|| StoreError::ColumnType {
        column: name.to_string(),
        found: "missing".to_string(),
    })
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, name: &str) -> StoreResult<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| StoreError::ColumnType {
            column: name.to_string(),
            found: array.data_type().to_string(),
        })
}

/// Decode a transition-table batch back into records.
pub fn batch_to_records(batch: &RecordBatch) -> StoreResult<Vec<TransitionRecord>> {
    let block = downcast::<UInt64Array>(column(batch, COL_BLOCK)?, COL_BLOCK)?;
    let timepoint = downcast::<UInt64Array>(column(batch, COL_TIMEPOINT)?, COL_TIMEPOINT)?;
    let initial_bin = cast(column(batch, COL_INITIAL_BIN)?, &DataType::UInt32)?;
    let initial_bin = downcast::<UInt32Array>(&initial_bin, COL_INITIAL_BIN)?;
    let final_bin = cast(column(batch, COL_FINAL_BIN)?, &DataType::UInt32)?;
    let final_bin = downcast::<UInt32Array>(&final_bin, COL_FINAL_BIN)?;
    let initial_weight =
        downcast::<Float64Array>(column(batch, COL_INITIAL_WEIGHT)?, COL_INITIAL_WEIGHT)?;
    let final_weight = downcast::<Float64Array>(column(batch, COL_FINAL_WEIGHT)?, COL_FINAL_WEIGHT)?;
    let initial_pop =
        downcast::<Float64Array>(column(batch, COL_INITIAL_BIN_POP)?, COL_INITIAL_BIN_POP)?;
    let duration = downcast::<UInt64Array>(column(batch, COL_DURATION)?, COL_DURATION)?;
    let fpt = downcast::<UInt64Array>(column(batch, COL_FPT)?, COL_FPT)?;

    Ok((0..batch.num_rows())
        .map(|i| TransitionRecord {
            block_id: block.value(i),
            timepoint: timepoint.value(i),
            initial_bin: initial_bin.value(i),
            final_bin: final_bin.value(i),
            initial_weight: initial_weight.value(i),
            final_weight: final_weight.value(i),
            initial_bin_population: initial_pop.value(i),
            duration: duration.value(i),
            first_passage_time: fpt.value(i),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<TransitionRecord> {
        vec![
            TransitionRecord {
                block_id: 3,
                timepoint: 2,
                initial_bin: 0,
                final_bin: 1,
                initial_weight: 0.25,
                final_weight: 0.5,
                initial_bin_population: 0.75,
                duration: 1,
                first_passage_time: 0,
            },
            TransitionRecord {
                block_id: 3,
                timepoint: 9,
                initial_bin: 200,
                final_bin: 1,
                initial_weight: 0.125,
                final_weight: 0.5,
                initial_bin_population: 1.0,
                duration: 4,
                first_passage_time: 7,
            },
        ]
    }

    #[test]
    fn test_batch_shape_matches_schema() {
        let schema: SchemaRef = Arc::new(transitions_schema(BinWidth::U8));
        let batch = records_to_batch(&schema, BinWidth::U8, &sample_records()).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 9);
        assert_eq!(
            batch.column_by_name(COL_INITIAL_BIN).unwrap().data_type(),
            &DataType::UInt8
        );
    }

    #[test]
    fn test_decode_recovers_records() {
        let records = sample_records();
        let schema: SchemaRef = Arc::new(transitions_schema(BinWidth::U16));
        let batch = records_to_batch(&schema, BinWidth::U16, &records).unwrap();
        assert_eq!(batch_to_records(&batch).unwrap(), records);
    }

    #[test]
    fn test_bin_too_wide_for_column_is_rejected() {
        let mut records = sample_records();
        records[1].final_bin = 300;
        let schema: SchemaRef = Arc::new(transitions_schema(BinWidth::U8));
        let err = records_to_batch(&schema, BinWidth::U8, &records).unwrap_err();
        assert!(matches!(
            err,
            StoreError::BinOverflow {
                bin: 300,
                width: BinWidth::U8
            }
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_column_type() {
        let schema = Arc::new(arrow::datatypes::Schema::new(vec![
            arrow::datatypes::Field::new(COL_BLOCK, DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Float64Array::from(vec![1.0])) as ArrayRef],
        )
        .unwrap();
        let err = batch_to_records(&batch).unwrap_err();
        assert!(matches!(err, StoreError::ColumnType { .. }));
    }
}
