//! Arrow schema for the transition table.
//!
//! One row per completed transition, fixed width:
//! `block, timepoint, initial_bin, final_bin, initial_weight, final_weight,
//! initial_bin_pop, duration, fpt`. Bin columns use the narrowest unsigned
//! type able to hold `n_bins`.

use arrow::datatypes::{DataType, Field, Schema};
use wt_common::BinWidth;

/// Table name used for file layout.
pub const TRANSITIONS_TABLE: &str = "transitions";

pub const COL_BLOCK: &str = "block";
pub const COL_TIMEPOINT: &str = "timepoint";
pub const COL_INITIAL_BIN: &str = "initial_bin";
pub const COL_FINAL_BIN: &str = "final_bin";
pub const COL_INITIAL_WEIGHT: &str = "initial_weight";
pub const COL_FINAL_WEIGHT: &str = "final_weight";
pub const COL_INITIAL_BIN_POP: &str = "initial_bin_pop";
pub const COL_DURATION: &str = "duration";
pub const COL_FPT: &str = "fpt";

/// Arrow type for bin columns of the given width.
pub fn bin_data_type(width: BinWidth) -> DataType {
    match width {
        BinWidth::U8 => DataType::UInt8,
        BinWidth::U16 => DataType::UInt16,
        BinWidth::U32 => DataType::UInt32,
    }
}

/// Schema for the `transitions` table.
pub fn transitions_schema(width: BinWidth) -> Schema {
    let bin_type = bin_data_type(width);
    Schema::new(vec![
        Field::new(COL_BLOCK, DataType::UInt64, false),
        Field::new(COL_TIMEPOINT, DataType::UInt64, false),
        Field::new(COL_INITIAL_BIN, bin_type.clone(), false),
        Field::new(COL_FINAL_BIN, bin_type, false),
        Field::new(COL_INITIAL_WEIGHT, DataType::Float64, false),
        Field::new(COL_FINAL_WEIGHT, DataType::Float64, false),
        Field::new(COL_INITIAL_BIN_POP, DataType::Float64, false),
        Field::new(COL_DURATION, DataType::UInt64, false),
        Field::new(COL_FPT, DataType::UInt64, false),
    ])
}
