//! Parquet-backed transition record store.
//!
//! Rows are appended to a temp file and only renamed into place by
//! [`ParquetStore::close`], so a crashed run never leaves a truncated table
//! under the final name.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::datatypes::SchemaRef;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Encoding, ZstdLevel};
use parquet::file::properties::{WriterProperties, WriterVersion};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wt_common::{AnalysisSummary, BinWidth, TransitionRecord};

use crate::batch::records_to_batch;
use crate::schema::{transitions_schema, TRANSITIONS_TABLE};
use crate::store::{RecordStore, StoreError, StoreResult};

/// Compression codec for the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Zstd,
    Snappy,
    None,
}

impl Compression {
    fn to_parquet(self) -> StoreResult<parquet::basic::Compression> {
        Ok(match self {
            Compression::Zstd => parquet::basic::Compression::ZSTD(ZstdLevel::try_new(3)?),
            Compression::Snappy => parquet::basic::Compression::SNAPPY,
            Compression::None => parquet::basic::Compression::UNCOMPRESSED,
        })
    }
}

impl std::str::FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zstd" => Ok(Compression::Zstd),
            "snappy" | "snap" => Ok(Compression::Snappy),
            "none" | "uncompressed" => Ok(Compression::None),
            _ => Err(format!("unknown compression: {}", s)),
        }
    }
}

/// Configuration for a Parquet store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory under which the run directory is created.
    pub base_dir: PathBuf,

    /// Run identifier used for the run directory name.
    pub run_id: String,

    pub compression: Compression,

    /// Maximum rows per Parquet row group.
    pub row_group_size: usize,
}

impl StoreConfig {
    /// Create config with defaults.
    pub fn new(base_dir: PathBuf, run_id: impl Into<String>) -> Self {
        StoreConfig {
            base_dir,
            run_id: run_id.into(),
            compression: Compression::Zstd,
            row_group_size: crate::DEFAULT_ROW_GROUP_SIZE,
        }
    }

    /// Use snappy compression instead of zstd.
    pub fn with_snappy(mut self) -> Self {
        self.compression = Compression::Snappy;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set custom row group size.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Directory holding this run's outputs.
    pub fn run_dir(&self) -> PathBuf {
        self.base_dir.join(format!("run={}", self.run_id))
    }
}

/// Final locations of a run's outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub transitions: PathBuf,
    pub summary: PathBuf,
}

/// Append-only [`RecordStore`] writing the transition table as Parquet.
pub struct ParquetStore {
    config: StoreConfig,
    schema: SchemaRef,
    width: BinWidth,
    paths: StorePaths,
    temp_path: PathBuf,
    writer: Option<ArrowWriter<File>>,
    written: u64,
    len: u64,
    closed: bool,
}

impl ParquetStore {
    /// Create the run directory and an empty store for `n_bins` bins.
    pub fn create(config: StoreConfig, n_bins: usize) -> StoreResult<Self> {
        let run_dir = config.run_dir();
        fs::create_dir_all(&run_dir)?;

        let width = BinWidth::for_n_bins(n_bins);
        let transitions = run_dir.join(format!("{}.parquet", TRANSITIONS_TABLE));
        let temp_path = transitions.with_extension("parquet.tmp");
        let paths = StorePaths {
            transitions,
            summary: run_dir.join("summary.json"),
        };

        Ok(ParquetStore {
            config,
            schema: Arc::new(transitions_schema(width)),
            width,
            paths,
            temp_path,
            writer: None,
            written: 0,
            len: 0,
            closed: false,
        })
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    pub fn bin_width(&self) -> BinWidth {
        self.width
    }

    /// Records actually written so far.
    pub fn rows_written(&self) -> u64 {
        self.written
    }

    /// Finalise the Parquet footer and move the table to its final path.
    ///
    /// A store that received no rows still produces a valid, empty table.
    pub fn close(mut self) -> StoreResult<StorePaths> {
        self.ensure_open()?;
        if self.writer.is_none() {
            self.init_writer()?;
        }
        if let Some(writer) = self.writer.take() {
            writer.close()?;
        }
        atomic_rename(&self.temp_path, &self.paths.transitions)?;
        self.closed = true;
        debug!(
            path = %self.paths.transitions.display(),
            rows = self.written,
            "transition table finalised"
        );
        Ok(self.paths.clone())
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    fn init_writer(&mut self) -> StoreResult<()> {
        let file = File::create(&self.temp_path)?;

        let props = WriterProperties::builder()
            .set_writer_version(WriterVersion::PARQUET_2_0)
            .set_compression(self.config.compression.to_parquet()?)
            .set_max_row_group_size(self.config.row_group_size)
            // Numeric columns only; dictionaries buy nothing here
            .set_dictionary_enabled(false)
            .set_encoding(Encoding::PLAIN)
            .build();

        self.writer = Some(ArrowWriter::try_new(
            file,
            self.schema.clone(),
            Some(props),
        )?);
        Ok(())
    }

    fn discard(&mut self) -> StoreResult<()> {
        // Dropping an unclosed writer leaves a footerless temp file; remove it.
        self.writer = None;
        if self.temp_path.exists() {
            fs::remove_file(&self.temp_path)?;
        }
        self.written = 0;
        self.len = 0;
        Ok(())
    }
}

impl RecordStore for ParquetStore {
    fn len(&self) -> u64 {
        self.len
    }

    fn resize(&mut self, new_len: u64) -> StoreResult<()> {
        self.ensure_open()?;
        if new_len == 0 {
            return self.discard();
        }
        if new_len < self.written {
            return Err(StoreError::Shrink {
                written: self.written,
                requested: new_len,
            });
        }
        self.len = new_len;
        Ok(())
    }

    fn write_range(&mut self, offset: u64, records: &[TransitionRecord]) -> StoreResult<()> {
        self.ensure_open()?;
        if offset != self.written {
            return Err(StoreError::NonContiguous {
                offset,
                written: self.written,
            });
        }
        let end = offset + records.len() as u64;
        if end > self.len {
            return Err(StoreError::OutOfBounds {
                offset,
                end,
                len: self.len,
            });
        }
        if records.is_empty() {
            return Ok(());
        }

        if self.writer.is_none() {
            self.init_writer()?;
        }
        let batch = records_to_batch(&self.schema, self.width, records)?;
        let writer = self.writer.as_mut().ok_or(StoreError::Closed)?;
        writer.write(&batch)?;
        self.written = end;
        Ok(())
    }

    fn write_summary(&mut self, summary: &AnalysisSummary) -> StoreResult<()> {
        let json = summary.to_json_pretty()?;
        let temp = self.paths.summary.with_extension("json.tmp");
        fs::write(&temp, json)?;
        atomic_rename(&temp, &self.paths.summary)?;
        Ok(())
    }
}

/// Helper to rename temp file to final path atomically.
pub fn atomic_rename(temp_path: &Path, final_path: &Path) -> StoreResult<()> {
    fs::rename(temp_path, final_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::new(PathBuf::from("/tmp/test"), "run-1");
        assert_eq!(config.row_group_size, crate::DEFAULT_ROW_GROUP_SIZE);
        assert_eq!(config.compression, Compression::Zstd);
        assert_eq!(config.run_dir(), PathBuf::from("/tmp/test/run=run-1"));
    }

    #[test]
    fn test_store_config_snappy() {
        let config = StoreConfig::new(PathBuf::from("/tmp/test"), "run-1").with_snappy();
        assert_eq!(config.compression, Compression::Snappy);
    }

    #[test]
    fn test_compression_parse() {
        assert_eq!("zstd".parse::<Compression>().unwrap(), Compression::Zstd);
        assert_eq!("snap".parse::<Compression>().unwrap(), Compression::Snappy);
        assert_eq!("none".parse::<Compression>().unwrap(), Compression::None);
        assert!("gzip".parse::<Compression>().is_err());
    }

    #[test]
    fn test_create_lays_out_run_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::new(temp_dir.path().to_path_buf(), "run-abc");
        let store = ParquetStore::create(config, 300).unwrap();

        assert_eq!(store.bin_width(), BinWidth::U16);
        assert!(temp_dir.path().join("run=run-abc").is_dir());
        assert!(store
            .paths()
            .transitions
            .to_string_lossy()
            .ends_with("run=run-abc/transitions.parquet"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_write_requires_resize() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::new(temp_dir.path().to_path_buf(), "run-abc");
        let mut store = ParquetStore::create(config, 3).unwrap();
        let rec = TransitionRecord {
            block_id: 1,
            timepoint: 1,
            initial_bin: 0,
            final_bin: 1,
            initial_weight: 1.0,
            final_weight: 1.0,
            initial_bin_population: 1.0,
            duration: 1,
            first_passage_time: 0,
        };

        let err = store.write_range(0, &[rec]).unwrap_err();
        assert!(matches!(err, StoreError::OutOfBounds { .. }));

        store.resize(1).unwrap();
        store.write_range(0, &[rec]).unwrap();
        assert_eq!(store.rows_written(), 1);

        let err = store.write_range(0, &[rec]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NonContiguous {
                offset: 0,
                written: 1
            }
        ));
    }
}
