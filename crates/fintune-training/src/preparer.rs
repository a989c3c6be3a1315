//! Dataset preparation: load both sources, keep what validates.

use crate::dataset::{is_valid_record, RawRecord};
use crate::error::TrainingResult;
use crate::loader::{load_jsonl, LoadOutcome};
use std::path::PathBuf;
use tracing::{info, warn};

/// Cleaned training and validation sets, in source line order.
#[derive(Debug, Clone, Default)]
pub struct PreparedDataset {
    pub train: Vec<RawRecord>,
    pub validation: Vec<RawRecord>,
}

impl PreparedDataset {
    /// True when neither split has any usable record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.validation.is_empty()
    }
}

/// Composes the loader and the record validator over a pair of named JSONL
/// sources. Validation is pure; repeated calls against unchanged sources
/// yield identical output.
#[derive(Debug, Clone)]
pub struct DatasetPreparer {
    data_dir: PathBuf,
    train_file: String,
    val_file: String,
}

impl DatasetPreparer {
    /// Creates a preparer over `data_dir/train_file` and `data_dir/val_file`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, train_file: String, val_file: String) -> Self {
        Self { data_dir: data_dir.into(), train_file, val_file }
    }

    /// Loads and validates both splits.
    ///
    /// Empty output is a valid outcome, not an error; callers that need data
    /// must check for emptiness themselves and report it as a business
    /// failure. A missing source collapses to an empty split here (the loader
    /// keeps the distinction for callers that want it).
    ///
    /// # Errors
    /// Returns an error only for I/O failures other than a missing file.
    pub fn prepare(&self) -> TrainingResult<PreparedDataset> {
        let train = self.prepare_split(&self.train_file)?;
        let validation = self.prepare_split(&self.val_file)?;
        Ok(PreparedDataset { train, validation })
    }

    fn prepare_split(&self, file_name: &str) -> TrainingResult<Vec<RawRecord>> {
        let path = self.data_dir.join(file_name);
        let records = match load_jsonl(&path)? {
            LoadOutcome::Found(source) => source.records,
            LoadOutcome::NotFound => {
                warn!(split = %file_name, "No dataset source configured; split is empty");
                return Ok(Vec::new());
            }
        };

        let total = records.len();
        let valid: Vec<RawRecord> = records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                if is_valid_record(&record) {
                    Some(record)
                } else {
                    warn!(split = %file_name, index = idx, "Rejecting schema-invalid record");
                    None
                }
            })
            .collect();

        info!(
            split = %file_name,
            valid = valid.len(),
            invalid = total - valid.len(),
            "Validated dataset split"
        );

        Ok(valid)
    }
}
