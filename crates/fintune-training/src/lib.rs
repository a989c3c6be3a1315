//! Fintune Training
//!
//! Dataset ingestion and fine-tune planning primitives:
//! - Loading line-delimited JSON sources (`loader`)
//! - Validating conversational records (`dataset`)
//! - Preparing cleaned train/validation splits (`preparer`)
//! - Describing a fine-tune run as a manifest (`config`, `manifest`)
//!
//! No weights are ever produced; the manifest describes what would be
//! trained.

pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod preparer;
pub mod progress;

pub use config::FineTuneConfig;
pub use dataset::{
    first_user_message, is_valid_record, record_from_messages, RawRecord, RecordMessage,
    ACCOUNT_INFO_KEY, ALLOWED_ROLES, MESSAGES_KEY,
};
pub use error::{TrainingError, TrainingResult};
pub use loader::{load_jsonl, LoadOutcome, LoadedSource};
pub use manifest::{FineTuneManifest, FineTuneManifestBuilder, ManifestStatus};
pub use preparer::{DatasetPreparer, PreparedDataset};
pub use progress::{ProgressEvent, ProgressSink, TracingProgressSink};
