//! Fine-tune manifest construction.
//!
//! No gradient-based training happens anywhere in this service. A run is
//! described, not executed: the builder validates its inputs, walks the
//! epoch × batch plan for observability, and returns a manifest stating what
//! would be trained.

use crate::config::FineTuneConfig;
use crate::dataset::RawRecord;
use crate::error::{TrainingError, TrainingResult};
use crate::progress::{ProgressEvent, ProgressSink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal status of a described run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestStatus {
    Completed,
}

/// Descriptive summary of a would-be fine-tuning run. A value object; never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineTuneManifest {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub base_model_id: String,
    pub target_model_id: String,
    pub status: ManifestStatus,
    pub epoch_count: u32,
    pub batch_count: u32,
    pub example_count: usize,
    pub learning_rate: f64,
}

/// Builds a [`FineTuneManifest`] from validated training records and
/// configured hyperparameters.
#[derive(Debug, Clone)]
pub struct FineTuneManifestBuilder {
    config: FineTuneConfig,
    base_model_id: String,
    target_model_id: String,
}

impl FineTuneManifestBuilder {
    /// Creates a builder for the given base and target model identities.
    #[must_use]
    pub fn new(config: FineTuneConfig, base_model_id: String, target_model_id: String) -> Self {
        Self { config, base_model_id, target_model_id }
    }

    /// Builds the manifest.
    ///
    /// Validates the config first (fail fast, not partway through the batch
    /// loop), then emits one progress event per epoch and per epoch × batch
    /// combination. The loop has no numerical effect on the manifest.
    ///
    /// # Errors
    /// `TrainingError::Config` for unusable hyperparameters;
    /// `TrainingError::EmptyDataset` when there are no training records.
    pub fn build(
        &self,
        train_records: &[RawRecord],
        progress: &dyn ProgressSink,
    ) -> TrainingResult<FineTuneManifest> {
        self.config.validate()?;
        if train_records.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }

        let example_count = train_records.len();
        let batch_count = example_count.div_ceil(self.config.batch_size as usize) as u32;
        let run_id = Uuid::new_v4().to_string();

        progress.on_event(ProgressEvent::Started { run_id: run_id.clone(), example_count });

        for epoch in 1..=self.config.epochs {
            progress.on_event(ProgressEvent::Epoch {
                run_id: run_id.clone(),
                epoch,
                total_epochs: self.config.epochs,
            });
            for batch in 1..=batch_count {
                progress.on_event(ProgressEvent::Batch {
                    run_id: run_id.clone(),
                    epoch,
                    batch,
                    total_batches: batch_count,
                });
            }
        }

        progress.on_event(ProgressEvent::Finished { run_id: run_id.clone() });

        Ok(FineTuneManifest {
            run_id,
            created_at: Utc::now(),
            base_model_id: self.base_model_id.clone(),
            target_model_id: self.target_model_id.clone(),
            status: ManifestStatus::Completed,
            epoch_count: self.config.epochs,
            batch_count,
            example_count,
            learning_rate: self.config.learning_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{record_from_messages, RecordMessage};
    use crate::progress::test_support::RecordingSink;

    fn records(n: usize) -> Vec<RawRecord> {
        (0..n)
            .map(|i| {
                record_from_messages(&[
                    RecordMessage { role: "user".to_string(), content: format!("q{i}") },
                    RecordMessage { role: "assistant".to_string(), content: format!("a{i}") },
                ])
            })
            .collect()
    }

    fn builder(config: FineTuneConfig) -> FineTuneManifestBuilder {
        FineTuneManifestBuilder::new(
            config,
            "gpt-3.5-turbo".to_string(),
            "finance-assistant".to_string(),
        )
    }

    #[test]
    fn test_batch_count_rounds_up() {
        let config = FineTuneConfig { epochs: 3, batch_size: 4, learning_rate: 2e-5 };
        let sink = RecordingSink::default();
        let manifest = builder(config).build(&records(10), &sink).unwrap();

        assert_eq!(manifest.batch_count, 3);
        assert_eq!(manifest.example_count, 10);
        assert_eq!(manifest.epoch_count, 3);
        assert_eq!(manifest.status, ManifestStatus::Completed);
        assert_eq!(manifest.base_model_id, "gpt-3.5-turbo");
        assert_eq!(manifest.target_model_id, "finance-assistant");
    }

    #[test]
    fn test_progress_events_cover_every_epoch_and_batch() {
        let config = FineTuneConfig { epochs: 2, batch_size: 4, learning_rate: 2e-5 };
        let sink = RecordingSink::default();
        builder(config).build(&records(10), &sink).unwrap();

        let events = sink.events.lock().unwrap();
        let epochs = events.iter().filter(|e| matches!(e, ProgressEvent::Epoch { .. })).count();
        let batches = events.iter().filter(|e| matches!(e, ProgressEvent::Batch { .. })).count();
        assert_eq!(epochs, 2);
        assert_eq!(batches, 2 * 3); // 2 epochs x ceil(10/4) batches
        assert!(matches!(events.first(), Some(ProgressEvent::Started { .. })));
        assert!(matches!(events.last(), Some(ProgressEvent::Finished { .. })));
    }

    #[test]
    fn test_zero_batch_size_is_config_error() {
        let config = FineTuneConfig { batch_size: 0, ..Default::default() };
        let sink = RecordingSink::default();
        let err = builder(config).build(&records(10), &sink).unwrap_err();
        assert!(matches!(err, TrainingError::Config(_)));
        // Failed fast: no progress was reported.
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let sink = RecordingSink::default();
        let err = builder(FineTuneConfig::default()).build(&[], &sink).unwrap_err();
        assert!(matches!(err, TrainingError::EmptyDataset));
    }
}
