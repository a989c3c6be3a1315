//! Progress reporting for fine-tune runs.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Observability events emitted while a manifest is built. These have no
/// effect on the manifest itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Started { run_id: String, example_count: usize },
    Epoch { run_id: String, epoch: u32, total_epochs: u32 },
    Batch { run_id: String, epoch: u32, batch: u32, total_batches: u32 },
    Finished { run_id: String },
}

/// Sink for progress events.
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: ProgressEvent);
}

/// Default sink: forwards events to `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { run_id, example_count } => {
                info!(run_id = %run_id, examples = example_count, "Fine-tune run started");
            }
            ProgressEvent::Epoch { run_id, epoch, total_epochs } => {
                info!(run_id = %run_id, "Epoch {epoch}/{total_epochs}");
            }
            ProgressEvent::Batch { run_id, epoch, batch, total_batches } => {
                info!(run_id = %run_id, epoch, "Processing batch {batch}/{total_batches}");
            }
            ProgressEvent::Finished { run_id } => {
                info!(run_id = %run_id, "Fine-tune run finished");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Collects events for assertions in tests.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressSink for RecordingSink {
        fn on_event(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}
