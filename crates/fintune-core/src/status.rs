//! Fine-tune status state machine.
//!
//! Status lives in one store with explicit transitions instead of a
//! process-wide mutable variable, so repeated or concurrent invocations
//! cannot race each other into an inconsistent state.

use crate::error::{ServiceError, ServiceResult};
use fintune_training::FineTuneManifest;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

/// The state of the (single) fine-tune slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuneState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Snapshot of the service's model status, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub state: TuneState,
    /// The model identity currently answering inference: the fine-tuned
    /// target once a run completed, the base model otherwise.
    pub model_id: String,
    pub fine_tuned: bool,
}

#[derive(Debug)]
struct StatusInner {
    state: TuneState,
    manifest: Option<FineTuneManifest>,
}

/// Store for the fine-tune state machine: Idle → Running → Completed|Failed,
/// with Completed/Failed allowing a fresh Running afterwards.
#[derive(Debug)]
pub struct StatusStore {
    inner: Mutex<StatusInner>,
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusStore {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Mutex::new(StatusInner { state: TuneState::Idle, manifest: None }) }
    }

    /// Claims the run slot, transitioning to `Running`.
    ///
    /// # Errors
    /// `ServiceError::FineTuneInProgress` when a run is already active.
    pub fn begin(&self) -> ServiceResult<()> {
        let mut inner = self.lock();
        if inner.state == TuneState::Running {
            return Err(ServiceError::FineTuneInProgress);
        }
        inner.state = TuneState::Running;
        info!("Fine-tune status: running");
        Ok(())
    }

    /// Records a completed run and its manifest.
    pub fn complete(&self, manifest: FineTuneManifest) {
        let mut inner = self.lock();
        inner.state = TuneState::Completed;
        inner.manifest = Some(manifest);
        info!("Fine-tune status: completed");
    }

    /// Records a failed run. Any earlier manifest is kept; the previously
    /// completed model remains the one serving inference.
    pub fn fail(&self) {
        self.lock().state = TuneState::Failed;
        info!("Fine-tune status: failed");
    }

    /// Releases the slot back to idle without recording an outcome (e.g.
    /// when a run was refused before doing any work).
    pub fn reset(&self) {
        self.lock().state = TuneState::Idle;
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> TuneState {
        self.lock().state
    }

    /// The manifest of the last completed run, if any.
    #[must_use]
    pub fn last_manifest(&self) -> Option<FineTuneManifest> {
        self.lock().manifest.clone()
    }

    /// Builds a status snapshot for the given model identities.
    #[must_use]
    pub fn snapshot(&self, base_model: &str, target_model: &str) -> StatusSnapshot {
        let inner = self.lock();
        let fine_tuned = inner.manifest.is_some();
        StatusSnapshot {
            state: inner.state,
            model_id: if fine_tuned { target_model } else { base_model }.to_string(),
            fine_tuned,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StatusInner> {
        // A poisoned lock means another thread panicked mid-transition;
        // status is a plain enum, so the data is still coherent.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintune_training::{FineTuneConfig, FineTuneManifestBuilder, TracingProgressSink};
    use serde_json::json;

    fn manifest() -> FineTuneManifest {
        let records = vec![json!({
            "messages": [
                {"role": "user", "content": "q"},
                {"role": "assistant", "content": "a"}
            ]
        })];
        FineTuneManifestBuilder::new(
            FineTuneConfig::default(),
            "base".to_string(),
            "tuned".to_string(),
        )
        .build(&records, &TracingProgressSink)
        .unwrap()
    }

    #[test]
    fn test_begin_refuses_concurrent_run() {
        let store = StatusStore::new();
        store.begin().unwrap();
        assert!(matches!(store.begin(), Err(ServiceError::FineTuneInProgress)));
    }

    #[test]
    fn test_full_lifecycle() {
        let store = StatusStore::new();
        assert_eq!(store.state(), TuneState::Idle);

        store.begin().unwrap();
        assert_eq!(store.state(), TuneState::Running);

        store.complete(manifest());
        assert_eq!(store.state(), TuneState::Completed);

        // A new run may start after completion.
        store.begin().unwrap();
        store.fail();
        assert_eq!(store.state(), TuneState::Failed);
        // The completed manifest survives the later failure.
        assert!(store.last_manifest().is_some());
    }

    #[test]
    fn test_snapshot_reports_active_model() {
        let store = StatusStore::new();
        let before = store.snapshot("base", "tuned");
        assert_eq!(before.model_id, "base");
        assert!(!before.fine_tuned);

        store.begin().unwrap();
        store.complete(manifest());
        let after = store.snapshot("base", "tuned");
        assert_eq!(after.model_id, "tuned");
        assert!(after.fine_tuned);
        assert_eq!(after.state, TuneState::Completed);
    }
}
