//! The service facade consumed by the API layer.

use crate::config::Settings;
use crate::error::{ServiceError, ServiceResult};
use crate::status::{StatusSnapshot, StatusStore};
use fintune_abstraction::Model;
use fintune_models::{ModelConfig, ModelFactory, ModelProvider};
use fintune_training::{
    DatasetPreparer, FineTuneConfig, FineTuneManifest, FineTuneManifestBuilder, PreparedDataset,
    TracingProgressSink,
};
use fintune_workflow::{
    EvaluationDriver, EvaluationResult, InferenceRequest, ResponseWorkflow, WorkflowOptions,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Orchestrates dataset preparation, fine-tune runs, batch evaluation and
/// single-turn inference over one configured model.
pub struct FineTuneService {
    settings: Settings,
    preparer: DatasetPreparer,
    model: Arc<dyn Model>,
    status: StatusStore,
}

impl FineTuneService {
    /// Creates a service over an already-constructed model.
    #[must_use]
    pub fn new(settings: Settings, model: Arc<dyn Model>) -> Self {
        let preparer = DatasetPreparer::new(
            settings.data_dir.clone(),
            settings.train_data_file.clone(),
            settings.val_data_file.clone(),
        );
        Self { settings, preparer, model, status: StatusStore::new() }
    }

    /// Creates a service, building the model from the settings' provider
    /// configuration.
    ///
    /// # Errors
    /// `ServiceError::Config` for an unknown provider; model errors for
    /// missing credentials.
    pub fn from_settings(settings: Settings) -> ServiceResult<Self> {
        let provider: ModelProvider = settings.model_provider.parse().map_err(|()| {
            ServiceError::Config(format!("unknown model provider: {}", settings.model_provider))
        })?;

        let mut config = ModelConfig::new(provider, settings.base_model.clone());
        if let Some(api_key) = settings.api_key.clone() {
            config = config.with_api_key(api_key);
        }
        if let Some(base_url) = settings.api_base_url.clone() {
            config = config.with_base_url(base_url);
        }

        let model = ModelFactory::create(config)?;
        Ok(Self::new(settings, model))
    }

    /// Loads and validates both dataset splits.
    pub fn prepare_dataset(&self) -> ServiceResult<PreparedDataset> {
        Ok(self.preparer.prepare()?)
    }

    /// Runs a (simulated) fine-tune: validates data and config, emits the
    /// progress plan, and records the resulting manifest.
    ///
    /// # Errors
    /// `NoTrainingData` when the cleaned training split is empty;
    /// `FineTuneInProgress` when a run is already active; config errors from
    /// the manifest builder.
    pub fn fine_tune(&self, config: FineTuneConfig) -> ServiceResult<FineTuneManifest> {
        self.status.begin()?;

        let prepared = match self.prepare_dataset() {
            Ok(prepared) => prepared,
            Err(e) => {
                self.status.fail();
                return Err(e);
            }
        };

        if prepared.train.is_empty() {
            warn!("Fine-tune requested but no training data is available");
            self.status.reset();
            return Err(ServiceError::NoTrainingData);
        }

        let builder = FineTuneManifestBuilder::new(
            config,
            self.settings.base_model.clone(),
            self.settings.fine_tuned_model_name.clone(),
        );

        match builder.build(&prepared.train, &TracingProgressSink) {
            Ok(manifest) => {
                info!(run_id = %manifest.run_id, examples = manifest.example_count, "Fine-tune completed");
                self.status.complete(manifest.clone());
                Ok(manifest)
            }
            Err(e) => {
                self.status.fail();
                Err(e.into())
            }
        }
    }

    /// Evaluates the validation split through the response workflow.
    ///
    /// # Errors
    /// `NoValidationData` when the cleaned validation split is empty.
    /// Per-record model failures do not error here; they are captured inside
    /// the returned results.
    pub async fn evaluate(&self) -> ServiceResult<Vec<EvaluationResult>> {
        let prepared = self.prepare_dataset()?;
        if prepared.validation.is_empty() {
            warn!("Evaluation requested but no validation data is available");
            return Err(ServiceError::NoValidationData);
        }

        let driver = EvaluationDriver::new(self.workflow());
        Ok(driver.evaluate(&prepared.validation).await)
    }

    /// Answers one question through the response workflow.
    ///
    /// # Errors
    /// Model-capability failures propagate to the caller; there is no
    /// partially filled response.
    pub async fn run_inference(
        &self,
        user_question: &str,
        account_info: &str,
    ) -> ServiceResult<String> {
        let request = InferenceRequest {
            user_question: user_question.to_string(),
            account_info: account_info.to_string(),
        };
        Ok(self.workflow().invoke(request).await?)
    }

    /// Reports the current fine-tune state and active model identity.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        self.status.snapshot(&self.settings.base_model, &self.settings.fine_tuned_model_name)
    }

    fn workflow(&self) -> ResponseWorkflow {
        let options = WorkflowOptions { parameters: None, timeout: self.settings.model_timeout };
        ResponseWorkflow::new(Arc::clone(&self.model), options)
    }
}
