//! Single-turn response workflow.
//!
//! The workflow is an ordered sequence of named stages over a per-invocation
//! state. Today the default pipeline holds exactly one stage, GENERATE, which
//! renders the instruction template and calls the model; the sequence exists
//! so that additional stages (a retrieval step, a safety filter) can be
//! inserted without changing the caller contract.

use crate::error::{WorkflowError, WorkflowResult};
use crate::prompt::PromptTemplate;
use async_trait::async_trait;
use fintune_abstraction::{Model, ModelError, ModelParameters};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A single-turn inference request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub user_question: String,
    pub account_info: String,
}

/// Mutable state for one workflow invocation. Created per call, owned
/// exclusively by that invocation, dropped when it returns; on failure no
/// partial state is observable to the caller.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub user_question: String,
    pub account_info: String,
    /// Absent until a stage computes it.
    pub response: Option<String>,
}

impl WorkflowState {
    fn new(request: InferenceRequest) -> Self {
        Self {
            user_question: request.user_question,
            account_info: request.account_info,
            response: None,
        }
    }
}

/// One named processing stage of the workflow.
#[async_trait]
pub trait WorkflowStage: Send + Sync {
    /// The stage name, for logs.
    fn name(&self) -> &str;

    /// Runs the stage against the invocation state. An error aborts the
    /// invocation and propagates to the caller.
    async fn run(&self, state: &mut WorkflowState) -> WorkflowResult<()>;
}

/// Options controlling the generate stage.
#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    /// Generation parameters forwarded to the model.
    pub parameters: Option<ModelParameters>,
    /// Per-call deadline for the model invocation. `None` means the workflow
    /// blocks for as long as the model does; batch callers should set this,
    /// since one stalled call otherwise stalls the whole batch.
    pub timeout: Option<Duration>,
}

/// The GENERATE stage: render the template, invoke the model, write the
/// response into the state.
pub struct GenerateStage {
    model: Arc<dyn Model>,
    template: PromptTemplate,
    options: WorkflowOptions,
}

impl GenerateStage {
    #[must_use]
    pub fn new(model: Arc<dyn Model>, template: PromptTemplate, options: WorkflowOptions) -> Self {
        Self { model, template, options }
    }
}

#[async_trait]
impl WorkflowStage for GenerateStage {
    fn name(&self) -> &str {
        "generate"
    }

    async fn run(&self, state: &mut WorkflowState) -> WorkflowResult<()> {
        let prompt = self.template.render(&state.user_question, &state.account_info);
        debug!(
            model_id = %self.model.model_id(),
            prompt_len = prompt.len(),
            "Running generate stage"
        );

        let call = self.model.generate_text(&prompt, self.options.parameters.clone());
        let response = match self.options.timeout {
            Some(deadline) => tokio::time::timeout(deadline, call).await.map_err(|_| {
                ModelError::Timeout { timeout_ms: deadline.as_millis() as u64 }
            })??,
            None => call.await?,
        };

        state.response = Some(response.content);
        Ok(())
    }
}

/// The response workflow: START → stages in order → DONE.
pub struct ResponseWorkflow {
    stages: Vec<Box<dyn WorkflowStage>>,
}

impl ResponseWorkflow {
    /// Creates the default single-stage pipeline over the given model.
    #[must_use]
    pub fn new(model: Arc<dyn Model>, options: WorkflowOptions) -> Self {
        let generate = GenerateStage::new(model, PromptTemplate::default(), options);
        Self { stages: vec![Box::new(generate)] }
    }

    /// Creates a pipeline from explicit stages. The extension point for
    /// callers that need more than GENERATE.
    #[must_use]
    pub fn with_stages(stages: Vec<Box<dyn WorkflowStage>>) -> Self {
        Self { stages }
    }

    /// Appends a stage to the end of the pipeline.
    pub fn push_stage(&mut self, stage: Box<dyn WorkflowStage>) {
        self.stages.push(stage);
    }

    /// Runs the pipeline for one request and returns the response text.
    ///
    /// Model failures propagate untouched; turning them into a reported
    /// error is the caller's responsibility.
    ///
    /// # Errors
    /// Any stage error, or `WorkflowError::NoResponse` if the pipeline
    /// finished without writing a response.
    pub async fn invoke(&self, request: InferenceRequest) -> WorkflowResult<String> {
        let mut state = WorkflowState::new(request);

        for stage in &self.stages {
            debug!(stage = stage.name(), "Executing workflow stage");
            stage.run(&mut state).await?;
        }

        state.response.ok_or(WorkflowError::NoResponse)
    }
}
