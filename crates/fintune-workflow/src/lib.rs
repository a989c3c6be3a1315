//! Fintune Workflow
//!
//! Single-turn prompt orchestration and batch evaluation:
//! - `prompt`: the fixed financial-assistant instruction template
//! - `workflow`: the staged response pipeline (START → GENERATE → DONE)
//! - `evaluation`: the sequential per-record evaluation driver

pub mod error;
pub mod evaluation;
pub mod prompt;
pub mod workflow;

pub use error::{WorkflowError, WorkflowResult};
pub use evaluation::{
    EvaluationDriver, EvaluationOutcome, EvaluationResult, ACCOUNT_END_MARKER,
    ACCOUNT_START_MARKER, ERROR_OUTPUT,
};
pub use prompt::{PromptTemplate, FINANCE_ASSISTANT_TEMPLATE};
pub use workflow::{
    GenerateStage, InferenceRequest, ResponseWorkflow, WorkflowOptions, WorkflowStage,
    WorkflowState,
};
