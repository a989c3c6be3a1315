use fintune_abstraction::ModelError;
use fintune_training::TrainingError;
use fintune_workflow::WorkflowError;
use thiserror::Error;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Business-level emptiness: the pipeline ran fine but produced no
    /// usable training records.
    #[error("no training data available")]
    NoTrainingData,

    /// Business-level emptiness for the validation split.
    #[error("no validation data available")]
    NoValidationData,

    /// A fine-tune run is already active; repeated invocations may not race
    /// on shared status.
    #[error("a fine-tune run is already in progress")]
    FineTuneInProgress,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
