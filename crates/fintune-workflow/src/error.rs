use fintune_abstraction::ModelError;
use thiserror::Error;

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The model capability failed; propagated untouched to the caller.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The stage sequence completed without any stage writing a response.
    #[error("workflow completed without producing a response")]
    NoResponse,
}
