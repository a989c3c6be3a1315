//! Mock model for tests and dependency-free runs.
//!
//! The original deployment story includes running the whole service without
//! any upstream model available; the mock provider fills that role here.

use async_trait::async_trait;
use fintune_abstraction::{
    ChatMessage, Model, ModelError, ModelParameters, ModelResponse, ModelUsage,
};
use tracing::debug;

/// A scripted implementation of the `Model` trait.
///
/// By default it echoes a canned completion for every prompt. Tests can make
/// it fail selectively with [`MockModel::failing_on`], which turns any prompt
/// containing the given substring into a `RequestError`.
#[derive(Debug, Default)]
pub struct MockModel {
    id: String,
    fail_on: Option<String>,
}

impl MockModel {
    /// Creates a new `MockModel` with the given ID.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self { id, fail_on: None }
    }

    /// Makes the model fail with a `RequestError` whenever the prompt
    /// contains `needle`.
    #[must_use]
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    fn check_scripted_failure(&self, prompt: &str) -> Result<(), ModelError> {
        if let Some(needle) = &self.fail_on {
            if prompt.contains(needle.as_str()) {
                return Err(ModelError::RequestError(format!(
                    "scripted failure: prompt contains {needle:?}"
                )));
            }
        }
        Ok(())
    }

    fn respond(&self, prompt: &str) -> ModelResponse {
        let content = format!("Mock response from {}: {}", self.id, prompt);
        let prompt_tokens = count_tokens(prompt);
        let completion_tokens = count_tokens(&content);

        ModelResponse {
            content,
            model_id: Some(self.id.clone()),
            usage: Some(ModelUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
        }
    }
}

#[async_trait]
impl Model for MockModel {
    async fn generate_text(
        &self,
        prompt: &str,
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.id,
            prompt_len = prompt.len(),
            parameters = ?parameters,
            "MockModel generating text"
        );

        self.check_scripted_failure(prompt)?;
        Ok(self.respond(prompt))
    }

    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.id,
            message_count = messages.len(),
            parameters = ?parameters,
            "MockModel generating chat completion"
        );

        let last = messages.last().map_or("", |m| m.content.as_str());
        self.check_scripted_failure(last)?;
        Ok(self.respond(last))
    }

    fn model_id(&self) -> &str {
        &self.id
    }
}

/// Count tokens in a string (simplified: word count).
fn count_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_model_echoes_prompt() {
        let model = MockModel::new("mock-1".to_string());
        let response = model.generate_text("hello", None).await.unwrap();
        assert!(response.content.contains("hello"));
        assert_eq!(response.model_id.as_deref(), Some("mock-1"));
    }

    #[tokio::test]
    async fn test_mock_model_scripted_failure() {
        let model = MockModel::new("mock-1".to_string()).failing_on("boom");
        let err = model.generate_text("please boom now", None).await.unwrap_err();
        assert!(matches!(err, ModelError::RequestError(_)));

        // Non-matching prompts still succeed.
        assert!(model.generate_text("all fine", None).await.is_ok());
    }
}
