//! Model abstraction layer for Fintune.
//!
//! Defines the boundary between the data/workflow pipeline and the
//! chat-completion capability it drives. Everything behind `Model` is opaque
//! to the core: latency, failure modes and determinism are the provider's
//! business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error that can occur when invoking a model.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelError {
    /// The request never produced a usable response (network failure,
    /// connection refused, malformed request).
    #[error("Request Error: {0}")]
    RequestError(String),

    /// The provider answered, but with an error (invalid input, server error).
    #[error("Model Response Error: {0}")]
    ModelResponseError(String),

    /// A request or response body could not be serialized/deserialized.
    #[error("Serialization Error: {0}")]
    SerializationError(String),

    /// The configured provider is unknown or missing required credentials.
    #[error("Unsupported Model Provider: {0}")]
    UnsupportedModelProvider(String),

    /// Provider quota exceeded or rate limit hit.
    #[error("Provider '{provider}' quota exceeded")]
    QuotaExceeded {
        /// The provider name (e.g., "openai", "mock").
        provider: String,
        /// Optional error message from the provider.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// The call exceeded the caller-supplied deadline.
    #[error("Model call timed out after {timeout_ms}ms")]
    Timeout {
        /// The deadline that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// Other unexpected errors.
    #[error("Other Model Error: {0}")]
    Other(String),
}

/// A single message in a chat conversation.
///
/// This is also the shape of one element of a training record's `messages`
/// sequence, so validated records convert losslessly at the model boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender ("system", "user" or "assistant").
    pub role: String,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Creates a user-role message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    /// Creates a system-role message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }
}

/// Parameters for controlling generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Sampling temperature, between 0 and 2.
    pub temperature: Option<f32>,

    /// Nucleus sampling probability mass.
    pub top_p: Option<f32>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sequences where generation stops.
    pub stop_sequences: Option<Vec<String>>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: Some(0.7),
            top_p: Some(1.0),
            max_tokens: Some(1024),
            stop_sequences: None,
        }
    }
}

/// The response from a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated content.
    pub content: String,

    /// The ID of the model that produced the response, when reported.
    pub model_id: Option<String>,

    /// Token usage for the request, when reported.
    pub usage: Option<ModelUsage>,
}

/// Token usage statistics for a model request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelUsage {
    /// Number of tokens in the prompt.
    pub prompt_tokens: u32,

    /// Number of tokens in the completion.
    pub completion_tokens: u32,

    /// Total number of tokens used.
    pub total_tokens: u32,
}

/// The chat-completion capability consumed by the workflow pipeline.
///
/// Implementations must be `Send + Sync`; callers may share one instance
/// across many sequential invocations. Output is not assumed deterministic.
#[async_trait]
pub trait Model: Send + Sync {
    /// Generates a completion for a single rendered prompt.
    ///
    /// # Errors
    /// Returns a `ModelError` if generation fails.
    async fn generate_text(
        &self,
        prompt: &str,
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError>;

    /// Generates a completion for a conversation history.
    ///
    /// # Errors
    /// Returns a `ModelError` if generation fails.
    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError>;

    /// Returns the ID of the model.
    fn model_id(&self) -> &str;
}
