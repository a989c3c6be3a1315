//! Model factory for creating model instances from configuration.

use crate::{MockModel, OpenAiModel};
use fintune_abstraction::{Model, ModelError};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Model provider enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    /// Scripted mock model, no upstream dependency.
    Mock,
    /// OpenAI or any chat-completions-compatible endpoint.
    OpenAi,
}

impl FromStr for ModelProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "openai" | "openai-compatible" => Ok(Self::OpenAi),
            _ => Err(()),
        }
    }
}

/// Model configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// The provider to instantiate.
    pub provider: ModelProvider,
    /// The model ID (e.g., "gpt-3.5-turbo").
    pub model_id: String,
    /// Optional API key (when absent, loaded from the environment).
    pub api_key: Option<String>,
    /// Optional base URL for compatible endpoints.
    pub base_url: Option<String>,
}

impl ModelConfig {
    /// Creates a new `ModelConfig` with the given provider and model ID.
    #[must_use]
    pub fn new(provider: ModelProvider, model_id: String) -> Self {
        Self { provider, model_id, api_key: None, base_url: None }
    }

    /// Sets the API key for this configuration.
    #[must_use]
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the base URL for this configuration.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }
}

/// Factory for creating model instances.
pub struct ModelFactory;

impl ModelFactory {
    /// Creates a model instance from the given configuration.
    ///
    /// # Errors
    /// Returns a `ModelError` if model creation fails (e.g., missing API key).
    pub fn create(config: ModelConfig) -> Result<Arc<dyn Model>, ModelError> {
        debug!(
            provider = ?config.provider,
            model_id = %config.model_id,
            "Creating model instance"
        );

        match config.provider {
            ModelProvider::Mock => Ok(Arc::new(MockModel::new(config.model_id))),
            ModelProvider::OpenAi => {
                let model = match config.api_key {
                    Some(api_key) => OpenAiModel::with_api_key(config.model_id, api_key),
                    None => OpenAiModel::new(config.model_id)?,
                };
                let model = match config.base_url {
                    Some(base_url) => model.with_base_url(base_url),
                    None => model,
                };
                Ok(Arc::new(model))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("mock".parse::<ModelProvider>(), Ok(ModelProvider::Mock));
        assert_eq!("OpenAI".parse::<ModelProvider>(), Ok(ModelProvider::OpenAi));
        assert!("llamacpp".parse::<ModelProvider>().is_err());
    }

    #[test]
    fn test_factory_creates_mock_model() {
        let config = ModelConfig::new(ModelProvider::Mock, "mock-1".to_string());
        let model = ModelFactory::create(config).unwrap();
        assert_eq!(model.model_id(), "mock-1");
    }

    #[test]
    fn test_factory_creates_openai_model_with_explicit_key() {
        let config = ModelConfig::new(ModelProvider::OpenAi, "gpt-3.5-turbo".to_string())
            .with_api_key("sk-test".to_string())
            .with_base_url("http://localhost:8000/v1".to_string());
        let model = ModelFactory::create(config).unwrap();
        assert_eq!(model.model_id(), "gpt-3.5-turbo");
    }
}
