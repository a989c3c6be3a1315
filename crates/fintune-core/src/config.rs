//! Environment-driven service settings.
//!
//! Defaults mirror the deployed service so a bare environment still runs
//! (against the mock provider).

use crate::error::{ServiceError, ServiceResult};
use fintune_training::FineTuneConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the fine-tuning service, loaded once at startup and
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the dataset sources.
    pub data_dir: PathBuf,
    /// Training split file name, relative to `data_dir`.
    pub train_data_file: String,
    /// Validation split file name, relative to `data_dir`.
    pub val_data_file: String,
    /// Base model identity (e.g., "gpt-3.5-turbo").
    pub base_model: String,
    /// Target identity for the fine-tuned model.
    pub fine_tuned_model_name: String,
    /// Default hyperparameters; callers may override per run.
    pub fine_tune: FineTuneConfig,
    /// Model provider selector ("openai" or "mock").
    pub model_provider: String,
    /// API key, when the provider needs one.
    pub api_key: Option<String>,
    /// Base URL override for OpenAI-compatible endpoints.
    pub api_base_url: Option<String>,
    /// Per-call deadline for model invocations.
    pub model_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            train_data_file: "train_data.jsonl".to_string(),
            val_data_file: "val_data.jsonl".to_string(),
            base_model: "gpt-3.5-turbo".to_string(),
            fine_tuned_model_name: "finance-assistant".to_string(),
            fine_tune: FineTuneConfig::default(),
            model_provider: "mock".to_string(),
            api_key: None,
            api_base_url: None,
            model_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl Settings {
    /// Loads settings from the environment, falling back to defaults for
    /// anything unset.
    ///
    /// # Errors
    /// `ServiceError::Config` when a numeric variable is set but unparsable.
    pub fn from_env() -> ServiceResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            data_dir: env::var("DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            train_data_file: env::var("TRAIN_DATA_FILE").unwrap_or(defaults.train_data_file),
            val_data_file: env::var("VAL_DATA_FILE").unwrap_or(defaults.val_data_file),
            base_model: env::var("BASE_MODEL").unwrap_or(defaults.base_model),
            fine_tuned_model_name: env::var("FINE_TUNED_MODEL_NAME")
                .unwrap_or(defaults.fine_tuned_model_name),
            fine_tune: FineTuneConfig {
                epochs: parse_var("EPOCHS", defaults.fine_tune.epochs)?,
                batch_size: parse_var("BATCH_SIZE", defaults.fine_tune.batch_size)?,
                learning_rate: parse_var("LEARNING_RATE", defaults.fine_tune.learning_rate)?,
            },
            model_provider: env::var("MODEL_PROVIDER").unwrap_or(defaults.model_provider),
            api_key: env::var("OPENAI_API_KEY").ok(),
            api_base_url: env::var("OPENAI_BASE_URL").ok(),
            model_timeout: parse_var("MODEL_TIMEOUT_MS", 60_000u64).map(timeout_from_millis)?,
        })
    }
}

/// Maps the `MODEL_TIMEOUT_MS` value to a per-call deadline; zero disables
/// the deadline entirely.
fn timeout_from_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> ServiceResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ServiceError::Config(format!("{name} is not a valid number: {raw:?}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployed_service() {
        let settings = Settings::default();
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.train_data_file, "train_data.jsonl");
        assert_eq!(settings.val_data_file, "val_data.jsonl");
        assert_eq!(settings.base_model, "gpt-3.5-turbo");
        assert_eq!(settings.fine_tuned_model_name, "finance-assistant");
        assert_eq!(settings.fine_tune.epochs, 3);
        assert_eq!(settings.fine_tune.batch_size, 4);
        assert!((settings.fine_tune.learning_rate - 2e-5).abs() < f64::EPSILON);
        assert_eq!(settings.model_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_timeout_disables_the_deadline() {
        assert_eq!(timeout_from_millis(0), None);
        assert_eq!(timeout_from_millis(250), Some(Duration::from_millis(250)));
        assert_eq!(timeout_from_millis(60_000), Some(Duration::from_secs(60)));
    }
}
