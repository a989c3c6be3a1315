//! Fine-tuning hyperparameters.

use crate::error::{TrainingError, TrainingResult};
use serde::{Deserialize, Serialize};

/// Hyperparameters for one fine-tuning run. Immutable for the run's duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineTuneConfig {
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
}

impl Default for FineTuneConfig {
    fn default() -> Self {
        Self { epochs: 3, batch_size: 4, learning_rate: 2e-5 }
    }
}

impl FineTuneConfig {
    /// Fails fast on unusable hyperparameters, before any work begins.
    pub fn validate(&self) -> TrainingResult<()> {
        if self.epochs == 0 {
            return Err(TrainingError::Config("epochs must be >= 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(TrainingError::Config("batch_size must be >= 1".to_string()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(TrainingError::Config("learning_rate must be > 0".to_string()));
        }
        Ok(())
    }
}
