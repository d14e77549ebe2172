use serde::Deserialize;
use std::path::Path;

use crate::error::{NetworkError, Result};

/// Default number of worker tasks, and the batch size below which layers
/// switch to intra-layer parallelism instead of splitting the batch.
pub const TASK_SIZE: usize = 8;

/// Hyperparameters of a `train` run.
///
/// Every field has a default, so a JSON config only needs the values it
/// changes:
///
/// ```json
/// { "batch_size": 16, "epochs": 30 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Samples per mini-batch; `1` is online learning.
    pub batch_size: usize,
    pub epochs: usize,
    /// Re-initialize every weight before the first epoch.
    pub reset_weights: bool,
    /// Maximum number of tasks a mini-batch is split into.
    pub thread_count: usize,
    /// Weights are checked for NaN/infinity every this many batches.
    pub divergence_check_interval: usize,
    /// Samples used to estimate the Hessian diagonal at each epoch start.
    pub hessian_sample_cap: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            batch_size: 1,
            epochs: 1,
            reset_weights: true,
            thread_count: TASK_SIZE,
            divergence_check_interval: 100,
            hessian_sample_cap: 500,
        }
    }
}

impl TrainConfig {
    pub fn new(batch_size: usize, epochs: usize) -> Self {
        TrainConfig { batch_size, epochs, ..TrainConfig::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NetworkError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.thread_count == 0 {
            return Err(NetworkError::InvalidConfig("thread_count must be at least 1".into()));
        }
        if self.divergence_check_interval == 0 {
            return Err(NetworkError::InvalidConfig(
                "divergence_check_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Reads a config from a JSON file and validates it.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let config: TrainConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: TrainConfig = serde_json::from_str(r#"{ "batch_size": 16, "epochs": 30 }"#).unwrap();
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.epochs, 30);
        assert!(config.reset_weights);
        assert_eq!(config.thread_count, TASK_SIZE);
        assert_eq!(config.divergence_check_interval, 100);
        assert_eq!(config.hessian_sample_cap, 500);
    }

    #[test]
    fn zero_batch_is_rejected() {
        let config = TrainConfig::new(0, 1);
        assert!(matches!(config.validate(), Err(NetworkError::InvalidConfig(_))));
    }
}
