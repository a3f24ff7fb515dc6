//! Training session configuration
use crate::torch::{AdamConfig, MlpConfig};
use serde::{Deserialize, Serialize};

/// Configuration of a [`TrainingSession`](super::TrainingSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// True mean reward of each arm. One discrete action per arm.
    pub arm_means: Vec<f64>,
    /// Value of the constant state fed to the policy.
    pub state: f64,
    /// Policy network.
    pub policy: MlpConfig,
    /// Policy optimizer.
    pub optimizer: AdamConfig,
    /// Seed for parameter initialization, action sampling and rewards.
    ///
    /// Seeded from system entropy if `None`.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            arm_means: vec![1.0, 0.9, 0.9, 1.0],
            state: 1.0,
            policy: MlpConfig::default(),
            optimizer: AdamConfig::default(),
            seed: None,
        }
    }
}

/// Configuration of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Total number of training iterations.
    pub num_iterations: u64,
    /// Report on every iteration whose index is a multiple of this period.
    ///
    /// A period of 0 disables reports.
    pub report_period: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_iterations: 10_001,
            report_period: 100,
        }
    }
}
