//! Torch optimizer wrappers and configuration
use super::{BaseOptimizer, BuildOptimizer, OnceOptimizer};
use serde::{Deserialize, Serialize};
use tch::nn::{self, OptimizerConfig, VarStore};
use tch::TchError;

impl BaseOptimizer for nn::Optimizer {
    fn zero_grad(&mut self) {
        nn::Optimizer::zero_grad(self);
    }
}

impl OnceOptimizer for nn::Optimizer {
    fn step_once(&mut self) {
        nn::Optimizer::step(self);
    }
}

/// Configuration for the SGD optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SgdConfig {
    /// Learning rate
    pub learning_rate: f64,
    /// Momentum
    pub momentum: f64,
    /// Weight decay (L2 penalty)
    pub weight_decay: f64,
    /// Dampening for momentum
    pub dampening: f64,
    /// Enables Nesterov momentum
    pub nesterov: bool,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-2,
            momentum: 0.0,
            weight_decay: 0.0,
            dampening: 0.0,
            nesterov: false,
        }
    }
}

impl BuildOptimizer for SgdConfig {
    type Optimizer = nn::Optimizer;
    type Error = TchError;

    fn build_optimizer(&self, vs: &VarStore) -> Result<nn::Optimizer, TchError> {
        nn::Sgd {
            momentum: self.momentum,
            dampening: self.dampening,
            wd: self.weight_decay,
            nesterov: self.nesterov,
        }
        .build(vs, self.learning_rate)
    }
}

/// Configuration for the Adam optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdamConfig {
    /// Learning rate
    pub learning_rate: f64,
    /// Coefficient for the running average of the gradient
    pub beta1: f64,
    /// Coefficient for the running average of the square of the gradient
    pub beta2: f64,
    /// Weight decay (L2 penalty)
    pub weight_decay: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            weight_decay: 0.0,
        }
    }
}

impl BuildOptimizer for AdamConfig {
    type Optimizer = nn::Optimizer;
    type Error = TchError;

    #[allow(clippy::needless_update)] // the field set of nn::Adam varies across tch versions
    fn build_optimizer(&self, vs: &VarStore) -> Result<nn::Optimizer, TchError> {
        nn::Adam {
            beta1: self.beta1,
            beta2: self.beta2,
            wd: self.weight_decay,
            ..nn::Adam::default()
        }
        .build(vs, self.learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;

    #[test]
    fn sgd_optimizes_quadratic() {
        let config = SgdConfig {
            learning_rate: 1e-1,
            ..SgdConfig::default()
        };
        testing::check_optimizes_quadratic(&config, 500);
    }

    #[test]
    fn adam_optimizes_quadratic() {
        let config = AdamConfig {
            learning_rate: 1e-1,
            ..AdamConfig::default()
        };
        testing::check_optimizes_quadratic(&config, 500);
    }

    #[test]
    fn adam_default_learning_rate() {
        assert_eq!(AdamConfig::default().learning_rate, 0.001);
    }
}
