use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::fmt;
use tch::Tensor;
use thiserror::Error;

/// Standard deviation of every arm's reward distribution.
pub const REWARD_STDDEV: f64 = 1.0;

/// A multi-armed bandit with normally distributed arm rewards.
///
/// Each arm `i` pays a reward sampled from `Normal(means[i], 1)`.
/// The bandit is stateless; randomness comes from the generator passed to [`reward`].
///
/// [`reward`]: NormalMeansBandit::reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalMeansBandit {
    means: Vec<f64>,
}

impl NormalMeansBandit {
    /// Create a bandit from the true mean reward of each arm.
    pub fn new(means: Vec<f64>) -> Result<Self, BanditError> {
        if means.is_empty() {
            return Err(BanditError::Empty);
        }
        if let Some((arm, &mean)) = means.iter().enumerate().find(|(_, m)| !m.is_finite()) {
            return Err(BanditError::NonFiniteMean { arm, mean });
        }
        Ok(Self { means })
    }

    /// Number of arms (discrete actions).
    #[inline]
    pub fn num_actions(&self) -> usize {
        self.means.len()
    }

    /// True mean reward of each arm.
    #[inline]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Index of the arm with the highest mean (the first one on ties).
    pub fn best_action(&self) -> usize {
        self.means
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &m)| {
                if m > best.1 {
                    (i, m)
                } else {
                    best
                }
            })
            .0
    }

    /// Pull an arm, returning a one-element reward tensor.
    pub fn reward<R: Rng + ?Sized>(&self, action: usize, rng: &mut R) -> Result<Tensor, BanditError> {
        let mean = *self
            .means
            .get(action)
            .ok_or(BanditError::InvalidAction {
                action,
                num_actions: self.means.len(),
            })?;
        Ok(sample_reward(mean, rng))
    }
}

impl fmt::Display for NormalMeansBandit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NormalMeansBandit({:?})", self.means)
    }
}

/// Sample a reward from `Normal(mean, 1)` as a float tensor of shape `[1]`.
pub fn sample_reward<R: Rng + ?Sized>(mean: f64, rng: &mut R) -> Tensor {
    let noise: f64 = StandardNormal.sample(rng);
    #[allow(clippy::cast_possible_truncation)]
    let reward = (mean + REWARD_STDDEV * noise) as f32;
    Tensor::of_slice(&[reward])
}

/// Error constructing or pulling a bandit.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BanditError {
    #[error("bandit must have at least one arm")]
    Empty,
    #[error("arm {arm} has non-finite mean {mean}")]
    NonFiniteMean { arm: usize, mean: f64 },
    #[error("action {action} is out of range for {num_actions} arms")]
    InvalidAction { action: usize, num_actions: usize },
}
