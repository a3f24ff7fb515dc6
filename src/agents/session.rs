//! Policy-gradient training session
use super::policy_gradient::{build_policy, policy_gradient_loss};
use super::{SessionConfig, TrainConfig};
use crate::envs::NormalMeansBandit;
use crate::logging::{BarChart, Event, Loggable, Logger, StatusReport};
use crate::torch::distributions::Categorical;
use crate::torch::optimizers::{
    global_grad_norm, gradients, BaseOptimizer, BuildOptimizer, OnceOptimizer,
};
use crate::torch::{FeedForwardModule, Mlp, Module};
use crate::utils::stats::OnlineMeanVariance;
use crate::{Error, Prng};
use rand::SeedableRng;
use std::collections::HashMap;
use std::fmt;
use tch::{nn, nn::VarStore, Device, Kind, Tensor};

/// Outcome of a single training iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Zero-based iteration index.
    pub iteration: u64,
    /// Action probabilities before the update.
    pub action_probabilities: Vec<f64>,
    /// Sampled action index.
    pub action: usize,
    /// Probability of `action` before the update.
    pub probability: f64,
    /// Reward received for `action`.
    pub reward: f64,
    /// Policy-gradient loss of this iteration.
    pub loss: f64,
    /// Entropy of the action distribution in nats.
    pub entropy: f64,
    /// Global norm of the parameter gradients.
    pub grad_norm: f64,
}

impl StepRecord {
    /// Status block for this iteration.
    pub const fn status_report(&self) -> StatusReport {
        StatusReport {
            iteration: self.iteration,
            probability: self.probability,
            action: self.action,
            reward: self.reward,
            loss: self.loss,
        }
    }

    /// Bar chart of the action probabilities.
    pub fn chart(&self) -> BarChart {
        BarChart::action_probabilities(&self.action_probabilities)
    }
}

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    /// Number of training iterations run.
    pub num_iterations: u64,
    /// Action probabilities after the final update.
    pub final_probabilities: Vec<f64>,
    /// Mean reward over the run. NaN if no iterations were run.
    pub mean_reward: f64,
    /// Mean loss over the run. NaN if no iterations were run.
    pub mean_loss: f64,
    /// Number of times each action was selected.
    pub action_counts: Vec<u64>,
}

impl fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "iterations: {}", self.num_iterations)?;
        writeln!(f, "mean reward: {:.4}", self.mean_reward)?;
        writeln!(f, "mean loss: {:.4}", self.mean_loss)?;
        write!(f, "action counts:")?;
        for (i, count) in self.action_counts.iter().enumerate() {
            write!(f, " {}:{}", i + 1, count)?;
        }
        writeln!(f)?;
        write!(f, "final probabilities:")?;
        for p in &self.final_probabilities {
            write!(f, " {:.4}", p)?;
        }
        Ok(())
    }
}

/// Trains a policy network on a fixed bandit with a constant state.
///
/// The session owns the bandit, the policy variables and optimizer state, and the
/// random number generator used for initialization, action sampling, and rewards.
pub struct TrainingSession {
    bandit: NormalMeansBandit,
    /// Holds the policy variables. Must outlive `optimizer`.
    vs: VarStore,
    policy: Mlp,
    optimizer: nn::Optimizer,
    /// Constant state of shape `[1, STATE_DIM]`.
    state: Tensor,
    rng: Prng,
    iteration: u64,
}

impl TrainingSession {
    /// Build a new session.
    ///
    /// Sessions built from the same config with `Some` seed are identical.
    pub fn new(config: &SessionConfig) -> Result<Self, Error> {
        let bandit = NormalMeansBandit::new(config.arm_means.clone())?;
        let mut rng = match config.seed {
            Some(seed) => Prng::seed_from_u64(seed),
            None => Prng::from_entropy(),
        };
        let vs = VarStore::new(Device::Cpu);
        let policy = build_policy(&config.policy, &vs.root(), bandit.num_actions(), &mut rng);
        let optimizer = config.optimizer.build_optimizer(&vs)?;
        #[allow(clippy::cast_possible_truncation)]
        let state = Tensor::of_slice(&[config.state as f32]).reshape(&[1, 1]);
        Ok(Self {
            bandit,
            vs,
            policy,
            optimizer,
            state,
            rng,
            iteration: 0,
        })
    }

    /// The bandit being trained on.
    pub const fn bandit(&self) -> &NormalMeansBandit {
        &self.bandit
    }

    /// Number of iterations completed so far.
    pub const fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Current action probabilities, evaluated without recording gradients.
    pub fn action_probabilities(&self) -> Vec<f64> {
        let probs = tch::no_grad(|| self.policy.forward(&self.state));
        Categorical::from_probs(&probs).probabilities()
    }

    /// Trainable policy parameters by variable name.
    pub fn parameters(&self) -> HashMap<String, Tensor> {
        self.vs.variables()
    }

    /// Run one training iteration: sample an action, collect its reward,
    /// and take one optimizer step on the policy-gradient loss.
    pub fn step(&mut self) -> Result<StepRecord, Error> {
        let action_probs = self.policy.forward(&self.state);
        let distribution = Categorical::from_probs(&action_probs);
        let action_probabilities = distribution.probabilities();
        let entropy = distribution.entropy();
        let action = distribution.sample(&mut self.rng)?;
        let reward = self.bandit.reward(action, &mut self.rng)?;
        let probability_action = distribution.prob(action);
        let loss = policy_gradient_loss(&probability_action, &self.state, &reward);

        BaseOptimizer::zero_grad(&mut self.optimizer);
        loss.sum(Kind::Float).backward();
        let grad_norm = global_grad_norm(&gradients(self.policy.trainable_variables()));
        OnceOptimizer::step_once(&mut self.optimizer);

        let record = StepRecord {
            iteration: self.iteration,
            probability: action_probabilities[action],
            action_probabilities,
            action,
            reward: reward.double_value(&[0]),
            loss: loss.double_value(&[0]),
            entropy,
            grad_norm,
        };
        self.iteration += 1;
        Ok(record)
    }

    /// Train for `config.num_iterations` iterations.
    ///
    /// # Args
    /// * `config` - Number of iterations and report period.
    /// * `logger` - Receives per-iteration statistics and report events.
    /// * `on_report` - Called with the record of every reported iteration.
    pub fn run<L, F>(
        &mut self,
        config: &TrainConfig,
        logger: &mut L,
        mut on_report: F,
    ) -> Result<TrainingSummary, Error>
    where
        L: Logger + ?Sized,
        F: FnMut(&StepRecord),
    {
        let num_actions = self.bandit.num_actions();
        let mut reward_stats = OnlineMeanVariance::new();
        let mut loss_stats = OnlineMeanVariance::new();
        let mut action_counts = vec![0; num_actions];

        for _ in 0..config.num_iterations {
            let record = self.step()?;
            reward_stats.push(record.reward);
            loss_stats.push(record.loss);
            action_counts[record.action] += 1;

            logger.log(Event::Iteration, "reward", record.reward.into())?;
            logger.log(Event::Iteration, "loss", record.loss.into())?;
            logger.log(
                Event::Iteration,
                "action",
                Loggable::IndexSample {
                    value: record.action,
                    size: num_actions,
                },
            )?;
            logger.log(Event::Iteration, "entropy", record.entropy.into())?;
            logger.log(Event::Iteration, "grad_norm", record.grad_norm.into())?;
            logger.done(Event::Iteration);

            if config.report_period > 0 && record.iteration % config.report_period == 0 {
                on_report(&record);
                logger.log(Event::Report, "probability", record.probability.into())?;
                logger.done(Event::Report);
            }
        }

        Ok(TrainingSummary {
            num_iterations: config.num_iterations,
            final_probabilities: self.action_probabilities(),
            mean_reward: reward_stats.mean(),
            mean_loss: loss_stats.mean(),
            action_counts,
        })
    }
}
