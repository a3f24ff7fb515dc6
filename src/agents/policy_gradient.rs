//! Policy-gradient loss and policy network
use crate::torch::{BuildModule, Mlp, MlpConfig};
use rand::Rng;
use tch::{nn::Path, Tensor};

/// Number of state features. The state is a single constant scalar.
pub const STATE_DIM: usize = 1;

/// Added to the action probability before taking the logarithm.
pub const LOG_EPSILON: f64 = 1e-5;

/// Build a policy network mapping a `[BATCH, STATE_DIM]` state to `[BATCH, num_actions]`
/// action probabilities.
///
/// Construction only consumes `rng`, so equal generator states give equal parameters.
pub fn build_policy<R: Rng + ?Sized>(
    config: &MlpConfig,
    vs: &Path,
    num_actions: usize,
    rng: &mut R,
) -> Mlp {
    config.build_module(vs, STATE_DIM, num_actions, rng)
}

/// REINFORCE loss without a baseline: `-reward * ln(probability_action + LOG_EPSILON)`.
///
/// # Args
/// * `probability_action` - Probability the policy assigned to the selected action.
///     Gradients flow through this tensor.
/// * `_state` - The state the action was selected in. Does not affect the loss.
/// * `reward` - Reward received for the action.
pub fn policy_gradient_loss(probability_action: &Tensor, _state: &Tensor, reward: &Tensor) -> Tensor {
    let log_probability = (probability_action + LOG_EPSILON).log();
    -(reward * log_probability)
}
