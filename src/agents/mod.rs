//! Policy-gradient training agents
mod config;
pub mod policy_gradient;
mod session;

pub use config::{SessionConfig, TrainConfig};
pub use policy_gradient::{build_policy, policy_gradient_loss, LOG_EPSILON, STATE_DIM};
pub use session::{StepRecord, TrainingSession, TrainingSummary};
