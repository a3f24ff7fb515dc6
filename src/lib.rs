//! Discrete-action policy gradient on a multi-armed bandit.
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)] // also triggered by macro expansions
pub mod agents;
pub mod cli;
pub mod envs;
mod error;
pub mod logging;
pub mod torch;
pub mod utils;

pub use agents::{SessionConfig, StepRecord, TrainConfig, TrainingSession, TrainingSummary};
pub use envs::{BanditError, NormalMeansBandit};
pub use error::Error;

/// Pseudo-random number generator used throughout the crate.
pub type Prng = rand_chacha::ChaCha8Rng;
