//! Error type
use crate::envs::BanditError;
use crate::logging::LogError;
use crate::torch::distributions::SampleError;
use tch::TchError;
use thiserror::Error;

/// Error from the discrete policy gradient crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("error building bandit")]
    Bandit(#[from] BanditError),
    #[error("error sampling an action")]
    Sample(#[from] SampleError),
    #[error("error logging a statistic")]
    Log(#[from] LogError),
    #[error("torch error")]
    Torch(#[from] TchError),
}
