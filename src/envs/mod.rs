//! Reinforcement learning environments
mod bandits;

pub use bandits::{sample_reward, BanditError, NormalMeansBandit, REWARD_STDDEV};
