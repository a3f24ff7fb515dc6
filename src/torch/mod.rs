//! Torch components
pub mod distributions;
pub mod initializers;
pub mod modules;
pub mod optimizers;

pub use modules::{Activation, BuildModule, FeedForwardModule, Mlp, MlpConfig, Module};
pub use optimizers::{AdamConfig, BuildOptimizer, OnceOptimizer};
