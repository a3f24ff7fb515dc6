//! Probability distributions over torch tensors
mod categorical;

pub use categorical::{Categorical, SampleError};
