//! Multi-layer perceptron
use super::{Activation, BuildModule, FeedForwardModule, Linear, LinearConfig, Module};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::iter;
use tch::{nn::Path, Tensor};

/// Configuration for the [`Mlp`] module.
///
/// The default is a two-hidden-layer ReLU network with 5 units per layer,
/// He normal hidden kernels and an all-ones softmax output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpConfig {
    /// Sizes of the hidden layers
    pub hidden_sizes: Vec<usize>,
    /// Activation function between hidden layers.
    pub activation: Activation,
    /// Activation function on the output.
    pub output_activation: Activation,
    /// Configuration for the hidden linear layers
    pub linear_config: LinearConfig,
    /// Configuration for the output linear layer
    pub output_linear_config: LinearConfig,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden_sizes: vec![5, 5],
            activation: Activation::Relu,
            output_activation: Activation::Softmax,
            linear_config: LinearConfig::he_normal(),
            output_linear_config: LinearConfig::constant(1.0),
        }
    }
}

impl BuildModule for MlpConfig {
    type Module = Mlp;

    fn build_module<R: Rng + ?Sized>(
        &self,
        vs: &Path,
        in_dim: usize,
        out_dim: usize,
        rng: &mut R,
    ) -> Self::Module {
        Mlp::new(vs, in_dim, out_dim, self, rng)
    }
}

/// Multi-layer perceptron
#[derive(Debug, PartialEq)]
pub struct Mlp {
    layers: Vec<Linear>,
    activation: Activation,
    output_activation: Activation,
}

impl Mlp {
    pub fn new<R: Rng + ?Sized>(
        vs: &Path,
        in_dim: usize,
        out_dim: usize,
        config: &MlpConfig,
        rng: &mut R,
    ) -> Self {
        let in_dims = iter::once(&in_dim).chain(&config.hidden_sizes);
        let out_dims = config.hidden_sizes.iter().chain(iter::once(&out_dim));
        let num_layers = config.hidden_sizes.len() + 1;

        let layers: Vec<_> = in_dims
            .zip(out_dims)
            .enumerate()
            .map(|(i, (in_, out_))| {
                let layer_config = if i + 1 == num_layers {
                    &config.output_linear_config
                } else {
                    &config.linear_config
                };
                Linear::new(&(vs / format!("layer_{}", i)), *in_, *out_, layer_config, rng)
            })
            .collect();

        Self {
            layers,
            activation: config.activation,
            output_activation: config.output_activation,
        }
    }

    /// The linear layers, input first.
    pub fn layers(&self) -> &[Linear] {
        &self.layers
    }
}

impl Module for Mlp {
    fn variables(&self) -> Box<dyn Iterator<Item = &Tensor> + '_> {
        Box::new(self.layers.iter().flat_map(Module::variables))
    }
}

impl FeedForwardModule for Mlp {
    fn forward(&self, input: &Tensor) -> Tensor {
        let mut iter_layers = self.layers.iter();
        let mut hidden = iter_layers
            .next()
            .expect("must have >= 1 layers by construction")
            .forward(input);
        for layer in iter_layers {
            hidden = self.activation.forward_owned(hidden);
            hidden = layer.forward(&hidden);
        }
        self.output_activation.forward_owned(hidden)
    }
}
