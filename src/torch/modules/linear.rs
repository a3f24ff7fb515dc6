//! Linear layer
use super::{BuildModule, FeedForwardModule, Module};
use crate::torch::initializers::{Initializer, VarianceScale};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use std::iter;
use tch::{nn::Path, Tensor};

/// Configuration for the [`Linear`] module.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    /// Initializer for the kernel (weight) matrix.
    pub kernel_init: Initializer,
    /// Gain applied to the kernel initializer.
    pub kernel_gain: f64,
    /// Initializer for the bias vector, if one exists.
    pub bias_init: Option<Initializer>,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            kernel_init: Initializer::default(),
            kernel_gain: 1.0,
            bias_init: Some(Initializer::Zeros),
        }
    }
}

impl LinearConfig {
    /// He normal kernel initialization (truncated, `stddev = √(2 / fan_in)`) with zero bias.
    ///
    /// Matches the Keras `he_normal` initializer.
    #[must_use]
    pub const fn he_normal() -> Self {
        Self {
            kernel_init: Initializer::TruncatedNormal(VarianceScale::FanIn),
            kernel_gain: SQRT_2,
            bias_init: Some(Initializer::Zeros),
        }
    }

    /// Kernel with every weight set to `value` and zero bias.
    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self {
            kernel_init: Initializer::Constant(value),
            kernel_gain: 1.0,
            bias_init: Some(Initializer::Zeros),
        }
    }
}

impl BuildModule for LinearConfig {
    type Module = Linear;

    fn build_module<R: Rng + ?Sized>(
        &self,
        vs: &Path,
        in_dim: usize,
        out_dim: usize,
        rng: &mut R,
    ) -> Self::Module {
        Linear::new(vs, in_dim, out_dim, self, rng)
    }
}

/// Linear fully-connected layer module.
#[derive(Debug, PartialEq)]
pub struct Linear {
    kernel: Tensor,
    bias: Option<Tensor>,
}

impl Linear {
    /// Create a new layer with its variables registered under `vs`.
    pub fn new<R: Rng + ?Sized>(
        vs: &Path,
        in_dim: usize,
        out_dim: usize,
        config: &LinearConfig,
        rng: &mut R,
    ) -> Self {
        let kernel_init = config
            .kernel_init
            .tensor(&[out_dim, in_dim])
            .gain(config.kernel_gain)
            .requires_grad(false)
            .build(rng);
        let bias_init = config
            .bias_init
            .map(|init| init.tensor(&[out_dim]).requires_grad(false).build(rng));
        Self {
            kernel: vs.var_copy("kernel", &kernel_init),
            bias: bias_init.map(|b| vs.var_copy("bias", &b)),
        }
    }

    /// Kernel (weight) matrix of shape `[out_dim, in_dim]`.
    #[inline]
    pub const fn kernel(&self) -> &Tensor {
        &self.kernel
    }

    /// Bias vector of shape `[out_dim]`, if any.
    #[inline]
    pub const fn bias(&self) -> Option<&Tensor> {
        self.bias.as_ref()
    }
}

impl Module for Linear {
    #[inline]
    fn variables(&self) -> Box<dyn Iterator<Item = &Tensor> + '_> {
        Box::new(iter::once(&self.kernel).chain(self.bias.iter()))
    }
}

impl FeedForwardModule for Linear {
    #[inline]
    fn forward(&self, input: &Tensor) -> Tensor {
        input.linear(&self.kernel, self.bias.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use crate::Prng;
    use rand::SeedableRng;
    use rstest::{fixture, rstest};
    use tch::nn::VarStore;
    use tch::{kind::Kind, Device};

    #[fixture]
    fn default_module() -> (Linear, usize, usize) {
        let in_dim = 3;
        let out_dim = 2;
        let config = LinearConfig::default();
        let vs = VarStore::new(Device::Cpu);
        let module = config.build_module(&vs.root(), in_dim, out_dim, &mut Prng::seed_from_u64(0));
        (module, in_dim, out_dim)
    }

    #[fixture]
    fn module_no_bias() -> (Linear, usize, usize) {
        let in_dim = 3;
        let out_dim = 2;
        let config = LinearConfig {
            bias_init: None,
            ..LinearConfig::default()
        };
        let vs = VarStore::new(Device::Cpu);
        let module = config.build_module(&vs.root(), in_dim, out_dim, &mut Prng::seed_from_u64(0));
        (module, in_dim, out_dim)
    }

    #[rstest]
    fn forward_batch(default_module: (Linear, usize, usize)) {
        let (module, in_dim, out_dim) = default_module;
        testing::check_forward(&module, in_dim, out_dim, &[4], Kind::Float);
    }

    #[test]
    fn forward_gradient_descent() {
        testing::check_config_forward_gradient_descent(&LinearConfig::default());
    }

    #[test]
    fn he_normal_forward_gradient_descent() {
        testing::check_config_forward_gradient_descent(&LinearConfig::he_normal());
    }

    #[rstest]
    fn variables_count_default(default_module: (Linear, usize, usize)) {
        let (module, _, _) = default_module;
        assert_eq!(module.variables().count(), 2);
    }

    #[rstest]
    fn variables_count_no_bias(module_no_bias: (Linear, usize, usize)) {
        let (module, _, _) = module_no_bias;
        assert_eq!(module.trainable_variables().count(), 1);
    }

    #[test]
    fn registered_in_var_store() {
        let vs = VarStore::new(Device::Cpu);
        let _ = LinearConfig::default().build_module(
            &(vs.root() / "layer_0"),
            3,
            2,
            &mut Prng::seed_from_u64(0),
        );
        let mut names: Vec<_> = vs.variables().into_keys().collect();
        names.sort();
        assert_eq!(names, ["layer_0.bias", "layer_0.kernel"]);
        assert_eq!(vs.trainable_variables().len(), 2);
    }

    #[test]
    fn constant_kernel_zero_bias() {
        let vs = VarStore::new(Device::Cpu);
        let module = LinearConfig::constant(1.0).build_module(
            &vs.root(),
            5,
            4,
            &mut Prng::seed_from_u64(0),
        );
        assert_eq!(
            module.kernel(),
            &Tensor::ones(&[4, 5], (Kind::Float, Device::Cpu))
        );
        assert_eq!(
            module.bias().unwrap(),
            &Tensor::zeros(&[4], (Kind::Float, Device::Cpu))
        );
        assert!(module.kernel().requires_grad());
    }

    #[test]
    fn forward_known_values() {
        let vs = VarStore::new(Device::Cpu);
        let module = LinearConfig::constant(2.0).build_module(
            &vs.root(),
            2,
            1,
            &mut Prng::seed_from_u64(0),
        );
        let input = Tensor::of_slice(&[1.0_f32, 3.0]).reshape(&[1, 2]);
        assert_eq!(module.forward(&input).double_value(&[0, 0]), 8.0);
    }
}
