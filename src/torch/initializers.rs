//! Tensor initializers
#![allow(clippy::use_self)] // false positive with serde derives
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tch::{Device, Kind, Tensor};

/// Tensor initializers.
///
/// Random initializers draw from a caller-supplied generator rather than the global torch
/// generator so that initialization is reproducible from a seed.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Initializer {
    /// Initialize to all zeros
    Zeros,
    /// Initialize all elements to the given constant value.
    Constant(f64),
    /// Uniform distribution with variance scaled by the tensor dimensions.
    Uniform(VarianceScale),
    /// Normal distribution with variance scaled by the tensor dimensions.
    Normal(VarianceScale),
    /// Normal distribution truncated to ±2 standard deviations.
    ///
    /// The pre-truncation standard deviation is inflated so that the truncated distribution
    /// has the variance given by the scale, as in the Keras `VarianceScaling` initializer.
    TruncatedNormal(VarianceScale),
}

/// Defaults to `Uniform(FanAvg)` a.k.a. Glorot or Xaviar initialization.
///
/// This samples from `Unif(±√(6 / (fan_in + fan_out)))`,
/// the TensorFlow v2 default for dense layer kernels.
impl Default for Initializer {
    fn default() -> Self {
        Self::Uniform(VarianceScale::FanAvg)
    }
}

/// Variance scaling mode.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum VarianceScale {
    /// The initializer sampling variance is set to the given constant.
    Constant(f64),
    /// Scale based on the number of input features.
    ///
    /// The initializer sampling variance is set to `1 / fan_in`.
    /// With a gain of `√2` this is Kaiming or He initialization.
    FanIn,
    /// Scale based on the number of output features.
    ///
    /// The initializer sampling variance is set to `1 / fan_out`.
    FanOut,
    /// Scale based on the average number of input and output features.
    ///
    /// The initializer sampling variance is set to `2 / (fan_in + fan_out)`.
    ///
    /// Also known as Xavier or Glorot initialization.
    FanAvg,
}

impl Default for VarianceScale {
    fn default() -> Self {
        Self::FanIn
    }
}

impl VarianceScale {
    /// Element sampling variance for a tensor of the given shape.
    fn variance(self, shape: &[usize]) -> f64 {
        let (fan_in, fan_out) = calculate_fan_in_and_fan_out(shape);
        match self {
            Self::Constant(v) => v,
            Self::FanIn => (fan_in as f64).recip(),
            Self::FanOut => (fan_out as f64).recip(),
            Self::FanAvg => 2.0 / (fan_in as f64 + fan_out as f64),
        }
    }
}

/// Calculate fan in and fan out for a tensor shape.
///
/// Based on the pytorch function [of the same name][1].
///
/// [1]: https://github.com/pytorch/pytorch/blob/f87f753bb997b2da82f7d2a561ccb40ab4f6bd9d/torch/nn/init.py#L284-L300
fn calculate_fan_in_and_fan_out(shape: &[usize]) -> (usize, usize) {
    // Use feature size of 1 if the dimensions are missing instead of returning an error
    let num_input_fmaps = shape.get(1).copied().unwrap_or(1);
    let num_output_fmaps = shape.get(0).copied().unwrap_or(1);
    let receptive_field_size: usize = if shape.len() >= 2 {
        shape[2..].iter().product()
    } else {
        1
    };
    let fan_in = num_input_fmaps * receptive_field_size;
    let fan_out = num_output_fmaps * receptive_field_size;
    (fan_in, fan_out)
}

/// Standard deviation of a unit normal truncated to `[-2, 2]`.
const TRUNCATED_NORMAL_STDDEV: f64 = 0.879_625_661_034_239_8;

/// Sample from a standard normal distribution truncated to `[-2, 2]` by rejection.
fn sample_truncated_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let x: f64 = StandardNormal.sample(rng);
        if x.abs() <= 2.0 {
            return x;
        }
    }
}

/// Float tensor of the given shape from row-major values.
fn from_values(values: &[f64], shape: &[i64]) -> Tensor {
    Tensor::of_slice(values).reshape(shape).to_kind(Kind::Float)
}

impl Initializer {
    /// Start building a new [`Tensor`] using this initializer.
    ///
    /// See the [`TensorBuilder`] methods for more configuration options.
    #[must_use]
    #[inline]
    pub const fn tensor<'a>(&'a self, shape: &'a [usize]) -> TensorBuilder<'a> {
        TensorBuilder::new(self, shape)
    }
}

/// Builder for initializing a new tensor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TensorBuilder<'a> {
    initializer: &'a Initializer,
    shape: &'a [usize],
    gain: f64,
    requires_grad: bool,
}

impl<'a> TensorBuilder<'a> {
    #[must_use]
    #[inline]
    pub const fn new(initializer: &'a Initializer, shape: &'a [usize]) -> Self {
        Self {
            initializer,
            shape,
            gain: 1.0,
            requires_grad: true,
        }
    }

    /// Build the [`Tensor`], drawing any random values from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Tensor {
        let options = (Kind::Float, Device::Cpu);
        let shape_i64: SmallVec<[i64; 8]> = self.shape.iter().map(|&d| d as i64).collect();
        let numel: usize = self.shape.iter().product();

        let tensor = match &self.initializer {
            Initializer::Zeros => Tensor::zeros(&shape_i64, options),
            Initializer::Constant(v) => Tensor::full(&shape_i64, *v, options),
            Initializer::Uniform(scaling) => {
                let lim = self.gain * (3.0 * scaling.variance(self.shape)).sqrt();
                let values: Vec<f64> = (0..numel).map(|_| rng.gen_range(-lim..=lim)).collect();
                from_values(&values, &shape_i64)
            }
            Initializer::Normal(scaling) => {
                let stddev = self.gain * self.stddev(scaling);
                let values: Vec<f64> = (0..numel)
                    .map(|_| {
                        let x: f64 = StandardNormal.sample(rng);
                        stddev * x
                    })
                    .collect();
                from_values(&values, &shape_i64)
            }
            Initializer::TruncatedNormal(scaling) => {
                let stddev = self.gain * self.stddev(scaling) / TRUNCATED_NORMAL_STDDEV;
                let values: Vec<f64> = (0..numel)
                    .map(|_| stddev * sample_truncated_standard_normal(rng))
                    .collect();
                from_values(&values, &shape_i64)
            }
        };
        tensor.set_requires_grad(self.requires_grad)
    }

    fn stddev(&self, scaling: &VarianceScale) -> f64 {
        scaling.variance(self.shape).sqrt()
    }

    /// Set the gain (scaling factor) on the initialized values.
    ///
    /// Can be used to compensate for the scaling effect of activation functions.
    /// See PyTorch's [`calculate_gain`][1] function for more information.
    ///
    /// [1]: https://pytorch.org/docs/stable/nn.init.html#torch.nn.init.calculate_gain
    #[must_use]
    #[inline]
    pub const fn gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    /// Set whether the tensor requires gradient tracking. Defaults to true.
    #[must_use]
    #[inline]
    pub const fn requires_grad(mut self, requires_grad: bool) -> Self {
        self.requires_grad = requires_grad;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Prng;
    use rand::SeedableRng;

    fn rng() -> Prng {
        Prng::seed_from_u64(0)
    }

    #[test]
    fn zeros() {
        let a = Initializer::Zeros.tensor(&[5]).build(&mut rng());
        assert_eq!(a, Tensor::zeros(&[5], (Kind::Float, Device::Cpu)));
    }

    #[test]
    fn constant() {
        let a = Initializer::Constant(2.0).tensor(&[5]).build(&mut rng());
        assert_eq!(a, Tensor::full(&[5], 2.0, (Kind::Float, Device::Cpu)));
    }

    #[test]
    fn shape() {
        let a = Initializer::default().tensor(&[2, 3]).build(&mut rng());
        assert_eq!(a.size(), [2, 3]);
    }

    #[test]
    fn same_seed_same_values() {
        let init = Initializer::TruncatedNormal(VarianceScale::FanIn);
        let a = init.tensor(&[4, 3]).build(&mut Prng::seed_from_u64(7));
        let b = init.tensor(&[4, 3]).build(&mut Prng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_values() {
        let init = Initializer::Normal(VarianceScale::FanIn);
        let a = init.tensor(&[4, 3]).build(&mut Prng::seed_from_u64(7));
        let b = init.tensor(&[4, 3]).build(&mut Prng::seed_from_u64(8));
        assert_ne!(a, b);
    }

    #[test]
    fn gain() {
        // Unif[-1,1] has a variance of 1/3
        let a = Initializer::Uniform(VarianceScale::Constant(1.0 / 3.0))
            .tensor(&[100])
            .gain(0.1)
            .build(&mut rng());
        let max = a.max().double_value(&[]);
        assert!(max <= 0.1, "{max:?}");
        // 100 random samples from [-0.1, 0.1] should almost certainly have a max > 0.075
        assert!(max >= 0.075, "{max:?}");
    }

    #[test]
    fn fan_in_default() {
        // With default fan_in of 100, max is sqrt(3/100) ~= 0.173
        let a = Initializer::Uniform(VarianceScale::FanIn)
            .tensor(&[1, 100])
            .build(&mut rng());
        let max = a.max().double_value(&[]);
        assert!(max <= 0.174, "{max:?}");
        assert!(max >= 0.173 * 0.75, "{max:?}");
    }

    #[test]
    fn fan_out_default() {
        // With default fan_out of 1, max is sqrt(3/1) ~ 1.73
        let a = Initializer::Uniform(VarianceScale::FanOut)
            .tensor(&[1, 100])
            .build(&mut rng());
        let max = a.max().double_value(&[]);
        assert!(max <= 1.74, "{max:?}");
        assert!(max >= 1.73 * 0.75, "{max:?}");
    }

    #[test]
    fn truncated_normal_bounds() {
        // He normal for fan_in = 1: stddev sqrt(2), truncated at 2 * sqrt(2) / 0.8796
        let a = Initializer::TruncatedNormal(VarianceScale::FanIn)
            .tensor(&[1000, 1])
            .gain(2.0_f64.sqrt())
            .build(&mut rng());
        let bound = 2.0 * 2.0_f64.sqrt() / TRUNCATED_NORMAL_STDDEV;
        assert!(a.abs().max().double_value(&[]) <= bound + 1e-5);
    }

    #[test]
    fn truncated_normal_variance() {
        let a = Initializer::TruncatedNormal(VarianceScale::Constant(4.0))
            .tensor(&[10_000])
            .build(&mut rng())
            .to_kind(Kind::Double);
        let variance = a.square().mean(Kind::Double).double_value(&[]);
        assert!((variance - 4.0).abs() < 0.2, "{variance:?}");
    }

    #[test]
    fn requires_grad_default() {
        let a = Initializer::default().tensor(&[2]).build(&mut rng());
        assert!(a.requires_grad());
    }

    #[test]
    fn requires_grad_false() {
        let a = Initializer::default()
            .tensor(&[2])
            .requires_grad(false)
            .build(&mut rng());
        assert!(!a.requires_grad());
    }

    #[test]
    fn builds_cpu_float() {
        for init in [
            Initializer::Zeros,
            Initializer::Constant(1.0),
            Initializer::default(),
            Initializer::TruncatedNormal(VarianceScale::FanIn),
        ] {
            let a = init.tensor(&[2, 3]).build(&mut rng());
            assert_eq!(a.kind(), Kind::Float);
            assert_eq!(a.device(), Device::Cpu);
        }
    }
}
