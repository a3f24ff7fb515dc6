//! Module test utilities.
use super::{BuildModule, FeedForwardModule};
use crate::torch::optimizers::{BuildOptimizer, OnceOptimizer, SgdConfig};
use crate::Prng;
use rand::SeedableRng;
use std::iter;
use tch::{self, kind::Kind, nn::VarStore, Device, Tensor};

/// Basic structural check of [`FeedForwardModule::forward`].
pub fn check_forward<M: FeedForwardModule>(
    module: &M,
    in_dim: usize,
    out_dim: usize,
    batch_shape: &[usize],
    kind: Kind,
) {
    let _no_grad_guard = tch::no_grad_guard();
    let input_shape: Vec<_> = batch_shape
        .iter()
        .chain(iter::once(&in_dim))
        .map(|&d| d as i64)
        .collect();
    let input = Tensor::ones(&input_shape, (kind, Device::Cpu));
    let output = module.forward(&input);
    let mut output_shape = input_shape;
    *output_shape.last_mut().unwrap() = out_dim as i64;
    assert_eq!(output.size(), output_shape);
}

/// Check that gradient descent improves the output of a forward model.
pub fn check_config_forward_gradient_descent<MC>(config: &MC)
where
    MC: BuildModule,
    MC::Module: FeedForwardModule,
{
    let in_dim = 2;
    let out_dim = 32; // needs to be large enough to avoid all 0 from ReLU by chance
    let kind = Kind::Float;
    let device = Device::Cpu;

    // Input batch consists of a row of zeros and a row of ones.
    let input = Tensor::stack(
        &[
            Tensor::zeros(&[in_dim as i64], (kind, device)),
            Tensor::ones(&[in_dim as i64], (kind, device)),
        ],
        0,
    );
    // Target is the identity function (except dimension size)
    let target = Tensor::stack(
        &[
            Tensor::zeros(&[out_dim as i64], (kind, device)),
            Tensor::ones(&[out_dim as i64], (kind, device)),
        ],
        0,
    );

    let vs = VarStore::new(device);
    let model = config.build_module(&vs.root(), in_dim, out_dim, &mut Prng::seed_from_u64(0));
    let mut optimizer = SgdConfig::default().build_optimizer(&vs).unwrap();

    let initial_output = model.forward(&input);

    let initial_loss = (&initial_output - &target).square().sum(kind);
    optimizer.backward_step_once(&initial_loss);

    let final_output = model.forward(&input);
    assert_ne!(initial_output, final_output);

    let final_loss = (&final_output - &target).square().sum(kind);
    let initial_loss_value = initial_loss.double_value(&[]);
    let final_loss_value = final_loss.double_value(&[]);
    assert!(final_loss_value < initial_loss_value);
}
