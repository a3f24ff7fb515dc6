//! Optimizers
mod coptimizer;

pub use coptimizer::{AdamConfig, SgdConfig};

use std::error::Error;
use tch::{nn::VarStore, Tensor};

/// Base optimizer interface
pub trait BaseOptimizer {
    /// Zero out the gradients of all optimized tensors
    fn zero_grad(&mut self);
}

/// Optimizer that minimizes a loss tensor using a single gradient evaluation per step.
///
/// Specifically, each step may use the gradient at the initial point of the step
/// and makes no further gradient evaluations.
pub trait OnceOptimizer: BaseOptimizer {
    /// Perform a loss minimization step (parameter update).
    ///
    /// Uses the existing gradients stored with the parameter tensors.
    ///
    /// Errors are not detected: a NaN gradient silently sets the parameters to NaN.
    fn step_once(&mut self);

    /// Zero the gradients, back-propagate `loss`, and perform an optimization step.
    ///
    /// # Args
    /// * `loss` - Scalar loss tensor. Back-propagation is applied to this tensor to obtain a
    ///     gradient.
    fn backward_step_once(&mut self, loss: &Tensor) {
        self.zero_grad();
        loss.backward();
        self.step_once();
    }
}

/// Build an optimizer
pub trait BuildOptimizer {
    type Optimizer;
    type Error: Error;

    /// Build an optimizer for the trainable variables in a variable store.
    fn build_optimizer(&self, vs: &VarStore) -> Result<Self::Optimizer, Self::Error>;
}

/// Gradients currently stored with each of the given tensors.
///
/// Tensors that have not received a gradient yield an undefined tensor;
/// check with [`Tensor::defined`].
pub fn gradients<'a, I>(tensors: I) -> Vec<Tensor>
where
    I: IntoIterator<Item = &'a Tensor>,
{
    tensors.into_iter().map(Tensor::grad).collect()
}

/// Euclidean norm of the concatenation of all defined gradients.
pub fn global_grad_norm(gradients: &[Tensor]) -> f64 {
    gradients
        .iter()
        .filter(|g| g.defined())
        .map(|g| {
            let norm = g.norm().double_value(&[]);
            norm * norm
        })
        .sum::<f64>()
        .sqrt()
}


#[cfg(test)]
mod tests {
    use super::*;
    use tch::{Device, Kind};

    #[test]
    fn grad_norm_of_known_gradient() {
        let vs = VarStore::new(Device::Cpu);
        let x = vs.root().ones("x", &[2]);
        let y = vs.root().ones("y", &[1]);
        // d/dx (3 * sum(x)) = [3, 3]; y unused so its gradient is undefined
        let loss = (&x * 3.0).sum(Kind::Float);
        loss.backward();
        let grads = gradients([&x, &y]);
        assert!(grads[0].defined());
        assert!(!grads[1].defined());
        assert!((global_grad_norm(&grads) - 18.0_f64.sqrt()).abs() < 1e-5);
    }
}
