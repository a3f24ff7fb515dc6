//! Torch modules
mod activation;
mod linear;
mod mlp;
#[cfg(test)]
pub mod testing;

pub use activation::Activation;
pub use linear::{Linear, LinearConfig};
pub use mlp::{Mlp, MlpConfig};

use rand::Rng;
use tch::{nn::Path, Tensor};

/// A torch module with trainable variables.
pub trait Module {
    /// All variables used by the module.
    fn variables(&self) -> Box<dyn Iterator<Item = &Tensor> + '_>;

    /// The subset of [`Module::variables`] that are updated by training.
    fn trainable_variables(&self) -> Box<dyn Iterator<Item = &Tensor> + '_> {
        self.variables()
    }
}

/// A module that maps a batch of input features to a batch of output features.
pub trait FeedForwardModule: Module {
    /// Apply a batched feed-forward transformation.
    ///
    /// # Args
    /// * `input` - A tensor of shape `[BATCH_SHAPE.., in_dim]`.
    ///
    /// # Returns
    /// A tensor of shape `[BATCH_SHAPE.., out_dim]`.
    fn forward(&self, input: &Tensor) -> Tensor;
}

/// Build a [`Module`] with variables registered in a [`VarStore`](tch::nn::VarStore) path.
pub trait BuildModule {
    type Module: Module;

    /// Build a new module instance.
    ///
    /// # Args
    /// * `vs` - Variable store path in which the module variables are created.
    /// * `in_dim` - Number of input features.
    /// * `out_dim` - Number of output features.
    /// * `rng` - Random generator for variable initialization.
    fn build_module<R: Rng + ?Sized>(
        &self,
        vs: &Path,
        in_dim: usize,
        out_dim: usize,
        rng: &mut R,
    ) -> Self::Module;
}
