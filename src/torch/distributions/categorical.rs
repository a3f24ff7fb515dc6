//! Categorical distribution
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;
use tch::Tensor;
use thiserror::Error;

/// Categorical distribution over `0 .. NUM_EVENTS`.
///
/// Wraps a (possibly gradient-tracking) probability tensor.
/// Sampling reads the probabilities out of the tensor and draws from a caller-supplied
/// generator; [`Categorical::prob`] keeps the selected probability connected to the
/// computation graph.
#[derive(Debug)]
pub struct Categorical {
    /// Probability of each event. A tensor of shape `[NUM_EVENTS]`.
    probs: Tensor,
}

impl Categorical {
    /// Initialize from a probability vector.
    ///
    /// `probs` may have any shape containing `NUM_EVENTS` elements (such as `[1, NUM_EVENTS]`
    /// for a single-element batch). The probabilities are not validated until sampled.
    pub fn from_probs(probs: &Tensor) -> Self {
        Self {
            probs: probs.reshape(&[-1]),
        }
    }

    /// Probabilities of all events, read out of the tensor.
    pub fn probabilities(&self) -> Vec<f64> {
        (0..self.probs.size()[0])
            .map(|i| self.probs.double_value(&[i]))
            .collect()
    }

    /// Draw an event index.
    ///
    /// The probabilities are normalized by their sum.
    /// Fails if any probability is negative or NaN, or if all are zero.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, SampleError> {
        let probabilities = self.probabilities();
        match WeightedIndex::new(&probabilities) {
            Ok(distribution) => Ok(distribution.sample(rng)),
            Err(source) => Err(SampleError::InvalidProbabilities {
                probabilities,
                source,
            }),
        }
    }

    /// Probability of an event as a scalar tensor connected to the computation graph.
    pub fn prob(&self, event: usize) -> Tensor {
        self.probs.select(0, event as i64)
    }

    /// Entropy of the distribution in nats.
    pub fn entropy(&self) -> f64 {
        -self
            .probabilities()
            .into_iter()
            .filter(|&p| p > 0.0)
            .map(|p| p * p.ln())
            .sum::<f64>()
    }
}

/// Error sampling from a [`Categorical`] distribution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("invalid probabilities {probabilities:?}")]
    InvalidProbabilities {
        probabilities: Vec<f64>,
        #[source]
        source: WeightedError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Prng;
    use rand::SeedableRng;
    use rstest::rstest;
    use tch::Kind;

    #[test]
    fn from_batch_row() {
        let probs = Tensor::of_slice(&[0.1_f32, 0.2, 0.3, 0.4]).reshape(&[1, 4]);
        let distribution = Categorical::from_probs(&probs);
        let actual = distribution.probabilities();
        assert_eq!(actual.len(), 4);
        for (a, e) in actual.iter().zip([0.1, 0.2, 0.3, 0.4]) {
            assert!((a - e).abs() < 1e-6, "{actual:?}");
        }
    }

    #[test]
    fn sample_frequencies() {
        let probs = Tensor::of_slice(&[0.1_f32, 0.2, 0.3, 0.4]);
        let distribution = Categorical::from_probs(&probs);
        let mut rng = Prng::seed_from_u64(0);
        let num_samples = 10_000;
        let mut counts = [0_usize; 4];
        for _ in 0..num_samples {
            counts[distribution.sample(&mut rng).unwrap()] += 1;
        }
        for (count, p) in counts.iter().zip([0.1, 0.2, 0.3, 0.4]) {
            let freq = *count as f64 / f64::from(num_samples);
            // Standard deviation is at most 0.005
            assert!((freq - p).abs() < 0.025, "{counts:?}");
        }
    }

    #[test]
    fn zero_probability_never_sampled() {
        let probs = Tensor::of_slice(&[0.0_f32, 1.0, 0.0]);
        let distribution = Categorical::from_probs(&probs);
        let mut rng = Prng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(distribution.sample(&mut rng).unwrap(), 1);
        }
    }

    #[rstest]
    #[case(&[0.5, -0.1, 0.6])]
    #[case(&[0.5, f32::NAN, 0.5])]
    #[case(&[0.0, 0.0, 0.0])]
    fn invalid_probabilities(#[case] probs: &[f32]) {
        let distribution = Categorical::from_probs(&Tensor::of_slice(probs));
        let mut rng = Prng::seed_from_u64(2);
        assert!(matches!(
            distribution.sample(&mut rng),
            Err(SampleError::InvalidProbabilities { .. })
        ));
    }

    #[test]
    fn prob_tracks_gradient() {
        let logits = Tensor::zeros(&[3], (Kind::Float, tch::Device::Cpu)).set_requires_grad(true);
        let probs = logits.softmax(-1, Kind::Float);
        let distribution = Categorical::from_probs(&probs);
        let p = distribution.prob(2);
        assert!((p.double_value(&[]) - 1.0 / 3.0).abs() < 1e-6);
        p.backward();
        let grad = logits.grad();
        // d p_2 / d logit_j = p_2 (1[j = 2] - p_j)
        assert!((grad.double_value(&[2]) - 2.0 / 9.0).abs() < 1e-6);
        assert!((grad.double_value(&[0]) + 1.0 / 9.0).abs() < 1e-6);
    }

    #[rstest]
    #[case(&[1.0, 0.0, 0.0], 0.0)]
    #[case(&[0.5, 0.5], std::f64::consts::LN_2)]
    #[case(&[0.25, 0.25, 0.25, 0.25], 4.0_f64.ln())]
    fn entropy(#[case] probs: &[f32], #[case] expected: f64) {
        let distribution = Categorical::from_probs(&Tensor::of_slice(probs));
        assert!((distribution.entropy() - expected).abs() < 1e-6);
    }
}
