use super::{Options, Update, WithUpdate};
use crate::agents::{SessionConfig, TrainConfig};
use crate::torch::{AdamConfig, MlpConfig};

impl From<&Options> for SessionConfig {
    fn from(opts: &Options) -> Self {
        Self::default().with_update(opts)
    }
}

impl Update<&Options> for SessionConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(ref arm_means) = opts.arm_means {
            self.arm_means = arm_means.clone();
        }
        if let Some(state) = opts.state {
            self.state = state;
        }
        if let Some(seed) = opts.seed {
            self.seed = Some(seed);
        }
        self.policy.update(opts);
        self.optimizer.update(opts);
    }
}

impl Update<&Options> for MlpConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(ref hidden_sizes) = opts.hidden_sizes {
            self.hidden_sizes = hidden_sizes.clone();
        }
    }
}

impl Update<&Options> for AdamConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(learning_rate) = opts.learning_rate {
            self.learning_rate = learning_rate;
        }
    }
}

impl From<&Options> for TrainConfig {
    fn from(opts: &Options) -> Self {
        Self::default().with_update(opts)
    }
}

impl Update<&Options> for TrainConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(num_iterations) = opts.num_iterations {
            self.num_iterations = num_iterations;
        }
        if let Some(report_period) = opts.report_period {
            self.report_period = report_period;
        }
    }
}
