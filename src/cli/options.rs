//! Command-line options
use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq)]
#[clap(
    name = "discrete-pg",
    author,
    version,
    about = "Train a softmax policy on a multi-armed bandit with REINFORCE"
)]
pub struct Options {
    /// Number of training iterations [default: 10001]
    #[clap(short = 'n', long, help_heading = "TRAINING OPTIONS")]
    pub num_iterations: Option<u64>,

    /// Print a status report every this many iterations (0 disables) [default: 100]
    #[clap(long, help_heading = "TRAINING OPTIONS")]
    pub report_period: Option<u64>,

    /// Random seed. Seeded from system entropy if omitted.
    #[clap(long, help_heading = "TRAINING OPTIONS")]
    pub seed: Option<u64>,

    /// Mean reward of each bandit arm [default: 1.0 0.9 0.9 1.0]
    #[clap(long, multiple_values = true, help_heading = "ENVIRONMENT OPTIONS")]
    pub arm_means: Option<Vec<f64>>,

    /// Value of the constant state [default: 1.0]
    #[clap(long, help_heading = "ENVIRONMENT OPTIONS")]
    pub state: Option<f64>,

    /// Policy hidden layer sizes [default: 5 5]
    #[clap(long, multiple_values = true, help_heading = "POLICY OPTIONS")]
    pub hidden_sizes: Option<Vec<usize>>,

    /// Adam learning rate [default: 0.001]
    #[clap(long, help_heading = "POLICY OPTIONS")]
    pub learning_rate: Option<f64>,

    /// Do not draw the action probability chart on reports
    #[clap(long)]
    pub no_chart: bool,

    /// Aggregate training statistics and display them on each report
    #[clap(long)]
    pub summary: bool,

    /// Enable verbose output
    #[clap(short, long)]
    pub verbose: bool,
}
