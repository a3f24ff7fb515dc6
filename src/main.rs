use clap::Parser;
use discrete_pg::cli::Options;
use discrete_pg::logging::CLILogger;
use discrete_pg::{SessionConfig, StepRecord, TrainConfig, TrainingSession};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let opts = Options::parse();
    let session_config = SessionConfig::from(&opts);
    let train_config = TrainConfig::from(&opts);
    if opts.verbose {
        println!("{:#?}", opts);
        println!("Session:\n{:#?}", session_config);
        println!("Training:\n{:#?}", train_config);
    }

    let mut session = TrainingSession::new(&session_config)?;
    if opts.verbose {
        let bandit = session.bandit();
        println!("Bandit: {}", bandit);
        // Chart labels are one-based
        println!("Best action: {}", bandit.best_action() + 1);
    }

    let show_chart = !opts.no_chart;
    let report = |record: &StepRecord| {
        println!("{}", record.status_report());
        if show_chart {
            println!("{}", record.chart());
        }
    };

    let summary = if opts.summary {
        let mut logger = CLILogger::new();
        session.run(&train_config, &mut logger, report)?
    } else {
        session.run(&train_config, &mut (), report)?
    };

    if opts.verbose || opts.summary {
        println!("{}", summary);
    }
    Ok(())
}
