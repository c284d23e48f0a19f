// boresight_sim/src/main.rs

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use boresight_sim::prelude::*;

fn main() -> ExitCode {
    let cli = Cli::parse();
    boresight_sim::init_tracing(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), SimError> {
    info!("Loading scenario from: {}", cli.scenario.display());
    let scenario = ScenarioConfig::load(&cli.scenario)?;
    let ticks = cli.ticks.unwrap_or(scenario.simulation.ticks);

    let mut tracking = TrackingLoop::from_config(&scenario)?;
    info!(
        frames = tracking.graph().frame_count(),
        gimbals = tracking.gimbals().len(),
        ticks,
        "scenario ready"
    );

    for _ in 0..ticks {
        let report = tracking.step();
        println!("{report}");
    }
    Ok(())
}
