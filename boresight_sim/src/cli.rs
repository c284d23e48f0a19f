// boresight_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// Boresight: steps a frame tree of gimbals through a target track and reports
/// where every frame is and where every gimbal points.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/mounted_sensor.toml")]
    pub scenario: PathBuf,

    /// Number of update cycles to run. Overrides `simulation.ticks` from the scenario.
    #[arg(short, long)]
    pub ticks: Option<usize>,

    /// Log filter used when `RUST_LOG` is not set (e.g. "debug" or "boresight_core=trace").
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
