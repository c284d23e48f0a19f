// boresight_sim/src/prelude.rs

// Re-export the entire boresight_core prelude so binaries and tests only need
// one import.
pub use boresight_core::prelude::*;

// Common simulation-specific types.
pub use crate::cli::Cli;
pub use crate::error::SimError;
pub use crate::simulation::config::{ScenarioConfig, SimulationSettings, TargetsConfig};
pub use crate::simulation::telemetry::{FrameReport, GimbalFailure, GimbalReport, TickReport};
pub use crate::simulation::tracking::{TargetTrack, TrackingLoop};
