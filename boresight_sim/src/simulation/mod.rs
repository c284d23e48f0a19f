// boresight_sim/src/simulation/mod.rs

pub mod config;
pub mod telemetry;
pub mod tracking;
