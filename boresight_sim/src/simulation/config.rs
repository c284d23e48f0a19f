// boresight_sim/src/simulation/config.rs

//! Loading a scenario from disk: the TOML file, overridden by `BORESIGHT_*`
//! environment variables (`BORESIGHT_SIMULATION__TICKS=5`).

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use boresight_core::prelude::{FrameTreeConfig, DEFAULT_ROOT_NAME};

use crate::error::SimError;

/// Prefix for environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "BORESIGHT_";

/// A complete run description, as parsed from a `scenario.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub tree: FrameTreeConfig,

    #[serde(default)]
    pub targets: TargetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    /// Number of update cycles when the command line does not say.
    pub ticks: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self { ticks: 1 }
    }
}

/// Target positions, one per tick, all expressed in `frame`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetsConfig {
    pub frame: String,
    #[serde(default)]
    pub positions: Vec<[f64; 3]>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            frame: DEFAULT_ROOT_NAME.to_string(),
            positions: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    /// Reads `path` and applies environment overrides.
    ///
    /// A missing file is an error here; figment's `Toml::file` alone would treat it
    /// as empty and silently run the defaults.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        if !path.is_file() {
            return Err(SimError::ScenarioNotFound(path.to_path_buf()));
        }
        let config: ScenarioConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        debug!(
            frames = config.tree.frames.len(),
            gimbals = config.tree.gimbals.len(),
            targets = config.targets.positions.len(),
            "scenario parsed"
        );
        Ok(config)
    }
}
