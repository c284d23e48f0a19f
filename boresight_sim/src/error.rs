// boresight_sim/src/error.rs

use boresight_core::prelude::TransformError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario file '{}' does not exist", .0.display())]
    ScenarioNotFound(PathBuf),

    #[error("failed to load scenario: {0}")]
    Config(#[from] figment::Error),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("the target track has no positions")]
    EmptyTargetTrack,
}
