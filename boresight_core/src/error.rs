// boresight_core/src/error.rs

use nalgebra::Vector3;
use thiserror::Error;

/// Every way a frame-graph or gimbal operation can refuse its input.
///
/// All variants are precondition violations by the caller. None of them are
/// transient, and a failed operation never leaves the graph partially modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("unknown frame '{0}'")]
    UnknownFrame(String),

    #[error("parent frame '{0}' is not registered")]
    UnknownParent(String),

    #[error("a frame named '{0}' is already registered")]
    DuplicateName(String),

    #[error("the root frame '{0}' is inertial and cannot be moved")]
    RootIsFixed(String),

    #[error("frame '{0}' turns about its parent's origin and cannot be given a position offset")]
    RotationOnly(String),

    /// The target sits on the gimbal's center of rotation (or is not finite),
    /// so there is no pointing direction.
    #[error(
        "target at ({}, {}, {}) in the housing frame has no pointing direction",
        .target.x, .target.y, .target.z
    )]
    DegenerateTarget { target: Vector3<f64> },

    #[error("gimbal '{0}' tracks a target but none was supplied")]
    MissingTarget(String),

    #[error("invalid euler sequence: {0}")]
    InvalidEulerSequence(String),

    #[error("matrix given for '{0}' is not a proper orthonormal rotation")]
    NotARotation(String),
}

pub type Result<T> = std::result::Result<T, TransformError>;
