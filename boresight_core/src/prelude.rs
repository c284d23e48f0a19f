// boresight_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::gimbal::GimbalModel;
pub use crate::types::TfProvider;

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::context::TfSnapshot;
pub use crate::error::TransformError;
pub use crate::frames::{point::Point, Frame, FrameGraph, FrameHandle, DEFAULT_ROOT_NAME};

// --- Gimbal Policies ---
pub use crate::gimbal::{
    ideal::{IdealGimbal, PointingConvention},
    stuck::StuckGimbal,
    Gimbal, GimbalAngles, PointingInput,
};

// --- Configuration ---
pub use crate::config::{EulerRotation, FrameTreeConfig, GimbalPolicy, RotationConfig, RowRotation};
