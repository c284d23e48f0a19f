// boresight_core/src/gimbal/stuck.rs

use nalgebra::Rotation3;

use crate::error::Result;
use crate::gimbal::{GimbalModel, PointingInput};

/// A gimbal frozen at a fixed offset from its housing. Mathematically simple,
/// tactically useless: it ignores the target entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct StuckGimbal {
    rotation_from_housing: Rotation3<f64>,
}

impl StuckGimbal {
    pub fn new(rotation_from_housing: Rotation3<f64>) -> Self {
        Self {
            rotation_from_housing,
        }
    }

    /// Always the rotation given at construction.
    pub fn evaluate(&self) -> Rotation3<f64> {
        self.rotation_from_housing
    }
}

impl GimbalModel for StuckGimbal {
    fn kind(&self) -> &'static str {
        "stuck"
    }

    fn initial_rotation(&self) -> Rotation3<f64> {
        self.rotation_from_housing
    }

    fn evaluate(&self, _input: &PointingInput) -> Result<Rotation3<f64>> {
        Ok(StuckGimbal::evaluate(self))
    }
}
