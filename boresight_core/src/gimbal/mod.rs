// boresight_core/src/gimbal/mod.rs

//! Gimbal pointing models.
//!
//! A gimbal is a frame whose parent is its housing, whose origin coincides with the
//! housing's (zero position offset, always), and whose rotation from the housing is
//! computed by a `GimbalModel` rather than given.

use dyn_clone::DynClone;
use nalgebra::{Rotation3, Vector3};
use std::fmt::Debug;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::frames::{point::Point, FrameGraph};
use crate::math::angle_between;
use crate::types::TfProvider;

pub mod ideal;
pub mod stuck;

/// Everything a model may consult when deciding its orientation.
#[derive(Debug, Clone, Default)]
pub struct PointingInput {
    /// Vector from the housing origin to the target, in housing axes.
    pub target_in_housing: Option<Vector3<f64>>,
}

/// The contract for any gimbal pointing policy: produce the gimbal's rotation from
/// its housing (housing-expressed vectors in, gimbal-expressed vectors out) given
/// the current state of the world.
///
/// New policies are added as new implementations of this trait.
pub trait GimbalModel: DynClone + Debug + Send + Sync {
    /// A short label for logs and reports.
    fn kind(&self) -> &'static str;

    /// Whether `evaluate` needs `PointingInput::target_in_housing`.
    fn tracks_target(&self) -> bool {
        false
    }

    /// The rotation to register the gimbal frame with, before any target is known.
    fn initial_rotation(&self) -> Rotation3<f64> {
        Rotation3::identity()
    }

    /// Computes the gimbal's rotation from its housing.
    fn evaluate(&self, input: &PointingInput) -> Result<Rotation3<f64>>;
}

// This macro generates `Clone` for `Box<dyn GimbalModel>`.
dyn_clone::clone_trait_object!(GimbalModel);

/// Boresight direction as pan/tilt angles, in radians, relative to the housing.
///
/// Housing axes are taken NED-style: +X forward, +Y right, +Z down. Azimuth is
/// positive to the right of +X; elevation is positive above the X-Y plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GimbalAngles {
    pub azimuth: f64,
    pub elevation: f64,
}

impl GimbalAngles {
    pub fn from_direction(direction: &Vector3<f64>) -> Self {
        let horizontal = direction.x.hypot(direction.y);
        Self {
            azimuth: direction.y.atan2(direction.x),
            elevation: (-direction.z).atan2(horizontal),
        }
    }
}

/// A gimbal frame bound to its housing and to the model that orients it.
#[derive(Debug, Clone)]
pub struct Gimbal {
    frame: String,
    housing: String,
    model: Box<dyn GimbalModel>,
}

impl Gimbal {
    /// Registers the gimbal frame under `housing`, co-located with it, at the model's
    /// initial rotation.
    pub fn attach(
        graph: &mut FrameGraph,
        frame: impl Into<String>,
        housing: impl Into<String>,
        model: Box<dyn GimbalModel>,
    ) -> Result<Self> {
        let frame = frame.into();
        let housing = housing.into();
        graph.add_rotating_frame(frame.clone(), &housing, model.initial_rotation())?;
        debug!(gimbal = %frame, housing = %housing, kind = model.kind(), "gimbal attached");
        Ok(Self {
            frame,
            housing,
            model,
        })
    }

    pub fn frame_name(&self) -> &str {
        &self.frame
    }

    pub fn housing_name(&self) -> &str {
        &self.housing
    }

    pub fn model(&self) -> &dyn GimbalModel {
        self.model.as_ref()
    }

    /// Runs one update cycle: read the target relative to the housing, evaluate the
    /// model, write the result back as the gimbal's offset (position stays zero).
    ///
    /// Nothing is written unless every step succeeds. Returns the new rotation.
    pub fn update(&self, graph: &mut FrameGraph, target: Option<&Point>) -> Result<Rotation3<f64>> {
        let target_in_housing = match target {
            Some(point) if self.model.tracks_target() => {
                Some(point.offset_from(&*graph, &self.housing)?)
            }
            None if self.model.tracks_target() => {
                return Err(TransformError::MissingTarget(self.frame.clone()))
            }
            _ => None,
        };

        let rotation = self.model.evaluate(&PointingInput { target_in_housing })?;
        graph.update_offset(&self.frame, Vector3::zeros(), rotation)?;
        debug!(gimbal = %self.frame, kind = self.model.kind(), "gimbal updated");
        Ok(rotation)
    }

    /// The boresight (the gimbal's +X axis) expressed in housing axes.
    pub fn boresight_in_housing(&self, tf: &dyn TfProvider) -> Result<Vector3<f64>> {
        tf.direction_between(&Vector3::x(), &self.frame, &self.housing)
    }

    /// The boresight expressed in root axes.
    pub fn boresight_in_root(&self, tf: &dyn TfProvider) -> Result<Vector3<f64>> {
        Ok(tf.axes_in_root(&self.frame)?[0])
    }

    pub fn angles(&self, tf: &dyn TfProvider) -> Result<GimbalAngles> {
        Ok(GimbalAngles::from_direction(&self.boresight_in_housing(tf)?))
    }

    /// Angle in radians between the boresight and the line of sight to `target`.
    pub fn pointing_error(&self, tf: &dyn TfProvider, target: &Point) -> Result<f64> {
        let line_of_sight = target.offset_from(tf, &self.frame)?;
        Ok(angle_between(&Vector3::x(), &line_of_sight))
    }
}
