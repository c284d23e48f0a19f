// boresight_core/src/gimbal/ideal.rs

use nalgebra::{Rotation3, Vector3};
use serde::Deserialize;

use crate::config::serde_helpers;
use crate::error::{Result, TransformError};
use crate::gimbal::{GimbalModel, PointingInput};
use crate::math::rotation_from_rows;

/// Targets closer to the pivot than this have no usable pointing direction.
pub const MIN_TARGET_RANGE: f64 = 1e-9;

/// How the Ideal gimbal completes its axis triad once the boresight is fixed.
///
/// The gimbal's +Z axis is chosen along the part of "down" (`-up`) orthogonal to
/// the boresight, and +Y completes the right-handed set. When the boresight is
/// within `parallel_tolerance` of `up`, `fallback_up` is used instead. All vectors
/// are in housing axes and need not be normalized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PointingConvention {
    #[serde(with = "serde_helpers::vec3_f64_array")]
    pub up: Vector3<f64>,
    #[serde(with = "serde_helpers::vec3_f64_array")]
    pub fallback_up: Vector3<f64>,
    /// Minimum length of the rejected "down" component, for unit vectors.
    pub parallel_tolerance: f64,
}

impl Default for PointingConvention {
    /// NED housing: up is -Z, and looking straight up or down the roll reference
    /// becomes the housing's forward axis.
    fn default() -> Self {
        Self {
            up: -Vector3::z(),
            fallback_up: Vector3::x(),
            parallel_tolerance: 1e-6,
        }
    }
}

impl PointingConvention {
    /// A unit vector orthogonal to the unit `boresight`, pointing as "down" as the
    /// convention allows.
    fn down_axis(&self, boresight: &Vector3<f64>) -> Vector3<f64> {
        [self.up, self.fallback_up]
            .iter()
            .filter_map(|up| (-up).try_normalize(f64::EPSILON))
            .find_map(|down| {
                (down - boresight * down.dot(boresight)).try_normalize(self.parallel_tolerance)
            })
            .unwrap_or_else(|| any_orthogonal(boresight))
    }
}

/// Used only when both reference vectors are unusable (zero, or parallel to each
/// other and to the boresight): cross with the least-aligned basis axis.
fn any_orthogonal(v: &Vector3<f64>) -> Vector3<f64> {
    let axis = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vector3::x()
    } else if v.y.abs() <= v.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&axis).normalize()
}

/// A gimbal that always points its boresight (+X) exactly at the target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdealGimbal {
    convention: PointingConvention,
}

impl IdealGimbal {
    pub fn new(convention: PointingConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> &PointingConvention {
        &self.convention
    }

    /// The rotation from housing to gimbal that puts the boresight on the target.
    ///
    /// Fails with `DegenerateTarget` if the target is at the pivot or not finite.
    pub fn evaluate(&self, target_in_housing: &Vector3<f64>) -> Result<Rotation3<f64>> {
        let range = target_in_housing.norm();
        if !range.is_finite() || range <= MIN_TARGET_RANGE {
            return Err(TransformError::DegenerateTarget {
                target: *target_in_housing,
            });
        }

        let x = target_in_housing / range;
        let z = self.convention.down_axis(&x);
        let y = z.cross(&x);

        // Rows of "gimbal from housing" are the gimbal axes in housing coordinates.
        Ok(rotation_from_rows(&[
            [x.x, x.y, x.z],
            [y.x, y.y, y.z],
            [z.x, z.y, z.z],
        ]))
    }
}

impl GimbalModel for IdealGimbal {
    fn kind(&self) -> &'static str {
        "ideal"
    }

    fn tracks_target(&self) -> bool {
        true
    }

    fn evaluate(&self, input: &PointingInput) -> Result<Rotation3<f64>> {
        match &input.target_in_housing {
            Some(target) => IdealGimbal::evaluate(self, target),
            None => Err(TransformError::DegenerateTarget {
                target: Vector3::zeros(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::is_rotation;
    use approx::assert_relative_eq;

    fn assert_points_at(rotation: &Rotation3<f64>, target: &Vector3<f64>) {
        assert!(is_rotation(rotation.matrix(), 1e-9));
        // Boresight in housing axes is the first row.
        let boresight = rotation.transpose() * Vector3::x();
        assert_relative_eq!(boresight, target.normalize(), epsilon = 1e-12);
    }

    #[test]
    fn straight_ahead_is_identity() {
        let r = IdealGimbal::default().evaluate(&Vector3::new(12.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(r, Rotation3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn off_axis_target_keeps_z_down() {
        let target = Vector3::new(3.0, 4.0, -2.0);
        let r = IdealGimbal::default().evaluate(&target).unwrap();
        assert_points_at(&r, &target);

        // Gimbal +Z (third row) has a positive down component.
        let z = r.transpose() * Vector3::z();
        assert!(z.z > 0.0);
        // And it lies in the vertical plane containing the boresight: Y is level.
        let y = r.transpose() * Vector3::y();
        assert_relative_eq!(y.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn looking_straight_up_uses_fallback() {
        for target in [Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 5.0)] {
            let r = IdealGimbal::default().evaluate(&target).unwrap();
            assert_points_at(&r, &target);
        }
        // fallback_up = +X, so "down" is -X.
        let r = IdealGimbal::default().evaluate(&Vector3::new(0.0, 0.0, -1.0)).unwrap();
        assert_relative_eq!(r.transpose() * Vector3::z(), -Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn unusable_convention_still_produces_a_rotation() {
        let convention = PointingConvention {
            up: Vector3::zeros(),
            fallback_up: Vector3::new(0.0, 2.0, 0.0),
            parallel_tolerance: 1e-6,
        };
        let gimbal = IdealGimbal::new(convention);
        let target = Vector3::new(0.0, -7.0, 0.0);
        assert_points_at(&gimbal.evaluate(&target).unwrap(), &target);
    }

    #[test]
    fn custom_up_is_honored() {
        // An ENU-style housing: up is +Z.
        let gimbal = IdealGimbal::new(PointingConvention {
            up: Vector3::z(),
            ..Default::default()
        });
        let r = gimbal.evaluate(&Vector3::new(1.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(r.transpose() * Vector3::z(), -Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(r.transpose() * Vector3::y(), -Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_targets_fail() {
        let gimbal = IdealGimbal::default();
        for target in [
            Vector3::zeros(),
            Vector3::new(1e-12, 0.0, 0.0),
            Vector3::new(f64::NAN, 1.0, 0.0),
            Vector3::new(f64::INFINITY, 0.0, 0.0),
        ] {
            assert!(matches!(
                gimbal.evaluate(&target),
                Err(TransformError::DegenerateTarget { .. })
            ));
        }
        assert_eq!(
            GimbalModel::evaluate(&gimbal, &PointingInput::default()),
            Err(TransformError::DegenerateTarget {
                target: Vector3::zeros()
            })
        );
    }
}
