// boresight_core/src/frames/point.rs
use nalgebra::{Point3, Vector3};

use crate::error::Result;
use crate::types::TfProvider;

/// A location of interest that is not a frame origin, e.g. a target.
///
/// It has no identity of its own: just a position, expressed relative to the origin
/// of `frame` and in `frame`'s axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub position: Vector3<f64>,
    pub frame: String,
}

impl Point {
    pub fn new(position: Vector3<f64>, frame: impl Into<String>) -> Self {
        Self {
            position,
            frame: frame.into(),
        }
    }

    /// The same location, expressed in another frame.
    pub fn express_in(&self, tf: &dyn TfProvider, frame: &str) -> Result<Point> {
        Ok(Point::new(self.offset_from(tf, frame)?, frame))
    }

    /// The vector from `frame`'s origin to this point, in `frame`'s axes
    /// (e.g. the line of sight from a gimbal housing to a target).
    pub fn offset_from(&self, tf: &dyn TfProvider, frame: &str) -> Result<Vector3<f64>> {
        tf.position_of(&self.position, &self.frame, frame)
    }

    /// The point's position in the root frame.
    pub fn in_root(&self, tf: &dyn TfProvider) -> Result<Vector3<f64>> {
        let pose = tf.pose_in_root(&self.frame)?;
        Ok(pose.transform_point(&Point3::from(self.position)).coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::frames::FrameGraph;
    use crate::math::rotation_from_euler_deg;
    use approx::assert_relative_eq;

    fn graph() -> FrameGraph {
        let mut graph = FrameGraph::default();
        graph
            .add_frame(
                "Body",
                "BaseNED",
                Vector3::new(-3.0, 1.0, 0.0),
                rotation_from_euler_deg("y", &[-30.0]).unwrap(),
            )
            .unwrap();
        graph
    }

    #[test]
    fn target_offsets_from_body() {
        // Body-to-target offset, rotated back into root axes, is the plain difference.
        let graph = graph();
        let target = Point::new(Vector3::new(1.0, -2.0, 2.0), "BaseNED");

        let body_to_target_in_body = target.offset_from(&graph, "Body").unwrap();
        let in_root = graph
            .direction_between(&body_to_target_in_body, "Body", "BaseNED")
            .unwrap();
        assert_relative_eq!(in_root, Vector3::new(4.0, -3.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn express_in_round_trips_through_root() {
        let graph = graph();
        let target = Point::new(Vector3::new(0.5, 0.25, -1.0), "Body");
        let in_root = target.express_in(&graph, "BaseNED").unwrap();
        assert_eq!(in_root.frame, "BaseNED");
        assert_relative_eq!(in_root.position, target.in_root(&graph).unwrap(), epsilon = 1e-12);

        let back = in_root.express_in(&graph, "Body").unwrap();
        assert_relative_eq!(back.position, target.position, epsilon = 1e-12);
    }

    #[test]
    fn unknown_frame_is_reported() {
        let graph = graph();
        let target = Point::new(Vector3::x(), "Nowhere");
        assert_eq!(
            target.in_root(&graph),
            Err(TransformError::UnknownFrame("Nowhere".into()))
        );
    }
}
