// boresight_core/src/types.rs

use nalgebra::{IsometryMatrix3, Point3, Rotation3, Vector3};

use crate::error::Result;
use crate::math::basis_vectors;

// --- Core Trait for Transform Lookups ---
// This is the contract for any object that can answer "where is frame X, and how
// is it oriented, relative to frame Y". The live `FrameGraph` implements it, as does
// the immutable `TfSnapshot` handed to readers between update cycles.
//
// Every query is expressed through root-relative poses, which works for any tree
// shape without a lowest-common-ancestor search.
pub trait TfProvider {
    /// The pose of `frame` in the root frame: the rigid transform that takes
    /// coordinates expressed in `frame` to coordinates expressed in the root.
    /// Its translation is the frame's origin in root, its rotation converts
    /// `frame`-expressed vectors into root-expressed vectors.
    fn pose_in_root(&self, frame: &str) -> Result<IsometryMatrix3<f64>>;

    /// The frame's origin expressed in the root frame.
    fn position_in_root(&self, frame: &str) -> Result<Vector3<f64>> {
        Ok(self.pose_in_root(frame)?.translation.vector)
    }

    /// The rotation converting `frame`-expressed vectors into root-expressed vectors.
    fn rotation_in_root(&self, frame: &str) -> Result<Rotation3<f64>> {
        Ok(self.pose_in_root(frame)?.rotation)
    }

    /// The rigid transform taking point coordinates expressed in `from` to point
    /// coordinates expressed in `to`: `T_to⁻¹ * T_from`.
    fn isometry_between(&self, from: &str, to: &str) -> Result<IsometryMatrix3<f64>> {
        let pose_from = self.pose_in_root(from)?;
        let pose_to = self.pose_in_root(to)?;
        Ok(pose_to.inverse() * pose_from)
    }

    /// Re-expresses a point given relative to `expressed_in`'s origin (in its axes)
    /// relative to `relative_to`'s origin, in `relative_to`'s axes:
    ///
    /// `p_B = R_B⁻¹ * (R_A * p_A + r_A - r_B)`
    fn position_of(
        &self,
        position: &Vector3<f64>,
        expressed_in: &str,
        relative_to: &str,
    ) -> Result<Vector3<f64>> {
        let iso = self.isometry_between(expressed_in, relative_to)?;
        Ok(iso.transform_point(&Point3::from(*position)).coords)
    }

    /// The rotation converting `from`-expressed vectors into `to`-expressed vectors:
    /// `R_to⁻¹ * R_from`.
    fn rotation_between(&self, from: &str, to: &str) -> Result<Rotation3<f64>> {
        let r_from = self.rotation_in_root(from)?;
        let r_to = self.rotation_in_root(to)?;
        Ok(r_to.transpose() * r_from)
    }

    /// Re-expresses a free vector (a direction or offset, no origin) in another frame.
    fn direction_between(
        &self,
        direction: &Vector3<f64>,
        from: &str,
        to: &str,
    ) -> Result<Vector3<f64>> {
        Ok(self.rotation_between(from, to)? * direction)
    }

    /// The frame's `i`, `j`, `k` unit vectors expressed in the root frame.
    fn axes_in_root(&self, frame: &str) -> Result<[Vector3<f64>; 3]> {
        Ok(basis_vectors(&self.rotation_in_root(frame)?))
    }
}
