// boresight_sim/src/simulation/telemetry.rs

//! Plain-text reports of one tracking cycle, read from a published snapshot.

use nalgebra::Vector3;
use std::fmt;

use boresight_core::math::basis_vectors;
use boresight_core::prelude::*;

/// Where a frame is and how it is oriented, in root coordinates. These are the
/// numbers a plotter needs to draw the frame's origin and its three axes.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub name: String,
    pub parent: Option<String>,
    pub origin: Vector3<f64>,
    /// The frame's `i`, `j`, `k` unit vectors in root axes.
    pub axes: [Vector3<f64>; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct GimbalReport {
    pub name: String,
    pub housing: String,
    pub kind: &'static str,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    /// Angle between the boresight and the line of sight to the target.
    pub pointing_error_deg: f64,
    pub boresight_in_root: Vector3<f64>,
}

impl GimbalReport {
    pub fn collect(
        gimbal: &Gimbal,
        tf: &dyn TfProvider,
        target: &Point,
    ) -> Result<Self, TransformError> {
        let angles = gimbal.angles(tf)?;
        Ok(Self {
            name: gimbal.frame_name().to_string(),
            housing: gimbal.housing_name().to_string(),
            kind: gimbal.model().kind(),
            azimuth_deg: angles.azimuth.to_degrees(),
            elevation_deg: angles.elevation.to_degrees(),
            pointing_error_deg: gimbal.pointing_error(tf, target)?.to_degrees(),
            boresight_in_root: gimbal.boresight_in_root(tf)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GimbalFailure {
    pub gimbal: String,
    pub error: TransformError,
}

/// Everything observed at the end of one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub target: Point,
    /// `None` if the target's frame is not in the tree.
    pub target_in_root: Option<Vector3<f64>>,
    pub frames: Vec<FrameReport>,
    pub gimbals: Vec<GimbalReport>,
    pub failures: Vec<GimbalFailure>,
}

impl TickReport {
    pub fn collect(
        tick: u64,
        snapshot: &TfSnapshot,
        gimbals: &[Gimbal],
        target: &Point,
        mut failures: Vec<GimbalFailure>,
    ) -> Self {
        let frames = snapshot
            .entries()
            .iter()
            .map(|entry| FrameReport {
                name: entry.name.clone(),
                parent: snapshot.parent_name(entry).map(str::to_string),
                origin: entry.pose_in_root.translation.vector,
                axes: basis_vectors(&entry.pose_in_root.rotation),
            })
            .collect();

        let mut reports = Vec::with_capacity(gimbals.len());
        for gimbal in gimbals {
            match GimbalReport::collect(gimbal, snapshot, target) {
                Ok(report) => reports.push(report),
                // One entry per gimbal; the update's error comes first.
                Err(error) => {
                    if !failures.iter().any(|f| f.gimbal == gimbal.frame_name()) {
                        failures.push(GimbalFailure {
                            gimbal: gimbal.frame_name().to_string(),
                            error,
                        });
                    }
                }
            }
        }

        Self {
            tick,
            target: target.clone(),
            target_in_root: target.in_root(snapshot).ok(),
            frames,
            gimbals: reports,
            failures,
        }
    }
}

struct Vec3<'a>(&'a Vector3<f64>);

impl fmt::Display for Vec3<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:8.3}, {:8.3}, {:8.3})", self.0.x, self.0.y, self.0.z)
    }
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {}: target {} in {}",
            self.tick,
            Vec3(&self.target.position),
            self.target.frame
        )?;
        if let Some(root) = &self.target_in_root {
            write!(f, " = {} in root", Vec3(root))?;
        }
        writeln!(f)?;

        for frame in &self.frames {
            writeln!(
                f,
                "  frame  {:<12} parent {:<12} origin {}  i {}  j {}  k {}",
                frame.name,
                frame.parent.as_deref().unwrap_or("-"),
                Vec3(&frame.origin),
                Vec3(&frame.axes[0]),
                Vec3(&frame.axes[1]),
                Vec3(&frame.axes[2]),
            )?;
        }
        for gimbal in &self.gimbals {
            writeln!(
                f,
                "  gimbal {:<12} [{}] in {}: az {:8.3} deg  el {:8.3} deg  error {:8.3} deg  boresight {}",
                gimbal.name,
                gimbal.kind,
                gimbal.housing,
                gimbal.azimuth_deg,
                gimbal.elevation_deg,
                gimbal.pointing_error_deg,
                Vec3(&gimbal.boresight_in_root),
            )?;
        }
        for failure in &self.failures {
            writeln!(f, "  failed {:<12} {}", failure.gimbal, failure.error)?;
        }
        Ok(())
    }
}
