// boresight_core/src/config/mod.rs

//! Declarative description of a frame tree and its gimbals, as read from a
//! scenario file, and the code that turns it into a live `FrameGraph`.

pub mod serde_helpers;

use nalgebra::{Rotation3, Vector3};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::frames::{FrameGraph, DEFAULT_ROOT_NAME};
use crate::gimbal::ideal::{IdealGimbal, PointingConvention};
use crate::gimbal::stuck::StuckGimbal;
use crate::gimbal::{Gimbal, GimbalModel};
use crate::math::{checked_rotation_from_rows, rotation_from_euler_deg};

fn default_root() -> String {
    DEFAULT_ROOT_NAME.to_string()
}

/// The root of a frame-tree description.
///
/// Frames are registered in the order listed, so a frame's parent must appear
/// before it. Gimbals are attached after every frame is in place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameTreeConfig {
    #[serde(default = "default_root")]
    pub root: String,

    // The TOML has `[[tree.frames]]`, which becomes a Vec of FrameConfig structs.
    #[serde(default)]
    pub frames: Vec<FrameConfig>,

    #[serde(default)]
    pub gimbals: Vec<GimbalConfig>,
}

impl Default for FrameTreeConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            frames: Vec::new(),
            gimbals: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameConfig {
    pub name: String,
    /// Defaults to the tree's root.
    #[serde(default)]
    pub parent: Option<String>,
    /// Origin relative to the parent's origin, in parent axes.
    #[serde(with = "serde_helpers::vec3_f64_array", default)]
    pub position: Vector3<f64>,
    /// Rotation from parent (parent-expressed vectors in, frame-expressed out).
    #[serde(default)]
    pub rotation: RotationConfig,
}

/// The named rotation presets accepted where a rotation is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPreset {
    #[default]
    Identity,
}

/// A rotation as written in a config file: `"identity"`, an euler sequence in
/// degrees (`{ euler = "yz", degrees = [180, 30] }`) or explicit matrix rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RotationConfig {
    Preset(RotationPreset),
    Euler(EulerRotation),
    Rows(RowRotation),
}

/// Lowercase axes are extrinsic, uppercase intrinsic; one angle per axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EulerRotation {
    pub euler: String,
    pub degrees: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowRotation {
    pub rows: [[f64; 3]; 3],
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self::Preset(RotationPreset::Identity)
    }
}

impl RotationConfig {
    /// Builds the rotation. `label` names the owning frame in errors.
    pub fn resolve(&self, label: &str) -> Result<Rotation3<f64>> {
        match self {
            Self::Preset(RotationPreset::Identity) => Ok(Rotation3::identity()),
            Self::Euler(EulerRotation { euler, degrees }) => rotation_from_euler_deg(euler, degrees),
            Self::Rows(RowRotation { rows }) => checked_rotation_from_rows(rows, label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GimbalConfig {
    /// Name of the gimbal frame to create.
    pub name: String,
    /// Existing frame the gimbal is mounted in.
    pub housing: String,
    pub policy: GimbalPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind")] // `kind = "stuck"` or `kind = "ideal"` picks the variant
#[serde(rename_all = "snake_case")]
pub enum GimbalPolicy {
    Stuck {
        #[serde(default)]
        rotation: RotationConfig,
    },
    Ideal {
        #[serde(default)]
        convention: PointingConvention,
    },
}

impl GimbalPolicy {
    pub fn build_model(&self, label: &str) -> Result<Box<dyn GimbalModel>> {
        Ok(match self {
            Self::Stuck { rotation } => Box::new(StuckGimbal::new(rotation.resolve(label)?)),
            Self::Ideal { convention } => Box::new(IdealGimbal::new(convention.clone())),
        })
    }
}

impl FrameTreeConfig {
    /// Registers every frame, then attaches every gimbal. Stops at the first error.
    pub fn build(&self) -> Result<(FrameGraph, Vec<Gimbal>)> {
        let mut graph = FrameGraph::new(self.root.clone());

        for frame in &self.frames {
            let parent = frame.parent.as_deref().unwrap_or(&self.root);
            let rotation = frame.rotation.resolve(&frame.name)?;
            graph.add_frame(frame.name.clone(), parent, frame.position, rotation)?;
        }

        let mut gimbals = Vec::with_capacity(self.gimbals.len());
        for config in &self.gimbals {
            let model = config.policy.build_model(&config.name)?;
            gimbals.push(Gimbal::attach(
                &mut graph,
                config.name.clone(),
                config.housing.clone(),
                model,
            )?);
        }

        debug!(
            root = %self.root,
            frames = graph.frame_count(),
            gimbals = gimbals.len(),
            "frame tree built"
        );
        Ok((graph, gimbals))
    }
}
