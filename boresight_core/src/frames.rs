// boresight_core/src/frames.rs

use nalgebra::{IsometryMatrix3, Rotation3, Translation3, Vector3};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::error::{Result, TransformError};
use crate::types::TfProvider;

pub mod point;

/// Name given to the root frame by `FrameGraph::default()`.
pub const DEFAULT_ROOT_NAME: &str = "BaseNED";

// --- A cheap, copyable identifier for a registered frame ---
// It is the frame's slot in the graph's arena. Handles are only meaningful for the
// graph that issued them; frames are never removed, so a handle never dangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FrameHandle(pub usize);

impl FrameHandle {
    /// The root frame always occupies the first slot.
    pub const ROOT: FrameHandle = FrameHandle(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// A named coordinate frame and its offset from its parent.
///
/// Only the parent-relative offset is stored. Anything relative to the root is
/// derived by `FrameGraph` on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    name: String,
    /// `None` only for the root frame.
    parent: Option<FrameHandle>,
    /// The frame's origin, expressed in the parent's axes.
    position_in_parent: Vector3<f64>,
    /// Converts parent-expressed vectors into this frame's axes.
    rotation_from_parent: Rotation3<f64>,
    /// Pinned to the parent's origin; only the rotation may change (gimbals).
    rotation_only: bool,
}

impl Frame {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<FrameHandle> {
        self.parent
    }

    pub fn position_in_parent(&self) -> &Vector3<f64> {
        &self.position_in_parent
    }

    pub fn rotation_from_parent(&self) -> &Rotation3<f64> {
        &self.rotation_from_parent
    }

    pub fn is_rotation_only(&self) -> bool {
        self.rotation_only
    }

    /// The rigid transform taking coordinates expressed in this frame to coordinates
    /// expressed in the parent: `p_parent = Rᵀ * p_self + position_in_parent`.
    pub fn pose_in_parent(&self) -> IsometryMatrix3<f64> {
        IsometryMatrix3::from_parts(
            Translation3::from(self.position_in_parent),
            self.rotation_from_parent.transpose(),
        )
    }
}

/// The hierarchy of frames, anchored at a fixed inertial root.
///
/// Frames live in an arena indexed by `FrameHandle`. A frame can only be added under
/// a parent that is already registered, so every parent sits at a lower index than
/// its children and the parent relation can never form a cycle.
#[derive(Debug, Clone)]
pub struct FrameGraph {
    frames: Vec<Frame>,
    index: HashMap<String, FrameHandle>,
    /// Bumped on every successful mutation. Snapshots record the value they were
    /// taken at so readers can tell when they are stale.
    revision: u64,
}

impl Default for FrameGraph {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }
}

impl FrameGraph {
    /// Creates a graph holding only the root frame: identity rotation, at the origin.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Frame {
            name: root_name.into(),
            parent: None,
            position_in_parent: Vector3::zeros(),
            rotation_from_parent: Rotation3::identity(),
            rotation_only: false,
        };
        let index = HashMap::from([(root.name.clone(), FrameHandle::ROOT)]);
        Self {
            frames: vec![root],
            index,
            revision: 0,
        }
    }

    pub fn root_name(&self) -> &str {
        &self.frames[FrameHandle::ROOT.0].name
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of registered frames, root included.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn handle(&self, name: &str) -> Result<FrameHandle> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| TransformError::UnknownFrame(name.to_string()))
    }

    pub fn frame(&self, name: &str) -> Result<&Frame> {
        self.handle(name).map(|h| &self.frames[h.0])
    }

    /// Looks a frame up by handle. Handles from another graph may be out of range.
    pub fn frame_by_handle(&self, handle: FrameHandle) -> Option<&Frame> {
        self.frames.get(handle.0)
    }

    /// All frames in declaration order. Parents always come before their children.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// The parent's name, or `None` for the root.
    pub fn parent_of(&self, name: &str) -> Result<Option<&str>> {
        let frame = self.frame(name)?;
        Ok(frame.parent.map(|p| self.frames[p.0].name.as_str()))
    }

    /// The handles from `name` up to and including the root.
    pub fn chain_to_root(&self, name: &str) -> Result<Vec<FrameHandle>> {
        let mut chain = vec![self.handle(name)?];
        while let Some(parent) = self.frames[chain[chain.len() - 1].0].parent {
            chain.push(parent);
        }
        Ok(chain)
    }

    // =========================================================================
    // == Mutation ==
    // =========================================================================

    /// Registers a new frame under an existing parent.
    ///
    /// Fails with `DuplicateName` if `name` is taken (checked first), or with
    /// `UnknownParent` if `parent` is not registered. The graph is unchanged on
    /// failure.
    pub fn add_frame(
        &mut self,
        name: impl Into<String>,
        parent: &str,
        position_in_parent: Vector3<f64>,
        rotation_from_parent: Rotation3<f64>,
    ) -> Result<FrameHandle> {
        self.insert(name.into(), parent, position_in_parent, rotation_from_parent, false)
    }

    /// Registers a frame pinned to its parent's origin, such as a gimbal in its
    /// housing. Its position offset is zero and stays zero: `update_offset` refuses
    /// any other value with `RotationOnly`.
    pub fn add_rotating_frame(
        &mut self,
        name: impl Into<String>,
        parent: &str,
        rotation_from_parent: Rotation3<f64>,
    ) -> Result<FrameHandle> {
        self.insert(name.into(), parent, Vector3::zeros(), rotation_from_parent, true)
    }

    fn insert(
        &mut self,
        name: String,
        parent: &str,
        position_in_parent: Vector3<f64>,
        rotation_from_parent: Rotation3<f64>,
        rotation_only: bool,
    ) -> Result<FrameHandle> {
        if self.index.contains_key(&name) {
            return Err(TransformError::DuplicateName(name));
        }
        let parent_handle = self
            .index
            .get(parent)
            .copied()
            .ok_or_else(|| TransformError::UnknownParent(parent.to_string()))?;

        let handle = FrameHandle(self.frames.len());
        debug!(frame = %name, parent, rotation_only, "registering frame");
        self.index.insert(name.clone(), handle);
        self.frames.push(Frame {
            name,
            parent: Some(parent_handle),
            position_in_parent,
            rotation_from_parent,
            rotation_only,
        });
        self.revision += 1;
        Ok(handle)
    }

    /// Overwrites a frame's offset from its parent. The root cannot be moved, and a
    /// rotation-only frame only accepts a zero position.
    pub fn update_offset(
        &mut self,
        name: &str,
        position_in_parent: Vector3<f64>,
        rotation_from_parent: Rotation3<f64>,
    ) -> Result<()> {
        let frame = self.frame_mut(name)?;
        if frame.rotation_only && position_in_parent != Vector3::zeros() {
            return Err(TransformError::RotationOnly(name.to_string()));
        }
        frame.position_in_parent = position_in_parent;
        frame.rotation_from_parent = rotation_from_parent;
        self.revision += 1;
        trace!(frame = name, revision = self.revision, "offset updated");
        Ok(())
    }

    /// Overwrites only the rotational part of a frame's offset.
    pub fn update_rotation(&mut self, name: &str, rotation_from_parent: Rotation3<f64>) -> Result<()> {
        let frame = self.frame_mut(name)?;
        frame.rotation_from_parent = rotation_from_parent;
        self.revision += 1;
        trace!(frame = name, revision = self.revision, "rotation updated");
        Ok(())
    }

    fn frame_mut(&mut self, name: &str) -> Result<&mut Frame> {
        let handle = self.handle(name)?;
        if handle.is_root() {
            return Err(TransformError::RootIsFixed(name.to_string()));
        }
        Ok(&mut self.frames[handle.0])
    }

    // =========================================================================
    // == Root-relative composition ==
    // =========================================================================

    /// Composes parent offsets from the root down to `handle`.
    ///
    /// Always walks the live offsets; nothing is cached between calls, so a query
    /// made after `update_offset` can never see the old pose. Use
    /// `TfSnapshot::capture` to evaluate many frames against one state of the graph.
    pub fn pose_in_root_by_handle(&self, handle: FrameHandle) -> Option<IsometryMatrix3<f64>> {
        let mut frame = self.frames.get(handle.0)?;
        let mut pose = frame.pose_in_parent();
        while let Some(parent) = frame.parent {
            frame = &self.frames[parent.0];
            pose = frame.pose_in_parent() * pose;
        }
        Some(pose)
    }
}

impl TfProvider for FrameGraph {
    fn pose_in_root(&self, frame: &str) -> Result<IsometryMatrix3<f64>> {
        let handle = self.handle(frame)?;
        self.pose_in_root_by_handle(handle)
            .ok_or_else(|| TransformError::UnknownFrame(frame.to_string()))
    }
}
