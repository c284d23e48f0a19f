// boresight_core/src/context.rs

use nalgebra::IsometryMatrix3;
use std::collections::HashMap;

use crate::error::{Result, TransformError};
use crate::frames::{FrameGraph, FrameHandle};
use crate::types::TfProvider;

/// One frame's entry in a snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    pub name: String,
    pub parent: Option<FrameHandle>,
    /// Pose relative to the root frame (see `TfProvider::pose_in_root`).
    pub pose_in_root: IsometryMatrix3<f64>,
}

/// An immutable picture of every frame's root-relative pose, taken at one
/// revision of a `FrameGraph`.
///
/// Capturing costs one pass over the arena: frames are stored parent-first, so each
/// pose is its parent's (already computed) pose times its own offset. This is what
/// an update cycle hands to readers; it never changes after capture, so a reader
/// holding one sees a consistent state even while the next cycle mutates the graph.
#[derive(Debug, Clone)]
pub struct TfSnapshot {
    /// Root-relative poses, indexed by `FrameHandle`.
    entries: Vec<SnapshotEntry>,
    index: HashMap<String, FrameHandle>,
    revision: u64,
}

impl TfSnapshot {
    pub fn capture(graph: &FrameGraph) -> Self {
        let mut entries: Vec<SnapshotEntry> = Vec::with_capacity(graph.frame_count());
        for frame in graph.frames() {
            let local = frame.pose_in_parent();
            let pose_in_root = match frame.parent() {
                Some(parent) => entries[parent.0].pose_in_root * local,
                None => local,
            };
            entries.push(SnapshotEntry {
                name: frame.name().to_string(),
                parent: frame.parent(),
                pose_in_root,
            });
        }
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), FrameHandle(i)))
            .collect();

        Self {
            entries,
            index,
            revision: graph.revision(),
        }
    }

    /// The graph revision this snapshot was taken at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// `false` once the graph has been mutated after capture.
    pub fn is_current(&self, graph: &FrameGraph) -> bool {
        self.revision == graph.revision()
    }

    /// Entries in the graph's declaration order.
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn parent_name(&self, entry: &SnapshotEntry) -> Option<&str> {
        entry
            .parent
            .and_then(|p| self.entries.get(p.0))
            .map(|p| p.name.as_str())
    }
}

impl TfProvider for TfSnapshot {
    fn pose_in_root(&self, frame: &str) -> Result<IsometryMatrix3<f64>> {
        self.index
            .get(frame)
            .map(|h| self.entries[h.0].pose_in_root)
            .ok_or_else(|| TransformError::UnknownFrame(frame.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rotation_from_euler_deg;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn graph() -> FrameGraph {
        let mut graph = FrameGraph::new("World");
        graph
            .add_frame(
                "A",
                "World",
                Vector3::new(1.0, 2.0, 3.0),
                rotation_from_euler_deg("z", &[40.0]).unwrap(),
            )
            .unwrap();
        graph
            .add_frame(
                "B",
                "A",
                Vector3::new(-2.0, 0.5, 0.0),
                rotation_from_euler_deg("xy", &[10.0, 75.0]).unwrap(),
            )
            .unwrap();
        graph
            .add_frame(
                "C",
                "World",
                Vector3::new(0.0, 0.0, -4.0),
                rotation_from_euler_deg("y", &[-90.0]).unwrap(),
            )
            .unwrap();
        graph
    }

    #[test]
    fn snapshot_agrees_with_live_graph() {
        let graph = graph();
        let snapshot = TfSnapshot::capture(&graph);
        for frame in graph.frames() {
            let name = frame.name();
            assert_relative_eq!(
                snapshot.pose_in_root(name).unwrap(),
                graph.pose_in_root(name).unwrap(),
                epsilon = 1e-12
            );
        }
        let p = Vector3::new(0.1, 0.2, 0.3);
        assert_relative_eq!(
            snapshot.position_of(&p, "B", "C").unwrap(),
            graph.position_of(&p, "B", "C").unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn snapshot_is_frozen_after_update() {
        let mut graph = graph();
        let snapshot = TfSnapshot::capture(&graph);
        let b_before = snapshot.position_in_root("B").unwrap();
        assert!(snapshot.is_current(&graph));

        graph
            .update_offset("A", Vector3::zeros(), rotation_from_euler_deg("z", &[0.0]).unwrap())
            .unwrap();

        assert!(!snapshot.is_current(&graph));
        assert_relative_eq!(snapshot.position_in_root("B").unwrap(), b_before);
        assert!((graph.position_in_root("B").unwrap() - b_before).norm() > 1.0);

        let fresh = TfSnapshot::capture(&graph);
        assert!(fresh.is_current(&graph));
        assert_relative_eq!(
            fresh.position_in_root("B").unwrap(),
            graph.position_in_root("B").unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn entries_keep_declaration_order_and_parents() {
        let snapshot = TfSnapshot::capture(&graph());
        let names: Vec<_> = snapshot.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["World", "A", "B", "C"]);
        let parents: Vec<_> = snapshot
            .entries()
            .iter()
            .map(|e| snapshot.parent_name(e))
            .collect();
        assert_eq!(parents, [None, Some("World"), Some("A"), Some("World")]);
        assert_eq!(
            snapshot.pose_in_root("D"),
            Err(TransformError::UnknownFrame("D".into()))
        );
    }
}
