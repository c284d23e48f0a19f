// boresight_sim/src/simulation/tracking.rs

use nalgebra::Vector3;
use std::sync::Arc;
use tracing::{debug, warn};

use boresight_core::prelude::*;

use crate::error::SimError;
use crate::simulation::config::{ScenarioConfig, TargetsConfig};
use crate::simulation::telemetry::{GimbalFailure, TickReport};

/// The target's position at each tick, expressed in one frame. Ticks past the end
/// wrap around to the first entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetTrack {
    frame: String,
    positions: Vec<Vector3<f64>>,
}

impl TargetTrack {
    pub fn new(frame: impl Into<String>, positions: Vec<Vector3<f64>>) -> Result<Self, SimError> {
        if positions.is_empty() {
            return Err(SimError::EmptyTargetTrack);
        }
        Ok(Self {
            frame: frame.into(),
            positions,
        })
    }

    pub fn from_config(config: &TargetsConfig) -> Result<Self, SimError> {
        let positions = config.positions.iter().map(|p| Vector3::from(*p)).collect();
        Self::new(config.frame.clone(), positions)
    }

    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always `false`; an empty track cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn at(&self, tick: u64) -> Point {
        let i = (tick % self.positions.len() as u64) as usize;
        Point::new(self.positions[i], self.frame.as_str())
    }
}

/// Owns the live frame graph and runs one update cycle per `step`.
///
/// After every cycle the loop publishes a `TfSnapshot` of the whole tree. Readers
/// clone the `Arc` and keep a consistent picture for as long as they need it, while
/// the loop goes on mutating the graph.
#[derive(Debug)]
pub struct TrackingLoop {
    graph: FrameGraph,
    gimbals: Vec<Gimbal>,
    track: TargetTrack,
    tick: u64,
    snapshot: Arc<TfSnapshot>,
}

impl TrackingLoop {
    pub fn new(graph: FrameGraph, gimbals: Vec<Gimbal>, track: TargetTrack) -> Self {
        let snapshot = Arc::new(TfSnapshot::capture(&graph));
        Self {
            graph,
            gimbals,
            track,
            tick: 0,
            snapshot,
        }
    }

    pub fn from_config(config: &ScenarioConfig) -> Result<Self, SimError> {
        let (graph, gimbals) = config.tree.build()?;
        let track = TargetTrack::from_config(&config.targets)?;
        Ok(Self::new(graph, gimbals, track))
    }

    /// Runs one cycle for every gimbal against this tick's target, publishes the
    /// resulting snapshot and reports on it.
    ///
    /// A gimbal whose cycle fails keeps its previous rotation and is listed in the
    /// report's failures; the others still update.
    pub fn step(&mut self) -> TickReport {
        let target = self.track.at(self.tick);
        let mut failures = Vec::new();

        for gimbal in &self.gimbals {
            if let Err(error) = gimbal.update(&mut self.graph, Some(&target)) {
                warn!(tick = self.tick, gimbal = gimbal.frame_name(), %error, "gimbal update failed");
                failures.push(GimbalFailure {
                    gimbal: gimbal.frame_name().to_string(),
                    error,
                });
            }
        }

        self.snapshot = Arc::new(TfSnapshot::capture(&self.graph));
        debug!(tick = self.tick, revision = self.snapshot.revision(), "snapshot published");

        let report = TickReport::collect(self.tick, &self.snapshot, &self.gimbals, &target, failures);
        self.tick += 1;
        report
    }

    /// The snapshot published by the latest `step` (or at construction).
    pub fn snapshot(&self) -> Arc<TfSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn graph(&self) -> &FrameGraph {
        &self.graph
    }

    /// Direct access for moving non-gimbal frames between steps.
    pub fn graph_mut(&mut self) -> &mut FrameGraph {
        &mut self.graph
    }

    pub fn gimbals(&self) -> &[Gimbal] {
        &self.gimbals
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}
