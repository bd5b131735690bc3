//! Damped spring integrator.
//!
//! Every tick moves each body a fixed fraction of the way toward its
//! target:
//!
//! ```text
//! velocity = (target - position) * damping
//! position = clamp(position + velocity)
//! ```
//!
//! There is no inertia term, so for a fixed target the distance shrinks
//! by a factor of `1 - damping` per tick and never overshoots.

use crate::config::{Canvas, IntegratorConfig};
use crate::model::{NodeId, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Animated state of one visible node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Point,
    pub velocity: Point,
    pub target: Point,
}

impl Body {
    /// A body at rest at `position`, heading for `target`.
    pub fn new(position: Point, target: Point) -> Self {
        Self {
            position,
            velocity: Point::ZERO,
            target,
        }
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }
}

/// Position, velocity and target per visible node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    bodies: BTreeMap<NodeId, Body>,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.bodies.get(id).map(|b| b.position)
    }

    pub fn insert(&mut self, id: impl Into<NodeId>, body: Body) {
        self.bodies.insert(id.into(), body);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Body)> {
        self.bodies.iter()
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut BTreeMap<NodeId, Body> {
        &mut self.bodies
    }

    /// Largest remaining distance between a body and its target.
    pub fn max_displacement(&self) -> f32 {
        self.bodies
            .values()
            .map(Body::distance_to_target)
            .fold(0.0, f32::max)
    }

    /// True when every body is within `epsilon` of its target.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.max_displacement() < epsilon
    }
}

impl FromIterator<(NodeId, Body)> for SimulationState {
    fn from_iter<I: IntoIterator<Item = (NodeId, Body)>>(iter: I) -> Self {
        Self {
            bodies: iter.into_iter().collect(),
        }
    }
}

/// Advance every body by one tick.
///
/// `_dt` is accepted so callers can pass frame time, but the update is
/// per tick and does not scale with it.
pub fn step(
    mut state: SimulationState,
    _dt: f32,
    config: &IntegratorConfig,
    canvas: &Canvas,
) -> SimulationState {
    for body in state.bodies.values_mut() {
        body.velocity = (body.target - body.position) * config.damping;
        body.position = canvas.clamp(body.position + body.velocity);
    }
    state
}
