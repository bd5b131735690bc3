// Graph model - nodes, edges and the points the layout works in

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::path::Path;

// ------------------------------------------------------------------
// Geometry
// ------------------------------------------------------------------

/// A point (or displacement) on the layout canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Point) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    pub fn normalized(self) -> Option<Point> {
        let len = self.length();
        if len > f32::EPSILON {
            Some(Point::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// Counter-clockwise perpendicular.
    pub fn perp(self) -> Point {
        Point::new(-self.y, self.x)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

// ------------------------------------------------------------------
// Nodes and edges
// ------------------------------------------------------------------

/// Stable node identifier, unique within a graph.
pub type NodeId = String;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Input,
    Output,
    Context,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] =
        [NodeKind::Input, NodeKind::Output, NodeKind::Context];

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::Context => "context",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Direct,
    Hyperedge,
    Temporal,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 3] =
        [EdgeKind::Direct, EdgeKind::Hyperedge, EdgeKind::Temporal];

    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Direct => "direct",
            EdgeKind::Hyperedge => "hyperedge",
            EdgeKind::Temporal => "temporal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub confidence: f64,
}

impl Node {
    pub fn new(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        kind: NodeKind,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub confidence: f64,
    /// Intermediate endpoints of a hyperedge, in order between
    /// `source` and `target`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<NodeId>,
}

impl Edge {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        kind: EdgeKind,
        confidence: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            confidence,
            via: Vec::new(),
        }
    }

    pub fn with_via<I, S>(mut self, via: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.via = via.into_iter().map(Into::into).collect();
        self
    }

    /// All endpoints in order: source, via..., target.
    pub fn endpoints(&self) -> impl Iterator<Item = &NodeId> {
        std::iter::once(&self.source)
            .chain(self.via.iter())
            .chain(std::iter::once(&self.target))
    }
}

// ------------------------------------------------------------------
// Graph snapshot
// ------------------------------------------------------------------

/// A full graph snapshot as delivered by the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl KnowledgeGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn confidences(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.confidence).collect()
    }
}
