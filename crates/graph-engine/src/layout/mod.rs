//! Layout pipeline: turns a visible subgraph into target positions.
//!
//! Three modes are available:
//! - `force`: seeded random placement refined by a single level of
//!   force iterations
//! - `hierarchical`: deterministic rows, one per node kind
//! - `multilevel`: coarsen, place the coarsest graph, then refine back
//!   down level by level
//!
//! Every mode is deterministic for a given input and seed.

mod forces;
mod hierarchical;
mod multilevel;

use crate::config::{Canvas, LayoutConfig};
use crate::ix_map::IxMap;
use crate::model::{Edge, Node, NodeId, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use forces::refine;

/// Target position per node id.
pub type Positions = BTreeMap<NodeId, Point>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error(
        "unknown layout mode '{0}' (expected force, hierarchical or multilevel)"
    )]
    UnknownMode(String),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Force,
    Hierarchical,
    #[default]
    Multilevel,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 3] = [
        LayoutMode::Force,
        LayoutMode::Hierarchical,
        LayoutMode::Multilevel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutMode::Force => "force",
            LayoutMode::Hierarchical => "hierarchical",
            LayoutMode::Multilevel => "multilevel",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LayoutError::UnknownMode(s.to_string()))
    }
}

/// Compute target positions for `nodes`.
///
/// Edges whose endpoints are not all in `nodes` are ignored. An empty
/// node list gives an empty map and a single node sits at the canvas
/// centre.
pub fn layout(
    nodes: &[Node],
    edges: &[Edge],
    mode: LayoutMode,
    seed: u64,
    canvas: &Canvas,
    config: &LayoutConfig,
) -> Positions {
    if nodes.is_empty() {
        return Positions::new();
    }
    if nodes.len() == 1 {
        return Positions::from([(nodes[0].id.clone(), canvas.center())]);
    }

    let ids = IxMap::from_sorted(nodes.iter().map(|n| n.id.clone()));
    let links = index_links(&ids, edges);

    let points = match mode {
        LayoutMode::Hierarchical => {
            hierarchical::place(nodes, &ids, canvas)
        }
        LayoutMode::Force => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut points: Vec<Point> = (0..ids.len())
                .map(|_| random_point(&mut rng, canvas))
                .collect();
            refine(&mut points, &links, 0, canvas, config);
            points
        }
        LayoutMode::Multilevel => {
            multilevel::place(ids.len(), &links, seed, canvas, config)
        }
    };

    tracing::debug!(
        mode = %mode,
        nodes = ids.len(),
        links = links.len(),
        seed,
        "layout computed"
    );

    ids.values().iter().cloned().zip(points).collect()
}

/// Weighted undirected links between node indices. Hyperedges link each
/// consecutive pair of endpoints. Self links are skipped.
fn index_links(
    ids: &IxMap<NodeId>,
    edges: &[Edge],
) -> Vec<(usize, usize, f32)> {
    let mut links = Vec::new();
    for edge in edges {
        let Some(endpoints) = edge
            .endpoints()
            .map(|id| ids.index_of(id))
            .collect::<Option<Vec<usize>>>()
        else {
            continue;
        };
        let weight = edge.confidence.max(0.0) as f32;
        for pair in endpoints.windows(2) {
            if pair[0] != pair[1] {
                links.push((pair[0], pair[1], weight));
            }
        }
    }
    links
}

pub(crate) fn random_point(rng: &mut StdRng, canvas: &Canvas) -> Point {
    let (x_lo, x_hi) = axis_range(canvas.margin, canvas.width);
    let (y_lo, y_hi) = axis_range(canvas.margin, canvas.height);
    Point::new(rng.random_range(x_lo..=x_hi), rng.random_range(y_lo..=y_hi))
}

fn axis_range(margin: f32, extent: f32) -> (f32, f32) {
    let hi = extent - margin;
    if hi >= margin {
        (margin, hi)
    } else {
        (extent / 2.0, extent / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeKind, NodeKind};

    fn ring(n: usize) -> (Vec<Node>, Vec<Edge>) {
        let nodes: Vec<Node> = (0..n)
            .map(|i| {
                Node::new(
                    format!("n{i:02}"),
                    format!("Node {i}"),
                    NodeKind::ALL[i % 3],
                    0.5,
                )
            })
            .collect();
        let edges = (0..n)
            .map(|i| {
                Edge::new(
                    format!("n{i:02}"),
                    format!("n{:02}", (i + 1) % n),
                    EdgeKind::Direct,
                    0.8,
                )
            })
            .collect();
        (nodes, edges)
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("force".parse::<LayoutMode>(), Ok(LayoutMode::Force));
        assert_eq!("Multilevel".parse::<LayoutMode>(), Ok(LayoutMode::Multilevel));
        assert_eq!(
            "spiral".parse::<LayoutMode>(),
            Err(LayoutError::UnknownMode("spiral".to_string()))
        );
    }

    #[test]
    fn test_empty_and_single_node() {
        let canvas = Canvas::default();
        let config = LayoutConfig::default();

        let empty =
            layout(&[], &[], LayoutMode::Multilevel, 7, &canvas, &config);
        assert!(empty.is_empty());

        let single = [Node::new("only", "Only", NodeKind::Input, 1.0)];
        let placed =
            layout(&single, &[], LayoutMode::Force, 7, &canvas, &config);
        assert_eq!(placed["only"], canvas.center());
    }

    #[test]
    fn test_every_mode_places_every_node_inside_canvas() {
        let (nodes, edges) = ring(12);
        let canvas = Canvas::default();
        let config = LayoutConfig::default();

        for mode in LayoutMode::ALL {
            let placed = layout(&nodes, &edges, mode, 42, &canvas, &config);
            assert_eq!(placed.len(), nodes.len(), "mode {mode}");
            for (id, p) in &placed {
                assert!(p.is_finite(), "{id} not finite in {mode}");
                assert!(canvas.contains(*p), "{id} outside canvas in {mode}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let (nodes, edges) = ring(20);
        let canvas = Canvas::default();
        let config = LayoutConfig::default();

        for mode in LayoutMode::ALL {
            let a = layout(&nodes, &edges, mode, 99, &canvas, &config);
            let b = layout(&nodes, &edges, mode, 99, &canvas, &config);
            assert_eq!(a, b, "mode {mode}");
        }
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let (nodes, edges) = ring(9);
        let mut reversed = nodes.clone();
        reversed.reverse();
        let canvas = Canvas::default();
        let config = LayoutConfig::default();

        let a = layout(&nodes, &edges, LayoutMode::Multilevel, 3, &canvas, &config);
        let b =
            layout(&reversed, &edges, LayoutMode::Multilevel, 3, &canvas, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hyperedge_links_consecutive_endpoints() {
        let ids = IxMap::from_sorted(
            ["a", "b", "c"].map(String::from).into_iter(),
        );
        let edges = [
            Edge::new("a", "c", EdgeKind::Hyperedge, 0.5).with_via(["b"]),
            Edge::new("a", "missing", EdgeKind::Direct, 0.5),
        ];

        let links = index_links(&ids, &edges);
        assert_eq!(links, vec![(0, 1, 0.5), (1, 2, 0.5)]);
    }
}
