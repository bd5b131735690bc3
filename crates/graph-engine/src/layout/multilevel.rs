//! Multilevel layout: coarsen → place → refine.
//!
//! 1. Build `ceil(log2(n))` coarser graphs by pairing nodes. A pair
//!    collapses into one synthetic node placed at the centroid of its
//!    original members and weighted by their count.
//! 2. Scatter the coarsest graph randomly over the canvas.
//! 3. Walk back down: refine each level with force iterations, then
//!    expand every synthetic node into its members around its settled
//!    position.
//!
//! Pairing is greedy in index order (node ids sorted), so identical
//! input and seed always give identical positions.

use super::{forces::refine, random_point};
use crate::config::{Canvas, LayoutConfig};
use crate::model::Point;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const UNASSIGNED: usize = usize::MAX;

/// One level of the hierarchy. Node weights hold the number of original
/// nodes a (possibly synthetic) node stands for; edge weights hold the
/// summed confidence of the links between two groups.
#[derive(Debug, Clone)]
struct Level {
    graph: UnGraph<usize, f32>,
    centroids: Vec<Point>,
}

impl Level {
    fn finest(
        centroids: Vec<Point>,
        links: &[(usize, usize, f32)],
    ) -> Self {
        let mut graph = UnGraph::with_capacity(centroids.len(), links.len());
        for _ in 0..centroids.len() {
            graph.add_node(1);
        }
        for &(a, b, w) in links {
            add_weight(&mut graph, a, b, w);
        }
        Self { graph, centroids }
    }

    fn len(&self) -> usize {
        self.graph.node_count()
    }

    fn size(&self, i: usize) -> usize {
        self.graph[NodeIndex::new(i)]
    }

    fn links(&self) -> Vec<(usize, usize, f32)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
            .collect()
    }
}

fn add_weight(graph: &mut UnGraph<usize, f32>, a: usize, b: usize, w: f32) {
    let (a, b) = (NodeIndex::new(a), NodeIndex::new(b));
    match graph.find_edge(a, b) {
        Some(e) => graph[e] += w,
        None => {
            graph.add_edge(a, b, w);
        }
    }
}

/// `ceil(log2(n))`, at least 1.
pub(super) fn level_count(n: usize) -> usize {
    if n <= 2 {
        1
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

pub(super) fn place(
    n: usize,
    links: &[(usize, usize, f32)],
    seed: u64,
    canvas: &Canvas,
    config: &LayoutConfig,
) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);

    let seeds: Vec<Point> =
        (0..n).map(|_| random_point(&mut rng, canvas)).collect();
    let mut levels = vec![Level::finest(seeds, links)];
    let mut parents: Vec<Vec<usize>> = Vec::new();

    for _ in 0..level_count(n) {
        let Some(current) = levels.last() else { break };
        if current.len() < 2 {
            break;
        }
        let (coarse, parent_of) = coarsen(current, config.semantic_weight);
        if coarse.len() >= current.len() {
            break;
        }
        levels.push(coarse);
        parents.push(parent_of);
    }

    let coarsest = levels.len() - 1;
    tracing::debug!(
        nodes = n,
        levels = levels.len(),
        coarsest_nodes = levels[coarsest].len(),
        "multilevel hierarchy built"
    );

    let mut points: Vec<Point> = (0..levels[coarsest].len())
        .map(|_| random_point(&mut rng, canvas))
        .collect();

    for level in (0..levels.len()).rev() {
        refine(&mut points, &levels[level].links(), level, canvas, config);
        if level > 0 {
            points = expand(
                &points,
                &levels[level],
                &levels[level - 1],
                &parents[level - 1],
                &mut rng,
                canvas,
                config.expansion_jitter,
            );
        }
    }

    points
}

/// Pair each node with its most similar unmatched neighbour, falling back
/// to the next unmatched node in index order. Returns the coarse level and
/// the coarse index of every fine node.
fn coarsen(level: &Level, semantic_weight: f32) -> (Level, Vec<usize>) {
    let n = level.len();
    let mut parent_of = vec![UNASSIGNED; n];
    let mut groups: Vec<Vec<usize>> = Vec::with_capacity(n / 2 + 1);

    for i in 0..n {
        if parent_of[i] != UNASSIGNED {
            continue;
        }
        let partner = best_partner(level, i, &parent_of, semantic_weight)
            .or_else(|| ((i + 1)..n).find(|&j| parent_of[j] == UNASSIGNED));

        let group = groups.len();
        parent_of[i] = group;
        let mut members = vec![i];
        if let Some(j) = partner {
            parent_of[j] = group;
            members.push(j);
        }
        groups.push(members);
    }

    let mut graph = UnGraph::with_capacity(groups.len(), level.graph.edge_count());
    let mut centroids = Vec::with_capacity(groups.len());
    for members in &groups {
        let size: usize = members.iter().map(|&m| level.size(m)).sum();
        let weighted = members.iter().fold(Point::ZERO, |acc, &m| {
            acc + level.centroids[m] * level.size(m) as f32
        });
        graph.add_node(size);
        centroids.push(weighted * (1.0 / size.max(1) as f32));
    }

    let mut merged: BTreeMap<(usize, usize), f32> = BTreeMap::new();
    for e in level.graph.edge_references() {
        let a = parent_of[e.source().index()];
        let b = parent_of[e.target().index()];
        if a != b {
            *merged.entry((a.min(b), a.max(b))).or_insert(0.0) += *e.weight();
        }
    }
    for ((a, b), w) in merged {
        graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), w);
    }

    (Level { graph, centroids }, parent_of)
}

/// Highest scoring unmatched neighbour; ties go to the lower index.
fn best_partner(
    level: &Level,
    i: usize,
    parent_of: &[usize],
    semantic_weight: f32,
) -> Option<usize> {
    let size_i = level.size(i) as f32;
    let mut best: Option<(usize, f32)> = None;

    for e in level.graph.edges(NodeIndex::new(i)) {
        let j = if e.source().index() == i {
            e.target().index()
        } else {
            e.source().index()
        };
        if j == i || parent_of[j] != UNASSIGNED {
            continue;
        }
        let semantic = 1.0 / (1.0 + (size_i - level.size(j) as f32).abs());
        let score = *e.weight() + semantic_weight * semantic;
        let better = match best {
            None => true,
            Some((bj, bs)) => score > bs || (score == bs && j < bj),
        };
        if better {
            best = Some((j, score));
        }
    }

    best.map(|(j, _)| j)
}

/// Spread each synthetic node's members around its settled position.
/// Members are pushed away from the group centroid in the direction of
/// their own centroid, by `jitter`.
fn expand(
    points: &[Point],
    coarse: &Level,
    fine: &Level,
    parent_of: &[usize],
    rng: &mut StdRng,
    canvas: &Canvas,
    jitter: f32,
) -> Vec<Point> {
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
    for (child, &parent) in parent_of.iter().enumerate() {
        members[parent].push(child);
    }

    let mut expanded = vec![Point::ZERO; parent_of.len()];
    for (parent, children) in members.iter().enumerate() {
        if let [only] = children.as_slice() {
            expanded[*only] = points[parent];
            continue;
        }
        for &child in children {
            let direction = (fine.centroids[child] - coarse.centroids[parent])
                .normalized()
                .unwrap_or_else(|| {
                    let angle = rng.random_range(0.0..std::f32::consts::TAU);
                    Point::new(angle.cos(), angle.sin())
                });
            expanded[child] = canvas.clamp(points[parent] + direction * jitter);
        }
    }
    expanded
}
