// Filter predicate evaluator - derives the visible subgraph

use crate::kind_set::{EdgeKindSet, NodeKindSet};
use crate::model::{Edge, Node, NodeId};
use crate::stats::ConfidenceStats;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Nodes below this confidence are hidden.
    pub threshold: f64,
    pub node_kinds: NodeKindSet,
    pub edge_kinds: EdgeKindSet,
    /// Case-insensitive label substring; empty matches everything.
    pub search: String,
    /// Nodes above this confidence are hidden.
    pub max_confidence: Option<f64>,
    /// Hide nodes whose confidence is an IQR outlier among all nodes.
    pub hide_outliers: bool,
    /// Show only nodes more than `significance_threshold` standard
    /// deviations from the mean confidence of all nodes.
    pub only_significant: bool,
    pub significance_threshold: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            node_kinds: NodeKindSet::all(),
            edge_kinds: EdgeKindSet::all(),
            search: String::new(),
            max_confidence: None,
            hide_outliers: false,
            only_significant: false,
            significance_threshold: 2.0,
        }
    }
}

impl FilterCriteria {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_node_kinds(mut self, kinds: NodeKindSet) -> Self {
        self.node_kinds = kinds;
        self
    }

    pub fn with_edge_kinds(mut self, kinds: EdgeKindSet) -> Self {
        self.edge_kinds = kinds;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Keep only nodes beyond `sigmas` standard deviations from the mean.
    pub fn with_significance(mut self, sigmas: f64) -> Self {
        self.only_significant = true;
        self.significance_threshold = sigmas;
        self
    }
}

/// The subgraph that passes the current criteria, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl VisibleGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|n| &n.id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

/// Applies `criteria` to a graph. Pure: the same inputs always give the
/// same output.
///
/// Edges referring to unknown node ids are dropped and logged at debug
/// level; they never fail the call.
pub fn filter(
    nodes: &[Node],
    edges: &[Edge],
    criteria: &FilterCriteria,
) -> VisibleGraph {
    let needle = criteria.search.to_lowercase();
    let stats = if criteria.hide_outliers || criteria.only_significant {
        let confidences: Vec<f64> =
            nodes.iter().map(|n| n.confidence).collect();
        ConfidenceStats::from_values(&confidences)
    } else {
        None
    };
    let fences = stats
        .as_ref()
        .filter(|_| criteria.hide_outliers)
        .map(|s| s.quartiles.fences());
    // Same test as `significant_changes`, against the whole graph.
    let band = stats
        .as_ref()
        .filter(|_| criteria.only_significant)
        .map(|s| (s.mean, criteria.significance_threshold * s.std_dev));

    let visible_nodes: Vec<Node> = nodes
        .iter()
        .filter(|node| {
            let matches_search = needle.is_empty()
                || node.label.to_lowercase().contains(&needle);
            let under_ceiling = criteria
                .max_confidence
                .is_none_or(|max| node.confidence <= max);
            let inside_fences = fences.is_none_or(|(lo, hi)| {
                node.confidence >= lo && node.confidence <= hi
            });
            let significant = band.is_none_or(|(mean, spread)| {
                (node.confidence - mean).abs() > spread
            });
            matches_search
                && node.confidence >= criteria.threshold
                && criteria.node_kinds.contains(node.kind)
                && under_ceiling
                && inside_fences
                && significant
        })
        .cloned()
        .collect();

    let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let visible_ids: HashSet<&str> =
        visible_nodes.iter().map(|n| n.id.as_str()).collect();

    let visible_edges: Vec<Edge> = edges
        .iter()
        .filter(|edge| {
            if let Some(missing) =
                edge.endpoints().find(|id| !known.contains(id.as_str()))
            {
                tracing::debug!(
                    source = %edge.source,
                    target = %edge.target,
                    missing = %missing,
                    "dropping edge with unknown endpoint"
                );
                return false;
            }
            criteria.edge_kinds.contains(edge.kind)
                && edge.endpoints().all(|id| visible_ids.contains(id.as_str()))
        })
        .cloned()
        .collect();

    VisibleGraph {
        nodes: visible_nodes,
        edges: visible_edges,
    }
}
