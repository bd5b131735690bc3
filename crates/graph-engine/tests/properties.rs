//! Property-based tests for the layout engine
//!
//! Invariants:
//! - Visible edges only touch visible nodes
//! - Filtering is idempotent
//! - The significance filter agrees with `significant_changes`
//! - Layout is deterministic for a fixed seed and stays inside the canvas
//! - The integrator converges monotonically and never leaves the canvas
//! - Hyperedge curves are finite for any endpoints

use graph_engine::{
    Body, Canvas, Edge, EdgeKind, EdgeKindSet, FilterCriteria,
    IntegratorConfig, LayoutConfig, LayoutMode, Node, NodeKind, NodeKindSet,
    Point, SimulationState, curve_points, filter, layout,
    significant_changes, step,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_node_kind() -> impl Strategy<Value = NodeKind> {
    prop_oneof![
        Just(NodeKind::Input),
        Just(NodeKind::Output),
        Just(NodeKind::Context),
    ]
}

fn arb_edge_kind() -> impl Strategy<Value = EdgeKind> {
    prop_oneof![
        Just(EdgeKind::Direct),
        Just(EdgeKind::Hyperedge),
        Just(EdgeKind::Temporal),
    ]
}

fn arb_mode() -> impl Strategy<Value = LayoutMode> {
    prop_oneof![
        Just(LayoutMode::Force),
        Just(LayoutMode::Hierarchical),
        Just(LayoutMode::Multilevel),
    ]
}

const LABELS: [&str; 4] = ["Sensor", "Actuator", "Weather", "Memory"];

/// Nodes `n0..n{count}`; edges may also name `n{count}` and `n{count+1}`,
/// which do not exist.
fn arb_graph() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
    (0usize..12).prop_flat_map(|count| {
        let nodes = prop::collection::vec(
            (arb_node_kind(), 0.0f64..=1.0, 0usize..LABELS.len()),
            count,
        );
        let id = 0..count + 2;
        let edges = prop::collection::vec(
            (
                id.clone(),
                id.clone(),
                prop::collection::vec(id, 0..3),
                arb_edge_kind(),
                0.0f64..=1.0,
            ),
            0..20,
        );
        (nodes, edges).prop_map(|(nodes, edges)| {
            let nodes = nodes
                .into_iter()
                .enumerate()
                .map(|(i, (kind, confidence, label))| {
                    Node::new(format!("n{i}"), LABELS[label], kind, confidence)
                })
                .collect();
            let edges = edges
                .into_iter()
                .map(|(s, t, via, kind, confidence)| {
                    Edge::new(format!("n{s}"), format!("n{t}"), kind, confidence)
                        .with_via(via.into_iter().map(|v| format!("n{v}")))
                })
                .collect();
            (nodes, edges)
        })
    })
}

fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        0.0f64..=1.0,
        prop::collection::vec(arb_node_kind(), 0..4),
        prop::collection::vec(arb_edge_kind(), 0..4),
        prop_oneof![Just(""), Just("sen"), Just("WEATHER"), Just("zzz")],
        prop::option::of(0.0f64..=1.0),
        any::<bool>(),
        prop::option::of(prop_oneof![Just(1.0), Just(2.0), Just(3.0)]),
    )
        .prop_map(
            |(
                threshold,
                node_kinds,
                edge_kinds,
                search,
                max,
                hide_outliers,
                sigmas,
            )| {
                FilterCriteria {
                    threshold,
                    node_kinds: NodeKindSet::from_iter(node_kinds),
                    edge_kinds: EdgeKindSet::from_iter(edge_kinds),
                    search: search.to_string(),
                    max_confidence: max,
                    hide_outliers,
                    only_significant: sigmas.is_some(),
                    significance_threshold: sigmas.unwrap_or(2.0),
                }
            },
        )
}

fn arb_inside_point(canvas: Canvas) -> impl Strategy<Value = Point> {
    let xs = canvas.margin..=canvas.width - canvas.margin;
    let ys = canvas.margin..=canvas.height - canvas.margin;
    (xs, ys).prop_map(|(x, y)| Point::new(x, y))
}

// ============================================================================
// Filter
// ============================================================================

proptest! {
    #[test]
    fn visible_edges_only_touch_visible_nodes(
        (nodes, edges) in arb_graph(),
        criteria in arb_criteria(),
    ) {
        let visible = filter(&nodes, &edges, &criteria);

        for edge in &visible.edges {
            for id in edge.endpoints() {
                prop_assert!(visible.contains_node(id), "dangling endpoint {id}");
            }
            prop_assert!(criteria.edge_kinds.contains(edge.kind));
        }
        for node in &visible.nodes {
            prop_assert!(node.confidence >= criteria.threshold);
            prop_assert!(criteria.node_kinds.contains(node.kind));
        }
    }

    #[test]
    fn significance_filter_keeps_flagged_nodes_only(
        (nodes, edges) in arb_graph(),
        sigmas in prop_oneof![Just(1.0), Just(2.0), Just(3.0)],
    ) {
        let criteria = FilterCriteria::default().with_significance(sigmas);
        let visible = filter(&nodes, &edges, &criteria);

        let confidences: Vec<f64> = nodes.iter().map(|n| n.confidence).collect();
        let flags = significant_changes(&confidences, sigmas);
        for (node, flag) in nodes.iter().zip(&flags) {
            prop_assert_eq!(visible.contains_node(&node.id), flag.flagged);
        }
    }

    #[test]
    fn filter_is_idempotent(
        (nodes, edges) in arb_graph(),
        criteria in arb_criteria(),
    ) {
        let first = filter(&nodes, &edges, &criteria);
        let second = filter(&nodes, &edges, &criteria);
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Layout
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn layout_is_deterministic_and_inside_canvas(
        (nodes, edges) in arb_graph(),
        mode in arb_mode(),
        seed in any::<u64>(),
    ) {
        let canvas = Canvas::default();
        let config = LayoutConfig::default();

        let first = layout(&nodes, &edges, mode, seed, &canvas, &config);
        let second = layout(&nodes, &edges, mode, seed, &canvas, &config);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), nodes.len());
        for (id, p) in &first {
            prop_assert!(p.is_finite(), "{id} at {p:?}");
            prop_assert!(canvas.contains(*p), "{id} at {p:?}");
        }
    }
}

// ============================================================================
// Integrator
// ============================================================================

proptest! {
    #[test]
    fn integrator_converges_monotonically(
        start in arb_inside_point(Canvas::default()),
        dx in -170.0f32..170.0,
        dy in -170.0f32..170.0,
    ) {
        // 200 ticks at damping 0.05 close any gap below ~285 units to
        // under 0.01.
        let canvas = Canvas::default();
        let config = IntegratorConfig::default();
        let target = canvas.clamp(start + Point::new(dx, dy));
        let mut state: SimulationState =
            [("a".to_string(), Body::new(start, target))].into_iter().collect();

        let mut last = state.max_displacement();
        for _ in 0..200 {
            state = step(state, 1.0 / 60.0, &config, &canvas);
            let now = state.max_displacement();
            prop_assert!(now <= last);
            last = now;
        }
        prop_assert!(last < 0.01, "{last} left after 200 ticks");
    }

    #[test]
    fn integrator_stays_inside_canvas(
        start in arb_inside_point(Canvas::default()),
        tx in -1000.0f32..2000.0,
        ty in -1000.0f32..2000.0,
        damping in 0.01f32..=1.0,
    ) {
        let canvas = Canvas::default();
        let config = IntegratorConfig { damping };
        let mut state: SimulationState = [(
            "a".to_string(),
            Body::new(start, Point::new(tx, ty)),
        )]
        .into_iter()
        .collect();

        for _ in 0..50 {
            state = step(state, 1.0 / 60.0, &config, &canvas);
            let p = state.position("a").unwrap_or(Point::ZERO);
            prop_assert!(canvas.contains(p), "{p:?}");
        }
    }
}

// ============================================================================
// Hyperedge geometry
// ============================================================================

proptest! {
    #[test]
    fn curve_points_are_finite(
        raw in prop::collection::vec((-1.0e4f32..1.0e4, -1.0e4f32..1.0e4), 0..6),
        repeat in any::<bool>(),
    ) {
        let mut endpoints: Vec<Point> =
            raw.into_iter().map(|(x, y)| Point::new(x, y)).collect();
        if repeat && let Some(&first) = endpoints.first() {
            endpoints.push(first);
            endpoints.push(first);
        }

        let points = curve_points(&endpoints);

        let expected = if endpoints.len() < 2 {
            endpoints.len()
        } else {
            2 * endpoints.len() - 1
        };
        prop_assert_eq!(points.len(), expected);
        prop_assert!(points.iter().all(|p| p.is_finite()));
    }
}
