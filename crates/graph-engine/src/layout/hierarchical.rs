use crate::config::Canvas;
use crate::ix_map::IxMap;
use crate::model::{Node, NodeId, NodeKind, Point};

/// Row order, top to bottom.
const LAYERS: [NodeKind; 3] =
    [NodeKind::Input, NodeKind::Context, NodeKind::Output];

/// Layered placement: one row per node kind that has nodes, rows spread
/// evenly down the canvas, nodes in a row sorted by id and spread evenly
/// across it.
pub(super) fn place(
    nodes: &[Node],
    ids: &IxMap<NodeId>,
    canvas: &Canvas,
) -> Vec<Point> {
    let mut rows: Vec<Vec<usize>> = LAYERS
        .iter()
        .map(|kind| {
            nodes
                .iter()
                .filter(|n| n.kind == *kind)
                .filter_map(|n| ids.index_of(&n.id))
                .collect::<Vec<usize>>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    let mut points = vec![canvas.center(); ids.len()];
    let row_count = rows.len();
    for (r, row) in rows.iter_mut().enumerate() {
        // Indices follow sorted ids
        row.sort_unstable();
        row.dedup();
        let y = spread(r, row_count, canvas.margin, canvas.height);
        place_row(&mut points, row, y, canvas);
    }
    points
}

fn place_row(points: &mut [Point], row: &[usize], y: f32, canvas: &Canvas) {
    for (i, &idx) in row.iter().enumerate() {
        let x = spread(i, row.len(), canvas.margin, canvas.width);
        points[idx] = canvas.clamp(Point::new(x, y));
    }
}

// Centre of slot `i` of `count` equal slots between the margins
fn spread(i: usize, count: usize, margin: f32, extent: f32) -> f32 {
    let usable = (extent - 2.0 * margin).max(0.0);
    margin + usable * (i as f32 + 0.5) / count as f32
}
