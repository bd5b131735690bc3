use eframe::egui;
use graph_engine::{
    Canvas, Edge, EdgeKind, Node, NodeKind, Point, SimulationState,
    ViewTransform, VisibleGraph, curve_points, sample_curve,
};

// Drawing constants
const NODE_RADIUS_MIN: f32 = 4.0;
const NODE_RADIUS_MAX: f32 = 11.0;
const EDGE_STROKE_WIDTH: f32 = 1.5;
const CURVE_SEGMENTS: usize = 12;
const DASH_LENGTH: f32 = 6.0;
const GAP_LENGTH: f32 = 4.0;
const LABEL_FONT_SIZE: f32 = 11.0;

fn tableau(index: usize) -> egui::Color32 {
    let c = colorous::TABLEAU10[index % colorous::TABLEAU10.len()];
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

pub fn node_color(kind: NodeKind) -> egui::Color32 {
    let index = NodeKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
    tableau(index)
}

/// Edge colours continue the palette after the node kinds, faded.
pub fn edge_color(kind: EdgeKind) -> egui::Color32 {
    let index = EdgeKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
    tableau(NodeKind::ALL.len() + index).gamma_multiply(0.7)
}

fn node_radius(confidence: f64) -> f32 {
    let t = confidence.clamp(0.0, 1.0) as f32;
    NODE_RADIUS_MIN + (NODE_RADIUS_MAX - NODE_RADIUS_MIN) * t
}

// ------------------------------------------------------------------
// Coordinates
// ------------------------------------------------------------------

/// Maps engine canvas coordinates into a screen rectangle: fit the
/// canvas into the rect, then apply the user's pan and zoom.
#[derive(Debug, Clone, Copy)]
pub struct ScreenMap {
    origin: egui::Pos2,
    fit: f32,
    view: ViewTransform,
}

impl ScreenMap {
    pub fn new(rect: egui::Rect, canvas: &Canvas, view: ViewTransform) -> Self {
        let fit = (rect.width() / canvas.width)
            .min(rect.height() / canvas.height)
            .max(f32::EPSILON);
        let used = egui::vec2(canvas.width, canvas.height) * fit;
        let origin = rect.center() - used / 2.0;
        Self { origin, fit, view }
    }

    pub fn to_screen(&self, p: Point) -> egui::Pos2 {
        let q = self.view.apply(p);
        self.origin + egui::vec2(q.x, q.y) * self.fit
    }

    /// Screen-space drag converted to a pan in view units.
    pub fn pan_delta(&self, drag: egui::Vec2) -> Point {
        Point::new(drag.x / self.fit, drag.y / self.fit)
    }

    fn scale(&self) -> f32 {
        self.fit * self.view.scale
    }
}

// ------------------------------------------------------------------
// Painting
// ------------------------------------------------------------------

pub fn draw_graph(
    painter: &egui::Painter,
    map: &ScreenMap,
    visible: &VisibleGraph,
    state: &SimulationState,
    show_labels: bool,
    text_color: egui::Color32,
) {
    for edge in &visible.edges {
        draw_edge(painter, map, edge, state);
    }

    let zoom = map.scale();
    for node in &visible.nodes {
        let Some(position) = state.position(&node.id) else {
            continue;
        };
        let center = map.to_screen(position);
        let radius = node_radius(node.confidence) * zoom.sqrt();
        painter.circle_filled(center, radius, node_color(node.kind));

        if show_labels {
            painter.text(
                center + egui::vec2(0.0, radius + 2.0),
                egui::Align2::CENTER_TOP,
                &node.label,
                egui::FontId::proportional(LABEL_FONT_SIZE),
                text_color,
            );
        }
    }
}

fn draw_edge(
    painter: &egui::Painter,
    map: &ScreenMap,
    edge: &Edge,
    state: &SimulationState,
) {
    let Some(endpoints) = edge
        .endpoints()
        .map(|id| state.position(id))
        .collect::<Option<Vec<Point>>>()
    else {
        return;
    };

    let stroke = egui::Stroke::new(EDGE_STROKE_WIDTH, edge_color(edge.kind));
    let curved = edge.kind == EdgeKind::Hyperedge || endpoints.len() > 2;

    if curved {
        let points: Vec<egui::Pos2> =
            sample_curve(&curve_points(&endpoints), CURVE_SEGMENTS)
                .into_iter()
                .map(|p| map.to_screen(p))
                .collect();
        painter.add(egui::Shape::line(points, stroke));
    } else if let [from, to] = endpoints.as_slice() {
        let segment = [map.to_screen(*from), map.to_screen(*to)];
        if edge.kind == EdgeKind::Temporal {
            painter.extend(egui::Shape::dashed_line(
                &segment,
                stroke,
                DASH_LENGTH,
                GAP_LENGTH,
            ));
        } else {
            painter.line_segment(segment, stroke);
        }
    }
}

/// The visible node drawn under `pointer`, if any.
pub fn node_at<'a>(
    map: &ScreenMap,
    visible: &'a VisibleGraph,
    state: &SimulationState,
    pointer: egui::Pos2,
) -> Option<&'a Node> {
    let zoom = map.scale().sqrt();
    visible
        .nodes
        .iter()
        .filter_map(|node| {
            let position = state.position(&node.id)?;
            let distance = map.to_screen(position).distance(pointer);
            let radius = node_radius(node.confidence) * zoom;
            (distance <= radius).then_some((node, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(node, _)| node)
}
