// Hyperedge geometry - control points for curves through several endpoints

use crate::model::Point;

/// How far each segment's control point bows away from the straight line.
pub const CURVE_OFFSET: f32 = 30.0;

/// Control points for a curve through `endpoints`.
///
/// The result starts with the first endpoint; then, for each consecutive
/// pair, holds the segment midpoint pushed `CURVE_OFFSET` along the
/// segment normal followed by the next endpoint. Even segments bow to one
/// side and odd segments to the other, giving an S-curve.
///
/// A zero-length segment has no normal and keeps its midpoint unshifted.
/// Fewer than two endpoints are returned as is.
pub fn curve_points(endpoints: &[Point]) -> Vec<Point> {
    if endpoints.len() < 2 {
        return endpoints.to_vec();
    }

    let mut points = Vec::with_capacity(endpoints.len() * 2 - 1);
    points.push(endpoints[0]);
    for (index, pair) in endpoints.windows(2).enumerate() {
        let (current, next) = (pair[0], pair[1]);
        let sign = if index % 2 == 0 { 1.0 } else { -1.0 };
        let offset = (next - current)
            .normalized()
            .map(|direction| direction.perp() * (CURVE_OFFSET * sign))
            .unwrap_or(Point::ZERO);
        points.push(current.midpoint(next) + offset);
        points.push(next);
    }
    points
}

/// Sample the curve described by `control_points` as a polyline.
///
/// The control points are read as a chain of quadratic Bézier spans
/// `(endpoint, control, endpoint)`, as produced by [`curve_points`].
/// Each span contributes `segments_per_span` line segments.
pub fn sample_curve(
    control_points: &[Point],
    segments_per_span: usize,
) -> Vec<Point> {
    if control_points.len() < 3 || segments_per_span == 0 {
        return control_points.to_vec();
    }

    let mut samples = vec![control_points[0]];
    for span in control_points.windows(3).step_by(2) {
        let (p0, c, p1) = (span[0], span[1], span[2]);
        for s in 1..=segments_per_span {
            let t = s as f32 / segments_per_span as f32;
            let u = 1.0 - t;
            samples.push(p0 * (u * u) + c * (2.0 * u * t) + p1 * (t * t));
        }
    }
    samples
}
