// Force-directed refinement used by every level of the layout pipeline

use crate::config::{Canvas, LayoutConfig};
use crate::model::Point;

// Golden angle, spreads coincident pairs in distinct directions
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Run `config.iterations` force steps over `points` in place.
///
/// Forces per step:
/// - repulsion between every pair, `10 * (level + 1) * repulsion / d²`
///   with `d` clamped to `min_distance`
/// - spring pull along each link, proportional to link weight
/// - gravity toward the canvas centre, scaled by `1 / (level + 1)`
///
/// Each node moves at most `max_step` per iteration and stays inside
/// the canvas margin.
pub fn refine(
    points: &mut [Point],
    links: &[(usize, usize, f32)],
    level: usize,
    canvas: &Canvas,
    config: &LayoutConfig,
) {
    let n = points.len();
    if n == 0 {
        return;
    }

    let scale = (level + 1) as f32;
    let repulsion = config.repulsion * 10.0 * scale;
    let gravity = config.gravity / scale;
    let center = canvas.center();

    let mut forces = vec![Point::ZERO; n];
    for _ in 0..config.iterations {
        forces.iter_mut().for_each(|f| *f = Point::ZERO);

        // Repulsion between all pairs
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = points[i] - points[j];
                let dist = delta.length().max(config.min_distance);
                let direction = delta
                    .normalized()
                    .unwrap_or_else(|| separation_direction(i, j));
                let force = direction * (repulsion / (dist * dist));
                forces[i] += force;
                forces[j] -= force;
            }
        }

        // Attraction along links
        for &(a, b, weight) in links {
            let pull = (points[b] - points[a]) * (config.attraction * weight);
            forces[a] += pull;
            forces[b] -= pull;
        }

        for (point, force) in points.iter_mut().zip(&forces) {
            let mut step = *force + (center - *point) * gravity;
            let len = step.length();
            if len > config.max_step {
                step = step * (config.max_step / len);
            }
            *point = canvas.clamp(*point + step);
        }
    }
}

fn separation_direction(i: usize, j: usize) -> Point {
    let angle = (i * 31 + j * 17) as f32 * GOLDEN_ANGLE;
    Point::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coincident_points_separate() {
        let canvas = Canvas::default();
        let config = LayoutConfig::default();
        let mut points = vec![canvas.center(); 3];

        refine(&mut points, &[], 0, &canvas, &config);

        for i in 0..3 {
            for j in (i + 1)..3 {
                assert!(
                    points[i].distance(points[j]) > 1.0,
                    "points {i} and {j} still overlap"
                );
            }
        }
    }

    #[test]
    fn test_links_pull_closer_than_strangers() {
        let canvas = Canvas::new(2000.0, 2000.0);
        let config = LayoutConfig {
            attraction: 0.2,
            ..LayoutConfig::default()
        };
        let mut points = vec![
            Point::new(400.0, 1000.0),
            Point::new(1000.0, 1000.0),
            Point::new(1600.0, 1000.0),
        ];

        refine(&mut points, &[(0, 1, 1.0)], 0, &canvas, &config);

        let linked = points[0].distance(points[1]);
        let unlinked = points[1].distance(points[2]);
        assert!(linked < unlinked, "{linked} >= {unlinked}");
    }

    #[test]
    fn test_points_stay_inside_margin() {
        let canvas = Canvas::default();
        let config = LayoutConfig {
            repulsion: 1.0e6,
            ..LayoutConfig::default()
        };
        let mut points: Vec<Point> = (0..10)
            .map(|i| Point::new(60.0 + i as f32, 60.0))
            .collect();

        refine(&mut points, &[], 2, &canvas, &config);

        assert!(points.iter().all(|p| canvas.contains(*p)));
    }
}
