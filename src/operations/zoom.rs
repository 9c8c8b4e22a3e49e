use tracing::trace;

use crate::math::polygon_2d::normalize;
use crate::math::{intersect, left_normal, Point2};

/// Cosine of 0.1°: corners straighter than this keep a single point.
const STRAIGHT_COS: f64 = 0.999_998_476_913_287_4;

/// Cosine of 170°: corners sharper than this keep both edge ends unjoined.
const CUSP_COS: f64 = -0.984_807_753_012_208;

/// Offsets a closed polygon perpendicular to its edges.
///
/// A positive distance moves every edge outward, a negative one inward; the
/// outward side is derived from the polygon's winding. The result is a ring
/// without a repeated closing point. Polygons that collapse to fewer than
/// three non-collinear points are returned unchanged.
#[derive(Debug)]
pub struct PathZoom {
    points: Vec<Point2>,
    distance: f64,
}

impl PathZoom {
    /// Creates a new zoom operation.
    #[must_use]
    pub fn new(points: Vec<Point2>, distance: f64) -> Self {
        Self { points, distance }
    }

    /// Executes the offset.
    #[must_use]
    pub fn execute(&self) -> Vec<Point2> {
        let Some(polygon) = normalize(&self.points) else {
            trace!(points = self.points.len(), "polygon rejected by normalizer, not zoomed");
            return self.points.clone();
        };

        let ring = &polygon.points;
        let n = ring.len();
        let side = if polygon.clockwise { 1.0 } else { -1.0 };

        // Offset edges: edge i runs from ring[i] to ring[i + 1].
        let edges: Vec<(Point2, Point2)> = (0..n)
            .map(|i| {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                let shift = left_normal((b - a).normalize()) * (side * self.distance);
                (a + shift, b + shift)
            })
            .collect();

        let mut out = Vec::with_capacity(n * 2);
        for i in 0..n {
            let (prev_a, prev_b) = edges[(i + n - 1) % n];
            let (next_a, next_b) = edges[i];
            let d1 = (prev_b - prev_a).normalize();
            let d2 = (next_b - next_a).normalize();
            let dot = d1.dot(&d2);

            if dot > STRAIGHT_COS {
                out.push(next_a);
            } else if dot < CUSP_COS {
                out.push(prev_b);
                out.push(next_a);
            } else if let Some(p) = intersect(&prev_a, &prev_b, &next_a, &next_b) {
                out.push(p);
            } else {
                out.push(prev_b);
                out.push(next_a);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::polygon_2d::signed_area_2d;

    fn square(ccw: bool) -> Vec<Point2> {
        let mut points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        if !ccw {
            points.reverse();
        }
        points
    }

    #[test]
    fn outward_zoom_grows_either_winding() {
        for ccw in [true, false] {
            let zoomed = PathZoom::new(square(ccw), 1.0).execute();
            assert_eq!(zoomed.len(), 4);
            assert_relative_eq!(signed_area_2d(&zoomed).abs(), 144.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn inward_zoom_shrinks() {
        let zoomed = PathZoom::new(square(true), -2.0).execute();
        assert_relative_eq!(signed_area_2d(&zoomed), 36.0, epsilon = 1e-9);
        assert!(zoomed.iter().all(|p| p.x >= 2.0 - 1e-9 && p.x <= 8.0 + 1e-9));
    }

    #[test]
    fn collinear_points_dropped_before_offset() {
        let mut points = square(true);
        points.insert(1, Point2::new(5.0, 0.0));
        let zoomed = PathZoom::new(points, 1.0).execute();
        assert_eq!(zoomed.len(), 4);
    }

    #[test]
    fn nearly_straight_corner_keeps_one_point() {
        // The turn at (10, 0) is far below 0.1 degrees but not exactly collinear.
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(20.0, 0.001),
            Point2::new(20.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let zoomed = PathZoom::new(points, 1.0).execute();
        assert_eq!(zoomed.len(), 5);
        assert_relative_eq!(zoomed[0], Point2::new(-1.0, -1.0), epsilon = 1e-9);
        assert_relative_eq!(zoomed[1], Point2::new(10.0, -1.0), epsilon = 1e-3);
    }

    #[test]
    fn cusp_keeps_both_edge_ends() {
        // The spike at (-100, 0.5) turns back by more than 179 degrees.
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 1.0),
            Point2::new(-100.0, 0.5),
        ];
        let zoomed = PathZoom::new(points, 1.0).execute();
        assert_eq!(zoomed.len(), 5);
        // End of the offset incoming edge, then start of the offset outgoing edge.
        assert_relative_eq!(zoomed[3], Point2::new(-100.0, 1.5), epsilon = 1e-2);
        assert_relative_eq!(zoomed[4], Point2::new(-100.0, -0.5), epsilon = 1e-2);
    }

    #[test]
    fn degenerate_polygon_returned_unchanged() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)];
        let zoomed = PathZoom::new(points.clone(), 1.0).execute();
        assert_eq!(zoomed, points);
    }
}
