use super::{cross_product, distance, Point2, MIN_VERTEX_DISTANCE};

/// A simple polygon after collinear-point removal.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPolygon {
    /// Remaining vertices; a closing duplicate of the first point is dropped.
    pub points: Vec<Point2>,
    /// `true` when the input repeated its first point at the end.
    pub closed: bool,
    /// Winding by the extremal-vertex method.
    pub clockwise: bool,
}

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Removes collinear vertices and determines closedness and winding.
///
/// Vertices whose cross product with both neighbours is exactly zero are
/// removed repeatedly until nothing changes. Returns `None` when fewer than
/// 3 vertices survive; the polygon is then considered not usable and callers
/// keep the raw points.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn normalize(points: &[Point2]) -> Option<NormalizedPolygon> {
    let mut pts = points.to_vec();

    let closed = pts.len() > 1
        && distance(&pts[0], &pts[pts.len() - 1]) < MIN_VERTEX_DISTANCE;
    if closed {
        pts.pop();
    }

    loop {
        let n = pts.len();
        if n < 3 {
            return None;
        }
        let removable = (0..n).find(|&i| {
            let prev = &pts[(i + n - 1) % n];
            let next = &pts[(i + 1) % n];
            cross_product(prev, &pts[i], next) == 0.0
        });
        match removable {
            Some(i) => {
                pts.remove(i);
            }
            None => break,
        }
    }

    let clockwise = is_clockwise(&pts);
    Some(NormalizedPolygon {
        points: pts,
        closed,
        clockwise,
    })
}

/// Winding test at the vertex with minimal x (ties: minimal y).
///
/// That vertex is always convex, so the sign of its turn gives the winding:
/// a negative cross product means clockwise.
fn is_clockwise(points: &[Point2]) -> bool {
    let n = points.len();
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x || (pt.x - b.x).abs() < f64::EPSILON && pt.y < b.y {
            best = i;
        }
    }
    let prev = &points[(best + n - 1) % n];
    let next = &points[(best + 1) % n];
    cross_product(prev, &points[best], next) < 0.0
}
