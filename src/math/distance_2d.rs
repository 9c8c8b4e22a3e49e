use super::{Point2, Vector2};

/// Turn direction at `b` along `a → b → c`: `(b − a) × (c − b)`.
///
/// Positive for a left (counter-clockwise) turn, negative for a right turn,
/// zero when the three points are collinear.
#[must_use]
pub fn cross_product(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Linear interpolation: `a + (b − a) * t`.
#[must_use]
pub fn point_along(a: &Point2, b: &Point2, t: f64) -> Point2 {
    Point2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Returns the minimum distance from `p` to the segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return distance(p, a);
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, &Point2::new(a.x + t * dx, a.y + t * dy))
}
