use super::{Point2, INTERSECT_EPSILON, TOLERANCE};

/// Intersection of the infinite lines through `(p1, p2)` and `(p3, p4)`.
///
/// Returns `None` when the lines are parallel or nearly so (denominator
/// magnitude below [`INTERSECT_EPSILON`]); callers fall back to a
/// non-mitered construction.
#[must_use]
pub fn intersect(p1: &Point2, p2: &Point2, p3: &Point2, p4: &Point2) -> Option<Point2> {
    let d1x = p2.x - p1.x;
    let d1y = p2.y - p1.y;
    let d2x = p4.x - p3.x;
    let d2y = p4.y - p3.y;

    let denom = d1x * d2y - d1y * d2x;
    if denom.abs() < INTERSECT_EPSILON {
        return None;
    }

    let t = ((p3.x - p1.x) * d2y - (p3.y - p1.y) * d2x) / denom;
    Some(Point2::new(p1.x + d1x * t, p1.y + d1y * t))
}

/// First crossing of the segment `a → b` with a circle.
///
/// Substitutes the parametric segment into the circle equation and returns
/// the smallest root `t` in `[0, 1]`, i.e. the point where a walk from `a`
/// towards `b` first meets the circle.
#[must_use]
pub fn circle_segment_intersect(center: &Point2, radius: f64, a: &Point2, b: &Point2) -> Option<f64> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let seg_len_sq = dx * dx + dy * dy;
    if seg_len_sq < TOLERANCE * TOLERANCE {
        return None;
    }

    // (ax + t*dx - cx)² + (ay + t*dy - cy)² = r²
    let fx = a.x - center.x;
    let fy = a.y - center.y;
    let qa = seg_len_sq;
    let qb = 2.0 * (fx * dx + fy * dy);
    let qc = fx * fx + fy * fy - radius * radius;
    let discriminant = qb * qb - 4.0 * qa * qc;

    if discriminant < 0.0 {
        return None;
    }
    let disc_sqrt = discriminant.sqrt();

    let eps = TOLERANCE;
    [(-qb - disc_sqrt) / (2.0 * qa), (-qb + disc_sqrt) / (2.0 * qa)]
        .into_iter()
        .find(|t| *t >= -eps && *t <= 1.0 + eps)
        .map(|t| t.clamp(0.0, 1.0))
}
