use tracing::trace;

use crate::math::{distance, intersect, left_normal, point_along, Point2, Vector2, COLLINEAR_EPSILON};
use crate::style::LineJoin;

use super::pen::Pen;

/// Cosine of 170°: edges meeting at a sharper angle are treated as a cusp.
const CUSP_COS: f64 = -0.984_807_753_012_208;

/// Offset points produced at one vertex, in travel order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Corner {
    pub left: Vec<Point2>,
    pub right: Vec<Point2>,
}

/// Result of the miter fallback chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MiterOutcome {
    /// The ideal miter point is within the limit.
    Sharp(Point2),
    /// The miter tip is clipped at the limit.
    Truncated(Point2, Point2),
    /// The two raw offset points.
    Bevel,
}

/// Side of the centerline a boundary runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// One side of a vertex: the raw offset points and the far ends of the
/// adjacent offset edges.
struct SideGeometry {
    prev: Point2,
    raw_in: Point2,
    raw_out: Point2,
    next: Point2,
}

/// Builds the offset points at vertex `v` between `prev → v` and `v → next`.
///
/// Both adjacent segments must have non-zero length.
pub(crate) fn join(pen: &Pen, prev: &Point2, v: &Point2, next: &Point2) -> Corner {
    let d1 = (v - prev).normalize();
    let d2 = (next - v).normalize();
    let o1 = pen.offset(&left_normal(d1));
    let o2 = pen.offset(&left_normal(d2));

    let cross = d1.x * d2.y - d1.y * d2.x;
    let dot = d1.dot(&d2);

    if cross.abs() < COLLINEAR_EPSILON {
        return if dot > 0.0 {
            Corner {
                left: vec![v + o1],
                right: vec![v - o1],
            }
        } else {
            Corner {
                left: vec![v + o1, v + o2],
                right: vec![v - o1, v - o2],
            }
        };
    }

    let side = |s: Side| {
        let k = s.sign();
        SideGeometry {
            prev: prev + o1 * k,
            raw_in: v + o1 * k,
            raw_out: v + o2 * k,
            next: next + o2 * k,
        }
    };

    if cross > 0.0 {
        Corner {
            left: inner_join(pen, &side(Side::Left), dot),
            right: outer_join(pen, pen.line_join(), v, &d1, &d2, Side::Right, &side(Side::Right)),
        }
    } else {
        let line_join = if pen.is_outset() {
            LineJoin::Miter
        } else {
            pen.line_join()
        };
        Corner {
            left: outer_join(pen, line_join, v, &d1, &d2, Side::Left, &side(Side::Left)),
            right: inner_join(pen, &side(Side::Right), dot),
        }
    }
}

fn inner_join(pen: &Pen, g: &SideGeometry, dot: f64) -> Vec<Point2> {
    if !pen.is_compound() {
        return vec![g.raw_in, g.raw_out];
    }
    let midpoint = point_along(&g.raw_in, &g.raw_out, 0.5);
    if dot < CUSP_COS {
        return vec![midpoint];
    }
    match intersect(&g.raw_in, &g.prev, &g.raw_out, &g.next) {
        Some(p) => vec![p],
        None => {
            trace!(x = midpoint.x, y = midpoint.y, "inner join intersection failed");
            vec![midpoint]
        }
    }
}

fn outer_join(
    pen: &Pen,
    line_join: LineJoin,
    v: &Point2,
    d1: &Vector2,
    d2: &Vector2,
    side: Side,
    g: &SideGeometry,
) -> Vec<Point2> {
    let bevel = || vec![g.raw_in, g.raw_out];
    match line_join {
        LineJoin::Bevel => bevel(),
        LineJoin::Miter => match miter(pen, v, g, true) {
            MiterOutcome::Sharp(p) => vec![p],
            MiterOutcome::Truncated(a, b) => vec![a, b],
            MiterOutcome::Bevel => bevel(),
        },
        LineJoin::SvgMiterClipped => match miter(pen, v, g, false) {
            MiterOutcome::Sharp(p) => vec![p],
            MiterOutcome::Truncated(..) | MiterOutcome::Bevel => bevel(),
        },
        LineJoin::Round => round_fan(pen, v, d1, d2, side, g),
    }
}

/// Miter construction at the outer side of a corner.
///
/// With `truncate`, a miter past the limit is clipped where the limit line
/// crosses the edges from the raw points to the miter tip; otherwise it
/// falls straight back to a bevel. The limit itself is inclusive only for
/// the truncating variant.
fn miter(pen: &Pen, v: &Point2, g: &SideGeometry, truncate: bool) -> MiterOutcome {
    let Some(tip) = intersect(&g.raw_in, &g.prev, &g.raw_out, &g.next) else {
        trace!(x = v.x, y = v.y, "miter intersection failed, using bevel");
        return MiterOutcome::Bevel;
    };

    let di = distance(v, &tip);
    let limit = pen.miter_distance();

    if !truncate {
        return if di < limit {
            MiterOutcome::Sharp(tip)
        } else {
            MiterOutcome::Bevel
        };
    }

    if di <= limit {
        return MiterOutcome::Sharp(tip);
    }

    let dbevel = distance(v, &point_along(&g.raw_in, &g.raw_out, 0.5));
    if limit > dbevel {
        let k = (limit - dbevel) / (di - dbevel);
        MiterOutcome::Truncated(
            point_along(&g.raw_in, &tip, k),
            point_along(&g.raw_out, &tip, k),
        )
    } else {
        MiterOutcome::Bevel
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn round_fan(pen: &Pen, v: &Point2, d1: &Vector2, d2: &Vector2, side: Side, g: &SideGeometry) -> Vec<Point2> {
    let k = side.sign();
    let n1 = left_normal(*d1) * k;
    let n2 = left_normal(*d2) * k;
    let sweep = (n1.x * n2.y - n1.y * n2.x).atan2(n1.dot(&n2));

    let step = pen.arc_step();
    let count = if step > 0.0 {
        (sweep.abs() / step).floor() as usize
    } else {
        0
    };

    let mut points = Vec::with_capacity(count + 2);
    points.push(g.raw_in);
    for i in 1..=count {
        let angle = sweep * i as f64 / (count + 1) as f64;
        let (sin, cos) = angle.sin_cos();
        let n = Vector2::new(n1.x * cos - n1.y * sin, n1.x * sin + n1.y * cos);
        points.push(v + pen.offset(&n));
    }
    points.push(g.raw_out);
    points
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::SQRT_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::style::{PenAlignment, StrokeStyle};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn pen(line_join: LineJoin, width: f64, limit: f64) -> Pen {
        let mut style = StrokeStyle::new(width).with_line_join(line_join);
        style.set_miter_limit(limit).unwrap();
        Pen::new(&style, false)
    }

    #[test]
    fn straight_vertex_gives_one_point_per_side() {
        let c = join(&pen(LineJoin::Miter, 2.0, 10.0), &p(0.0, 0.0), &p(5.0, 0.0), &p(10.0, 0.0));
        assert_eq!(c.left, vec![p(5.0, 1.0)]);
        assert_eq!(c.right, vec![p(5.0, -1.0)]);
    }

    #[test]
    fn reversal_gives_two_points_per_side() {
        let c = join(&pen(LineJoin::Miter, 2.0, 10.0), &p(0.0, 0.0), &p(5.0, 0.0), &p(0.0, 0.0));
        assert_eq!(c.left.len(), 2);
        assert_eq!(c.right.len(), 2);
        assert_relative_eq!(c.left[0], p(5.0, 1.0));
        assert_relative_eq!(c.left[1], p(5.0, -1.0));
    }

    #[test]
    fn bevel_right_angle() {
        let c = join(&pen(LineJoin::Bevel, 2.0, 10.0), &p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, 10.0));
        // Left turn: right side is outer.
        assert_eq!(c.right, vec![p(10.0, -1.0), p(11.0, 0.0)]);
        assert_eq!(c.left, vec![p(10.0, 1.0), p(9.0, 0.0)]);
    }

    #[test]
    fn miter_limit_is_inclusive() {
        let c = join(&pen(LineJoin::Miter, 2.0, SQRT_2), &p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, 10.0));
        assert_eq!(c.right.len(), 1);
        assert_relative_eq!(c.right[0], p(11.0, -1.0));
    }

    #[test]
    fn svg_miter_limit_is_exclusive() {
        let c = join(
            &pen(LineJoin::SvgMiterClipped, 2.0, SQRT_2),
            &p(0.0, 0.0),
            &p(10.0, 0.0),
            &p(10.0, 10.0),
        );
        assert_eq!(c.right, vec![p(10.0, -1.0), p(11.0, 0.0)]);
    }

    #[test]
    fn miter_past_limit_is_truncated() {
        // Tip at distance sqrt(2), bevel chord midpoint at sqrt(2)/2.
        let c = join(&pen(LineJoin::Miter, 2.0, 1.0), &p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, 10.0));
        assert_eq!(c.right.len(), 2);
        let v = p(10.0, 0.0);
        for q in &c.right {
            let along = (q - v).dot(&Vector2::new(1.0, -1.0).normalize());
            assert_relative_eq!(along, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn miter_below_bevel_chord_falls_back_to_bevel() {
        let c = join(&pen(LineJoin::Miter, 2.0, 0.5), &p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, 10.0));
        assert_eq!(c.right, vec![p(10.0, -1.0), p(11.0, 0.0)]);
    }

    #[test]
    fn round_join_stays_on_circle() {
        let c = join(&pen(LineJoin::Round, 4.0, 10.0), &p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, 10.0));
        assert!(c.right.len() > 2);
        for q in &c.right {
            assert_relative_eq!(distance(q, &p(10.0, 0.0)), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn right_turn_swaps_sides() {
        let c = join(&pen(LineJoin::Bevel, 2.0, 10.0), &p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, -10.0));
        assert_eq!(c.left, vec![p(10.0, 1.0), p(11.0, 0.0)]);
    }

    #[test]
    fn outset_forces_miter_on_right_turn() {
        let style = StrokeStyle::new(2.0)
            .with_line_join(LineJoin::Bevel)
            .with_alignment(PenAlignment::Outset);
        let c = join(&Pen::new(&style, true), &p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, -10.0));
        assert_eq!(c.left.len(), 1);
        assert_relative_eq!(c.left[0], p(11.0, 1.0));
    }

    #[test]
    fn compound_inner_join_intersects() {
        let mut style = StrokeStyle::new(2.0);
        style.set_compound_array(&[0.0, 0.4, 0.6, 1.0]).unwrap();
        let c = join(&Pen::new(&style, false), &p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, 10.0));
        assert_eq!(c.left.len(), 1);
        assert_relative_eq!(c.left[0], p(9.0, 1.0));
    }

    #[test]
    fn compound_inner_join_at_cusp_uses_midpoint() {
        let mut style = StrokeStyle::new(2.0);
        style.set_compound_array(&[0.0, 0.4, 0.6, 1.0]).unwrap();
        let pen = Pen::new(&style, false);
        let (prev, v, next) = (p(0.0, 0.0), p(10.0, 0.0), p(0.0, 1.0));
        let c = join(&pen, &prev, &v, &next);

        let raw_in = v + pen.offset(&left_normal((v - prev).normalize()));
        let raw_out = v + pen.offset(&left_normal((next - v).normalize()));
        assert_eq!(c.left.len(), 1);
        assert_relative_eq!(c.left[0], point_along(&raw_in, &raw_out, 0.5), epsilon = 1e-12);
        assert_relative_eq!(c.left[0], p(9.950_248, 0.002_481), epsilon = 1e-5);
    }
}
