use std::f64::consts::PI;

use crate::math::{point_along, Point2, Vector2};
use crate::style::LineCap;

use super::pen::arc_step;

/// Points inserted between the boundary end `from` and the boundary end
/// `to` when closing a free end.
///
/// `outward` is the unit direction pointing away from the line. The cap is
/// sized from the measured distance between the two boundary points, so
/// sub-strokes of a compound array get caps of their own width. `from` must
/// lie on the left of `outward`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub(crate) fn cap_points(cap: LineCap, from: &Point2, to: &Point2, outward: &Vector2, tolerance: f64) -> Vec<Point2> {
    let center = point_along(from, to, 0.5);
    let half = (to - from).norm() * 0.5;
    let extension = outward * half;

    match cap {
        LineCap::Flat => Vec::new(),
        LineCap::Square => vec![from + extension, to + extension],
        LineCap::Triangle => vec![center + extension],
        LineCap::Round => {
            let step = arc_step(half, tolerance);
            if step <= 0.0 || !step.is_finite() {
                return Vec::new();
            }
            let count = (PI / step).floor() as usize;
            let radial = from - center;
            (1..=count)
                .map(|k| {
                    let angle = -PI * k as f64 / (count + 1) as f64;
                    let (sin, cos) = angle.sin_cos();
                    center + Vector2::new(radial.x * cos - radial.y * sin, radial.x * sin + radial.y * cos)
                })
                .collect()
        }
    }
}
