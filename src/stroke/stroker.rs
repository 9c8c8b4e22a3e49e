use crate::geometry::VertexCache;
use crate::math::{left_normal, Point2, Vector2};
use crate::style::{LineCap, StrokeStyle};

use super::cap::cap_points;
use super::join::{join, Corner};
use super::pen::Pen;
use super::Contour;

/// Strokes one cached subpath into closed contours.
///
/// A closed subpath yields two contours per sub-stroke: the left boundary
/// and the reversed right boundary, so the ring between them winds once and
/// the enclosed hole winds zero times. An open subpath yields one contour
/// per sub-stroke: left boundary, end cap, reversed right boundary, start
/// cap.
#[derive(Debug)]
pub struct StrokeSubpath<'a> {
    cache: &'a VertexCache,
    style: &'a StrokeStyle,
    start_cap: LineCap,
    end_cap: LineCap,
}

impl<'a> StrokeSubpath<'a> {
    /// Creates a stroke operation using the style's start and end caps.
    #[must_use]
    pub fn new(cache: &'a VertexCache, style: &'a StrokeStyle) -> Self {
        Self {
            cache,
            style,
            start_cap: style.start_cap(),
            end_cap: style.end_cap(),
        }
    }

    /// Overrides the caps, e.g. for dash ends or anchored ends.
    #[must_use]
    pub fn with_caps(mut self, start: LineCap, end: LineCap) -> Self {
        self.start_cap = start;
        self.end_cap = end;
        self
    }

    /// Executes the stroke. A cache with fewer than two vertices yields
    /// nothing.
    #[must_use]
    pub fn execute(&self) -> Vec<Contour> {
        if !self.cache.is_strokable() {
            return Vec::new();
        }
        let pen = Pen::new(self.style, self.cache.is_closed());
        let points = self.cache.points();
        let pairs = self.style.compound_array().pairs();

        if self.cache.is_closed() {
            // The trailing vertex duplicates the first one.
            let ring = &points[..points.len() - 1];
            if ring.len() < 2 {
                return Vec::new();
            }
            let corners = closed_corners(&pen, ring);
            pairs
                .iter()
                .flat_map(|&(fa, fb)| {
                    let first = boundary(&corners, fa);
                    let mut second = boundary(&corners, fb);
                    second.reverse();
                    [first, second]
                })
                .collect()
        } else {
            let corners = open_corners(&pen, &points);
            let n = points.len();
            let start_dir = (points[1] - points[0]).normalize();
            let end_dir = (points[n - 1] - points[n - 2]).normalize();
            pairs
                .iter()
                .map(|&(fa, fb)| {
                    let first = boundary(&corners, fa);
                    let second = boundary(&corners, fb);
                    self.close_open(&pen, &first, &second, &start_dir, &end_dir)
                })
                .collect()
        }
    }

    fn close_open(
        &self,
        pen: &Pen,
        first: &[Point2],
        second: &[Point2],
        start_dir: &Vector2,
        end_dir: &Vector2,
    ) -> Contour {
        let (Some(first_start), Some(first_end), Some(second_start), Some(second_end)) =
            (first.first(), first.last(), second.first(), second.last())
        else {
            return Vec::new();
        };

        let end = cap_points(self.end_cap, first_end, second_end, end_dir, pen.tolerance());
        let start = cap_points(self.start_cap, second_start, first_start, &-start_dir, pen.tolerance());

        let mut contour = Vec::with_capacity(first.len() + second.len() + end.len() + start.len());
        contour.extend_from_slice(first);
        contour.extend(end);
        contour.extend(second.iter().rev());
        contour.extend(start);
        contour
    }
}

fn closed_corners(pen: &Pen, ring: &[Point2]) -> Vec<Corner> {
    let n = ring.len();
    (0..n)
        .map(|i| join(pen, &ring[(i + n - 1) % n], &ring[i], &ring[(i + 1) % n]))
        .collect()
}

fn open_corners(pen: &Pen, points: &[Point2]) -> Vec<Corner> {
    let n = points.len();
    let mut corners = Vec::with_capacity(n);
    corners.push(end_corner(pen, &points[0], &points[1], &points[0]));
    for i in 1..n - 1 {
        corners.push(join(pen, &points[i - 1], &points[i], &points[i + 1]));
    }
    corners.push(end_corner(pen, &points[n - 2], &points[n - 1], &points[n - 1]));
    corners
}

/// Perpendicular offset pair at a free end of the segment `a → b`.
fn end_corner(pen: &Pen, a: &Point2, b: &Point2, at: &Point2) -> Corner {
    let offset = pen.offset(&left_normal((b - a).normalize()));
    Corner {
        left: vec![at + offset],
        right: vec![at - offset],
    }
}

/// Boundary at fraction `f` of the pen width, 0 being the left side and 1
/// the right side. Corner runs of unequal length are paired index-wise, the
/// shorter run repeating its last point.
fn boundary(corners: &[Corner], f: f64) -> Vec<Point2> {
    let mut points = Vec::with_capacity(corners.len() * 2);
    for corner in corners {
        if f <= 0.0 {
            points.extend_from_slice(&corner.left);
            continue;
        }
        if f >= 1.0 {
            points.extend_from_slice(&corner.right);
            continue;
        }
        let count = corner.left.len().max(corner.right.len());
        for i in 0..count {
            let (Some(l), Some(r)) = (
                corner.left.get(i).or(corner.left.last()),
                corner.right.get(i).or(corner.right.last()),
            ) else {
                continue;
            };
            points.push(l + (r - l) * f);
        }
    }
    points
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::stroke::Outline;
    use crate::style::LineJoin;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn stroke(points: &[Point2], closed: bool, style: &StrokeStyle) -> Vec<Contour> {
        let cache = VertexCache::from_points(points, closed);
        StrokeSubpath::new(&cache, style).execute()
    }

    #[test]
    fn flat_segment_is_rectangle() {
        let style = StrokeStyle::new(2.0);
        let contours = stroke(&[p(0.0, 0.0), p(10.0, 0.0)], false, &style);
        assert_eq!(contours.len(), 1);
        assert_eq!(
            contours[0],
            vec![p(0.0, 1.0), p(10.0, 1.0), p(10.0, -1.0), p(0.0, -1.0)]
        );
    }

    #[test]
    fn square_caps_extend_both_ends() {
        let style = StrokeStyle::new(2.0).with_caps(LineCap::Square, LineCap::Square);
        let contours = stroke(&[p(0.0, 0.0), p(10.0, 0.0)], false, &style);
        let outline = Outline::from(contours);
        let bounds = outline.bounds().unwrap();
        assert_relative_eq!(bounds.min, p(-1.0, -1.0));
        assert_relative_eq!(bounds.max, p(11.0, 1.0));
    }

    #[test]
    fn closed_square_gives_ring() {
        let style = StrokeStyle::new(2.0);
        let contours = stroke(
            &[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)],
            true,
            &style,
        );
        assert_eq!(contours.len(), 2);
        let outline = Outline::from(contours);
        assert!(outline.contains(&p(0.0, 5.0)));
        assert!(outline.contains(&p(10.5, 5.0)));
        assert!(!outline.contains(&p(5.0, 5.0)));
        assert!(!outline.contains(&p(12.0, 5.0)));
    }

    #[test]
    fn compound_array_splits_into_sub_strokes() {
        let mut style = StrokeStyle::new(4.0);
        style.set_compound_array(&[0.0, 0.25, 0.75, 1.0]).unwrap();
        let contours = stroke(&[p(0.0, 0.0), p(10.0, 0.0)], false, &style);
        assert_eq!(contours.len(), 2);
        let outline = Outline::from(contours);
        assert!(outline.contains(&p(5.0, 1.5)));
        assert!(outline.contains(&p(5.0, -1.5)));
        assert!(!outline.contains(&p(5.0, 0.0)));
    }

    #[test]
    fn closed_compound_emits_two_contours_per_pair() {
        let mut style = StrokeStyle::new(4.0).with_line_join(LineJoin::Bevel);
        style.set_compound_array(&[0.0, 0.25, 0.75, 1.0]).unwrap();
        let contours = stroke(&[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)], true, &style);
        assert_eq!(contours.len(), 4);
    }

    #[test]
    fn degenerate_subpath_yields_nothing() {
        let style = StrokeStyle::new(2.0);
        assert!(stroke(&[p(1.0, 1.0)], false, &style).is_empty());
        assert!(stroke(&[], true, &style).is_empty());
    }

    #[test]
    fn repeated_execution_is_identical() {
        let style = StrokeStyle::new(3.0).with_line_join(LineJoin::Round);
        let points = [p(0.0, 0.0), p(10.0, 2.0), p(3.0, 9.0), p(12.0, 12.0)];
        assert_eq!(stroke(&points, false, &style), stroke(&points, false, &style));
    }
}
