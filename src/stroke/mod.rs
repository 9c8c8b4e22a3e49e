mod cap;
mod complex;
mod join;
mod pen;
mod stroker;

pub use complex::StrokePath;
pub use stroker::StrokeSubpath;

use crate::math::{Point2, Rect};

/// A closed polygon of output geometry; the closing edge is implicit.
pub type Contour = Vec<Point2>;

/// Fill geometry produced by stroking, interpreted with the non-zero
/// winding rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    contours: Vec<Contour>,
}

impl Outline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a contour; contours with fewer than two points are dropped.
    pub fn push(&mut self, contour: Contour) {
        if contour.len() >= 2 {
            self.contours.push(contour);
        }
    }

    /// Number of contours.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter()
    }

    #[must_use]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    #[must_use]
    pub fn into_contours(self) -> Vec<Contour> {
        self.contours
    }

    /// Sum of the winding numbers of every contour around `point`.
    #[must_use]
    pub fn winding_number(&self, point: &Point2) -> i32 {
        self.contours
            .iter()
            .map(|contour| contour_winding(contour, point))
            .sum()
    }

    /// Returns `true` if `point` is filled under the non-zero rule.
    #[must_use]
    pub fn contains(&self, point: &Point2) -> bool {
        self.winding_number(point) != 0
    }

    /// Bounding box of all contour points, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.contours.iter().flatten())
    }
}

impl Extend<Contour> for Outline {
    fn extend<I: IntoIterator<Item = Contour>>(&mut self, iter: I) {
        for contour in iter {
            self.push(contour);
        }
    }
}

impl From<Vec<Contour>> for Outline {
    fn from(contours: Vec<Contour>) -> Self {
        let mut outline = Self::new();
        outline.extend(contours);
        outline
    }
}

impl IntoIterator for Outline {
    type Item = Contour;
    type IntoIter = std::vec::IntoIter<Contour>;

    fn into_iter(self) -> Self::IntoIter {
        self.contours.into_iter()
    }
}

/// Winding number of a closed polygon around `point` (crossing count with
/// upward edges counted +1 and downward edges −1).
fn contour_winding(contour: &[Point2], point: &Point2) -> i32 {
    let n = contour.len();
    let mut winding = 0;
    for i in 0..n {
        let a = &contour[i];
        let b = &contour[(i + 1) % n];
        let side = (b.x - a.x) * (point.y - a.y) - (point.x - a.x) * (b.y - a.y);
        if a.y <= point.y {
            if b.y > point.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64, ccw: bool) -> Contour {
        let mut c = vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ];
        if !ccw {
            c.reverse();
        }
        c
    }

    #[test]
    fn winding_of_nested_squares() {
        let mut outline = Outline::new();
        outline.push(square(0.0, 0.0, 10.0, true));
        outline.push(square(2.0, 2.0, 6.0, false));
        assert_eq!(outline.winding_number(&Point2::new(1.0, 1.0)), 1);
        assert_eq!(outline.winding_number(&Point2::new(5.0, 5.0)), 0);
        assert!(!outline.contains(&Point2::new(20.0, 5.0)));
    }

    #[test]
    fn same_orientation_accumulates() {
        let outline = Outline::from(vec![square(0.0, 0.0, 10.0, false), square(2.0, 2.0, 6.0, false)]);
        assert_eq!(outline.winding_number(&Point2::new(5.0, 5.0)), -2);
        assert!(outline.contains(&Point2::new(5.0, 5.0)));
    }

    #[test]
    fn degenerate_contours_dropped() {
        let mut outline = Outline::new();
        outline.push(vec![Point2::new(1.0, 1.0)]);
        outline.push(Vec::new());
        assert!(outline.is_empty());
        assert!(outline.bounds().is_none());
    }

    #[test]
    fn bounds_cover_all_contours() {
        let outline = Outline::from(vec![square(0.0, 0.0, 1.0, true), square(5.0, -3.0, 1.0, true)]);
        let bounds = outline.bounds().unwrap();
        assert_eq!(bounds.min, Point2::new(0.0, -3.0));
        assert_eq!(bounds.max, Point2::new(6.0, 1.0));
        assert_eq!(outline.len(), 2);
    }
}
