use crate::math::{distance, Point2, MIN_VERTEX_DISTANCE};

use super::Subpath;

/// A cached vertex: its position and the length of the segment to the next
/// vertex (zero for the last vertex).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedVertex {
    pub point: Point2,
    pub distance: f64,
}

/// Collapsed vertex sequence of one subpath.
///
/// Consecutive points closer than [`MIN_VERTEX_DISTANCE`] are merged. A
/// closed subpath gets a trailing vertex equal to its first point, so every
/// segment including the closing edge is `at(i) → at(i + 1)`. A cache with
/// fewer than two vertices has nothing to stroke.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexCache {
    vertices: Vec<CachedVertex>,
    closed: bool,
}

impl VertexCache {
    /// Builds the cache for a subpath.
    #[must_use]
    pub fn build(subpath: &Subpath) -> Self {
        Self::from_points(&subpath.points, subpath.closed)
    }

    /// Builds the cache from raw points.
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        let mut kept: Vec<Point2> = Vec::with_capacity(points.len() + 1);

        for &p in points {
            match kept.last() {
                Some(last) if distance(last, &p) < MIN_VERTEX_DISTANCE => {}
                _ => kept.push(p),
            }
        }

        if closed {
            if let Some(&first) = kept.first() {
                let last = kept[kept.len() - 1];
                if kept.len() > 1 && distance(&last, &first) > MIN_VERTEX_DISTANCE {
                    kept.push(first);
                } else if kept.len() > 1 {
                    // Explicit close: snap the duplicate exactly onto the first point.
                    let n = kept.len();
                    kept[n - 1] = first;
                }
            }
        } else if kept.len() > 1 {
            // The real endpoint always survives, replacing a collapsed neighbour.
            if let Some(&real_last) = points.last() {
                let n = kept.len();
                kept[n - 1] = real_last;
            }
        }

        let vertices = kept
            .iter()
            .enumerate()
            .map(|(i, p)| CachedVertex {
                point: *p,
                distance: kept.get(i + 1).map_or(0.0, |next| distance(p, next)),
            })
            .collect();

        Self { vertices, closed }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the point at index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    #[must_use]
    pub fn at(&self, i: usize) -> Point2 {
        self.vertices[i].point
    }

    /// Length of the segment starting at vertex `i`.
    #[must_use]
    pub fn distance(&self, i: usize) -> f64 {
        self.vertices.get(i).map_or(0.0, |v| v.distance)
    }

    #[must_use]
    pub fn first(&self) -> Option<Point2> {
        self.vertices.first().map(|v| v.point)
    }

    #[must_use]
    pub fn last(&self) -> Option<Point2> {
        self.vertices.last().map(|v| v.point)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub fn vertices(&self) -> &[CachedVertex] {
        &self.vertices
    }

    /// Copies the cached points out.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        self.vertices.iter().map(|v| v.point).collect()
    }

    /// Sum of all segment lengths, including the closing edge.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.vertices.iter().map(|v| v.distance).sum()
    }

    /// Returns `true` if there are at least two distinct vertices.
    #[must_use]
    pub fn is_strokable(&self) -> bool {
        self.vertices.len() >= 2
    }
}
