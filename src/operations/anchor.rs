use std::borrow::Cow;

use tracing::debug;

use crate::geometry::VertexCache;
use crate::math::{circle_segment_intersect, distance, point_along, Point2};
use crate::stroke::Contour;
use crate::style::{Anchor, AnchorMode, CustomLineCap, StrokeStyle};

/// Outcome of attaching end decorations to an open subpath.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnchoredLine {
    /// The shortened line; `None` when the decorations swallow it.
    pub line: Option<VertexCache>,
    /// Decoration geometry, ready to be merged into the outline.
    pub decorations: Vec<Contour>,
    /// Whether the start end carries a decoration (and gets a flat cap).
    pub start_anchored: bool,
    /// Whether the end carries a decoration (and gets a flat cap).
    pub end_anchored: bool,
}

/// Where a line is cut for an anchor: a parameter on one segment.
#[derive(Debug, Clone, Copy)]
struct Cut {
    /// Segment index in forward order (`at(segment) → at(segment + 1)`).
    segment: usize,
    /// Parameter along that segment in forward order.
    t: f64,
    point: Point2,
}

impl Cut {
    fn precedes(&self, other: &Cut) -> bool {
        self.segment < other.segment || (self.segment == other.segment && self.t < other.t)
    }
}

/// Places the style's start and end anchors on an open subpath and
/// shortens the line so that it ends where the decorations take over.
#[derive(Debug)]
pub struct AnchorGenerator<'a> {
    cache: &'a VertexCache,
    style: &'a StrokeStyle,
}

impl<'a> AnchorGenerator<'a> {
    #[must_use]
    pub fn new(cache: &'a VertexCache, style: &'a StrokeStyle) -> Self {
        Self { cache, style }
    }

    /// Executes the anchor placement.
    ///
    /// Closed or degenerate subpaths are returned untouched.
    #[must_use]
    pub fn execute(&self) -> AnchoredLine {
        let width = self.style.width();
        let start = resolve(self.style.start_anchor(), width, "start");
        let end = resolve(self.style.end_anchor(), width, "end");

        let mut result = AnchoredLine {
            line: Some(self.cache.clone()),
            start_anchored: start.is_some(),
            end_anchored: end.is_some(),
            ..AnchoredLine::default()
        };
        if self.cache.is_closed() || !self.cache.is_strokable() || (start.is_none() && end.is_none()) {
            result.start_anchored = false;
            result.end_anchored = false;
            return result;
        }

        let points = self.cache.points();
        let n = points.len();
        let first = points[0];
        let last = points[n - 1];

        let start_cut = start.as_ref().map(|cap| self.start_cut(&points, cap));
        let end_cut = end.as_ref().map(|cap| self.end_cut(&points, cap));

        let too_short = match (start_cut, end_cut) {
            (Some(None), _) | (_, Some(None)) => true,
            (Some(Some(s)), Some(Some(e))) => !s.precedes(&e),
            _ => false,
        };

        if too_short {
            debug!(length = self.cache.total_length(), "line too short for its anchors");
            if let Some(cap) = &start {
                result.decorations.extend(cap.generate_cap_for(self.style, &last, &first, &first));
            }
            if let Some(cap) = &end {
                result.decorations.extend(cap.generate_cap_for(self.style, &first, &last, &last));
            }
            result.line = None;
            return result;
        }

        let start_cut = start_cut.flatten();
        let end_cut = end_cut.flatten();

        let mut line = Vec::with_capacity(n);
        match start_cut {
            Some(cut) => {
                line.push(cut.point);
                line.extend_from_slice(&points[cut.segment + 1..]);
            }
            None => line.extend_from_slice(&points),
        }
        if let Some(cut) = end_cut {
            // Keep vertices up to and including the start of the cut segment.
            let keep = match start_cut {
                Some(s) => cut.segment - s.segment + 1,
                None => cut.segment + 1,
            };
            line.truncate(keep);
            line.push(cut.point);
        }

        if let (Some(cap), Some(cut)) = (&start, start_cut) {
            result.decorations.extend(cap.generate_cap_for(self.style, &cut.point, &first, &first));
        }
        if let (Some(cap), Some(cut)) = (&end, end_cut) {
            result.decorations.extend(cap.generate_cap_for(self.style, &cut.point, &last, &last));
        }

        let line = VertexCache::from_points(&line, false);
        result.line = line.is_strokable().then_some(line);
        result
    }

    fn start_cut(&self, points: &[Point2], cap: &CustomLineCap) -> Option<Cut> {
        let (segment, t, point) = self.cut_from_end(points.iter(), cap)?;
        Some(Cut { segment, t, point })
    }

    fn end_cut(&self, points: &[Point2], cap: &CustomLineCap) -> Option<Cut> {
        let (segment, t, point) = self.cut_from_end(points.iter().rev(), cap)?;
        Some(Cut {
            segment: points.len() - 2 - segment,
            t: 1.0 - t,
            point,
        })
    }

    /// Walks from the free end (the first point of `points`) until the
    /// radial distance reaches the devide distance. Returns the segment
    /// index and parameter in walk order and the cut point.
    fn cut_from_end<'p>(
        &self,
        points: impl Iterator<Item = &'p Point2> + Clone,
        cap: &CustomLineCap,
    ) -> Option<(usize, f64, Point2)> {
        let width = self.style.width();
        let radius = cap.devide_distance(width);
        let mut iter = points.clone();
        let free = *iter.next()?;

        let inset = match cap.mode() {
            AnchorMode::Fill => width * cap.base_inset() * cap.width_scale(),
            AnchorMode::Stroke { .. } => 0.0,
        };

        for (i, (a, b)) in points.clone().zip(iter).enumerate() {
            if distance(&free, b) < radius {
                continue;
            }
            let t = circle_segment_intersect(&free, radius, a, b)?;
            let seg_len = distance(a, b);
            let t = (t - inset / seg_len).clamp(0.0, 1.0);
            return Some((i, t, point_along(a, b, t)));
        }
        None
    }
}

fn resolve<'s>(anchor: Option<&'s Anchor>, width: f64, end: &str) -> Option<Cow<'s, CustomLineCap>> {
    let cap = anchor?.line_cap();
    if cap.devide_distance(width) > 0.0 {
        Some(cap)
    } else {
        debug!(end, width, "anchor has no positive devide distance, ignored");
        None
    }
}
