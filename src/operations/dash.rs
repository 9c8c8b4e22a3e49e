use crate::geometry::VertexCache;
use crate::math::{clip_segment, distance, point_along, Point2, Rect, MIN_VERTEX_DISTANCE};
use crate::style::DashPattern;

/// Dashes of a subpath grouped by which free ends they touch.
///
/// Every dash of a closed subpath is interior.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashBuckets {
    /// Dashes starting at the subpath's first point.
    pub start: Vec<Vec<Point2>>,
    /// Dashes ending at the subpath's last point.
    pub end: Vec<Vec<Point2>>,
    /// Dashes covering the subpath from its first to its last point.
    pub both: Vec<Vec<Point2>>,
    /// Dashes touching neither free end.
    pub interior: Vec<Vec<Point2>>,
}

impl DashBuckets {
    /// Total number of dashes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.start.len() + self.end.len() + self.both.len() + self.interior.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Position inside the scaled dash pattern.
#[derive(Debug, Clone)]
struct DashState<'a> {
    lengths: &'a [f64],
    index: usize,
    remaining: f64,
}

impl<'a> DashState<'a> {
    /// Locates `offset` (already reduced into `[0, total)`) in the pattern.
    fn new(lengths: &'a [f64], offset: f64) -> Self {
        let mut rest = offset;
        let mut index = 0;
        for _ in 0..lengths.len() {
            if rest < lengths[index] {
                break;
            }
            rest -= lengths[index];
            index = (index + 1) % lengths.len();
        }
        Self {
            lengths,
            index,
            remaining: lengths[index] - rest,
        }
    }

    fn is_on(&self) -> bool {
        self.index % 2 == 0
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.lengths.len();
        self.remaining = self.lengths[self.index];
    }

    /// Consumes `length` without producing geometry.
    fn skip(&mut self, mut length: f64) {
        while self.remaining <= length {
            length -= self.remaining;
            self.advance();
        }
        self.remaining -= length;
    }
}

/// Splits a cached subpath into "on" runs of a dash pattern.
///
/// The pattern and phase are in units of the stroke width. The walk covers
/// every cached segment, including the closing edge of a closed subpath.
/// Every run is a two-point piece of a single segment: a dash reaching a
/// vertex ends there and resumes on the next segment, and runs separated by
/// an "off" interval are never merged.
#[derive(Debug)]
pub struct DashSubpath<'a> {
    cache: &'a VertexCache,
    pattern: &'a DashPattern,
    phase: f64,
    width: f64,
    clip: Option<Rect>,
}

impl<'a> DashSubpath<'a> {
    /// Creates a new dash operation.
    #[must_use]
    pub fn new(cache: &'a VertexCache, pattern: &'a DashPattern, phase: f64, width: f64) -> Self {
        Self {
            cache,
            pattern,
            phase,
            width,
            clip: None,
        }
    }

    /// Segments wholly outside `clip` produce no dash geometry.
    #[must_use]
    pub fn with_clip(mut self, clip: Option<Rect>) -> Self {
        self.clip = clip;
        self
    }

    /// Executes the dash walk, returning the "on" runs as open polylines.
    ///
    /// A solid pattern returns the whole subpath as a single run.
    #[must_use]
    pub fn execute(&self) -> Vec<Vec<Point2>> {
        if !self.cache.is_strokable() {
            return Vec::new();
        }

        let lengths: Vec<f64> = self.pattern.as_slice().iter().map(|l| l * self.width).collect();
        let total: f64 = lengths.iter().sum();
        if lengths.is_empty() || !(total.is_finite() && total > 0.0) {
            return vec![self.cache.points()];
        }

        let offset = (self.phase * self.width).rem_euclid(total);
        let mut state = DashState::new(&lengths, offset);
        let mut dashes = Vec::new();
        let mut current: Vec<Point2> = Vec::new();

        for i in 0..self.cache.len() - 1 {
            let a = self.cache.at(i);
            let b = self.cache.at(i + 1);
            let seg_len = self.cache.distance(i);

            if let Some(rect) = &self.clip {
                if clip_segment(&a, &b, rect).is_none() {
                    finish(&mut dashes, &mut current);
                    state.skip(seg_len);
                    continue;
                }
            }

            if state.is_on() && current.is_empty() {
                current.push(a);
            }

            let mut pos = 0.0;
            loop {
                if state.remaining <= seg_len - pos {
                    pos += state.remaining;
                    let p = point_along(&a, &b, (pos / seg_len).min(1.0));
                    if state.is_on() {
                        push_distinct(&mut current, p);
                        finish(&mut dashes, &mut current);
                    } else {
                        current.push(p);
                    }
                    state.advance();
                } else {
                    state.remaining -= seg_len - pos;
                    // Runs never cross a vertex, the next segment restarts at `b`.
                    if state.is_on() {
                        push_distinct(&mut current, b);
                        finish(&mut dashes, &mut current);
                    }
                    break;
                }
            }
        }
        finish(&mut dashes, &mut current);
        dashes
    }

    /// Executes the dash walk and sorts the runs by the free ends they touch.
    #[must_use]
    pub fn execute_classified(&self) -> DashBuckets {
        let dashes = self.execute();
        let mut buckets = DashBuckets::default();

        let ends = if self.cache.is_closed() {
            None
        } else {
            self.cache.first().zip(self.cache.last())
        };
        let Some((first, last)) = ends else {
            buckets.interior = dashes;
            return buckets;
        };

        for dash in dashes {
            let (Some(head), Some(tail)) = (dash.first(), dash.last()) else {
                continue;
            };
            let at_start = distance(head, &first) < MIN_VERTEX_DISTANCE;
            let at_end = distance(tail, &last) < MIN_VERTEX_DISTANCE;
            match (at_start, at_end) {
                (true, true) => buckets.both.push(dash),
                (true, false) => buckets.start.push(dash),
                (false, true) => buckets.end.push(dash),
                (false, false) => buckets.interior.push(dash),
            }
        }
        buckets
    }
}

fn push_distinct(run: &mut Vec<Point2>, p: Point2) {
    match run.last() {
        Some(last) if distance(last, &p) < MIN_VERTEX_DISTANCE => {}
        _ => run.push(p),
    }
}

fn finish(dashes: &mut Vec<Vec<Point2>>, current: &mut Vec<Point2>) {
    let run = std::mem::take(current);
    if run.len() >= 2 {
        dashes.push(run);
    }
}
