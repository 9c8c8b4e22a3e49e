use tracing::debug;

use crate::geometry::{Path, Subpath, VertexCache};
use crate::operations::{AnchorGenerator, DashSubpath, PathZoom};
use crate::style::{LineCap, PenAlignment, StrokeStyle};

use super::{Outline, StrokeSubpath};

/// Strokes a whole path: pen alignment, anchors, dashing, then the core
/// stroker for every resulting piece.
#[derive(Debug)]
pub struct StrokePath<'a> {
    style: &'a StrokeStyle,
}

impl<'a> StrokePath<'a> {
    #[must_use]
    pub fn new(style: &'a StrokeStyle) -> Self {
        Self { style }
    }

    /// Strokes every subpath of `path` into a single outline.
    #[must_use]
    pub fn execute(&self, path: &Path) -> Outline {
        let mut outline = Outline::new();
        for subpath in path.iter() {
            self.stroke_subpath(subpath, &mut outline);
        }
        outline
    }

    /// Strokes one subpath, appending its contours to `outline`.
    pub fn stroke_subpath(&self, subpath: &Subpath, outline: &mut Outline) {
        let cache = VertexCache::build(subpath);
        if !cache.is_strokable() {
            debug!(points = subpath.len(), "subpath has fewer than two distinct points, skipped");
            return;
        }

        let cache = if cache.is_closed() {
            self.align(cache)
        } else {
            cache
        };

        let mut start_cap = self.style.start_cap();
        let mut end_cap = self.style.end_cap();

        let has_anchors = self.style.start_anchor().is_some() || self.style.end_anchor().is_some();
        let cache = if !cache.is_closed() && has_anchors {
            let anchored = AnchorGenerator::new(&cache, self.style).execute();
            outline.extend(anchored.decorations);
            if anchored.start_anchored {
                start_cap = LineCap::Flat;
            }
            if anchored.end_anchored {
                end_cap = LineCap::Flat;
            }
            match anchored.line {
                Some(line) => line,
                None => return,
            }
        } else {
            cache
        };

        if self.style.is_dashed() {
            self.stroke_dashed(&cache, start_cap, end_cap, outline);
        } else {
            outline.extend(
                StrokeSubpath::new(&cache, self.style)
                    .with_caps(start_cap, end_cap)
                    .execute(),
            );
        }
    }

    /// Moves a closed centerline by half the width for inset/outset pens.
    fn align(&self, cache: VertexCache) -> VertexCache {
        let distance = match self.style.alignment() {
            PenAlignment::Center => return cache,
            PenAlignment::Inset => -self.style.half_width(),
            PenAlignment::Outset => self.style.half_width(),
        };
        let mut ring = cache.points();
        ring.pop();
        let zoomed = PathZoom::new(ring, distance).execute();
        let aligned = VertexCache::from_points(&zoomed, true);
        if aligned.is_strokable() {
            aligned
        } else {
            debug!("aligned subpath collapsed, stroking the unaligned centerline");
            cache
        }
    }

    fn stroke_dashed(&self, cache: &VertexCache, start_cap: LineCap, end_cap: LineCap, outline: &mut Outline) {
        let dash_cap = self.style.dash_cap();
        let buckets = DashSubpath::new(
            cache,
            self.style.dash_pattern(),
            self.style.dash_offset(),
            self.style.width(),
        )
        .with_clip(self.style.dash_clip())
        .execute_classified();

        let groups = [
            (buckets.start, start_cap, dash_cap),
            (buckets.end, dash_cap, end_cap),
            (buckets.both, start_cap, end_cap),
            (buckets.interior, dash_cap, dash_cap),
        ];
        for (dashes, first, last) in groups {
            for dash in dashes {
                let piece = VertexCache::from_points(&dash, false);
                outline.extend(
                    StrokeSubpath::new(&piece, self.style)
                        .with_caps(first, last)
                        .execute(),
                );
            }
        }
    }
}
