use crate::math::Vector2;
use crate::style::{LineJoin, PenAlignment, StrokeStyle};

/// Per-subpath view of a [`StrokeStyle`] used by the join and cap builders.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pen {
    half_width: f64,
    scale: Vector2,
    line_join: LineJoin,
    miter_limit: f64,
    tolerance: f64,
    outset: bool,
    compound: bool,
}

impl Pen {
    /// Builds the pen for one subpath; outset alignment only matters when
    /// the subpath is closed.
    pub(crate) fn new(style: &StrokeStyle, closed: bool) -> Self {
        Self {
            half_width: style.half_width(),
            scale: style.scale(),
            line_join: style.line_join(),
            miter_limit: style.miter_limit(),
            tolerance: style.tolerance(),
            outset: closed && style.alignment() == PenAlignment::Outset,
            compound: !style.compound_array().is_empty(),
        }
    }

    /// Offset vector for a unit normal: the normal at half width, scaled
    /// component-wise by the pen scale.
    pub(crate) fn offset(&self, normal: &Vector2) -> Vector2 {
        Vector2::new(
            normal.x * self.half_width * self.scale.x,
            normal.y * self.half_width * self.scale.y,
        )
    }

    /// Largest offset distance the pen reaches.
    pub(crate) fn reach(&self) -> f64 {
        self.half_width * self.scale.x.abs().max(self.scale.y.abs())
    }

    /// Distance from the vertex beyond which a miter is limited.
    pub(crate) fn miter_distance(&self) -> f64 {
        self.reach() * self.miter_limit
    }

    /// Angular step of round joins at the pen's reach.
    pub(crate) fn arc_step(&self) -> f64 {
        arc_step(self.reach(), self.tolerance)
    }

    pub(crate) fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub(crate) fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub(crate) fn is_outset(&self) -> bool {
        self.outset
    }

    pub(crate) fn is_compound(&self) -> bool {
        self.compound
    }
}

/// Angle subtended by a chord that deviates at most `tolerance` from an arc
/// of the given radius.
pub(crate) fn arc_step(radius: f64, tolerance: f64) -> f64 {
    2.0 * (radius / (radius + tolerance)).acos()
}
