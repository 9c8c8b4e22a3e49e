use std::borrow::Cow;
use std::f64::consts::PI;

use nalgebra::{Similarity2, Translation2, UnitComplex};

use crate::error::{Result, StrokeError};
use crate::geometry::{Subpath, VertexCache};
use crate::math::{point_to_segment_dist, Point2, Vector2, TOLERANCE};
use crate::stroke::{Contour, StrokeSubpath};

use super::{LineCap, LineJoin, StrokeStyle};

/// Number of sides of the polygon standing in for the round preset.
const ROUND_PRESET_SIDES: u32 = 24;

/// Built-in end decorations, all filled.
///
/// Shapes are expressed in half-width units so that a width scale of 1
/// gives a decoration twice as wide as the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum PresetAnchor {
    /// Triangle whose tip sits on the line's endpoint.
    Arrow,
    /// Disc centred on the endpoint.
    Round,
    /// Square rotated by 45°, centred on the endpoint.
    Diamond,
    /// Axis-aligned square centred on the endpoint.
    Square,
}

impl PresetAnchor {
    fn shape(self) -> Subpath {
        match self {
            Self::Arrow => Subpath::from_xy(&[(0.0, 0.0), (-1.0, -2.0), (1.0, -2.0)], true),
            Self::Diamond => Subpath::from_xy(
                &[(0.0, 1.0), (-1.0, 0.0), (0.0, -1.0), (1.0, 0.0)],
                true,
            ),
            Self::Square => Subpath::from_xy(
                &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)],
                true,
            ),
            Self::Round => {
                let step = 2.0 * PI / f64::from(ROUND_PRESET_SIDES);
                let points = (0..ROUND_PRESET_SIDES)
                    .map(|k| {
                        let angle = -PI / 2.0 + f64::from(k) * step;
                        Point2::new(angle.cos(), angle.sin())
                    })
                    .collect();
                Subpath::closed(points)
            }
        }
    }

    fn line_cap(self) -> CustomLineCap {
        CustomLineCap {
            shape: self.shape(),
            mode: AnchorMode::Fill,
            base_inset: 0.0,
            width_scale: 1.0,
        }
    }
}

/// How a custom decoration's shape is turned into geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum AnchorMode {
    /// The shape itself is filled.
    Fill,
    /// The shape is stroked with the line's width and its own sub-style.
    Stroke { line_join: LineJoin, line_cap: LineCap },
}

/// A decoration shape attached to a free end of an open subpath.
///
/// The shape lives in a local frame whose origin is the line's free end,
/// with `+y` pointing outward past the end and the line itself lying on the
/// negative y axis. It is scaled by `width * width_scale` when placed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomLineCap {
    shape: Subpath,
    mode: AnchorMode,
    base_inset: f64,
    width_scale: f64,
}

impl CustomLineCap {
    /// Creates a custom decoration.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidAnchor`] if the shape has fewer than two
    /// points, the width scale is not positive, the base inset is not finite,
    /// or the shape never reaches back along the line (devide distance not
    /// positive at unit width).
    pub fn new(shape: Subpath, mode: AnchorMode, base_inset: f64, width_scale: f64) -> Result<Self> {
        if shape.len() < 2 {
            return Err(StrokeError::InvalidAnchor(
                "shape needs at least 2 points".to_owned(),
            ));
        }
        if !(width_scale.is_finite() && width_scale > 0.0) {
            return Err(StrokeError::InvalidAnchor(format!(
                "width scale {width_scale} is not positive"
            )));
        }
        if !base_inset.is_finite() {
            return Err(StrokeError::InvalidAnchor(format!(
                "base inset {base_inset} is not finite"
            )));
        }
        let cap = Self {
            shape,
            mode,
            base_inset,
            width_scale,
        };
        if cap.devide_distance(1.0) <= 0.0 {
            return Err(StrokeError::InvalidAnchor(
                "shape does not cross the line axis".to_owned(),
            ));
        }
        Ok(cap)
    }

    /// Creates a filled decoration with no inset and unit width scale.
    ///
    /// # Errors
    ///
    /// See [`CustomLineCap::new`].
    pub fn fill(shape: Subpath) -> Result<Self> {
        Self::new(shape, AnchorMode::Fill, 0.0, 1.0)
    }

    /// Creates a stroked decoration with no inset and unit width scale.
    ///
    /// # Errors
    ///
    /// See [`CustomLineCap::new`].
    pub fn stroke(shape: Subpath, line_join: LineJoin, line_cap: LineCap) -> Result<Self> {
        Self::new(shape, AnchorMode::Stroke { line_join, line_cap }, 0.0, 1.0)
    }

    #[must_use]
    pub fn shape(&self) -> &Subpath {
        &self.shape
    }

    #[must_use]
    pub fn mode(&self) -> AnchorMode {
        self.mode
    }

    #[must_use]
    pub fn base_inset(&self) -> f64 {
        self.base_inset
    }

    #[must_use]
    pub fn width_scale(&self) -> f64 {
        self.width_scale
    }

    /// Radial distance from the free end at which the decoration takes over
    /// from the line.
    ///
    /// Fill mode: the deepest point where the scaled outline crosses the
    /// negative y axis. Stroke mode: the farthest axis point lying exactly
    /// half a line width from the scaled outline, i.e. where coverage of the
    /// stroked outline ends.
    #[must_use]
    pub fn devide_distance(&self, width: f64) -> f64 {
        let points = self.scaled_points(width);
        match self.mode {
            // A filled shape is always closed, whatever the subpath says.
            AnchorMode::Fill => axis_crossing_depth(&points, true),
            AnchorMode::Stroke { .. } => {
                stroked_axis_depth(&points, self.shape.closed, width * 0.5)
            }
        }
    }

    /// Farthest extent of the placed decoration from the free end.
    #[must_use]
    pub fn max_distance(&self, width: f64) -> f64 {
        let extent = self
            .scaled_points(width)
            .iter()
            .map(|p| p.coords.norm())
            .fold(0.0, f64::max);
        match self.mode {
            AnchorMode::Fill => extent,
            AnchorMode::Stroke { .. } => extent + width * 0.5,
        }
    }

    /// Produces the decoration's contours placed at `center`.
    ///
    /// The local `+y` axis is rotated onto `to − from`, the shape is scaled
    /// by `width * width_scale` and translated to `center`. Returns nothing
    /// when `from` and `to` coincide.
    #[must_use]
    pub fn generate_cap(&self, width: f64, from: &Point2, to: &Point2, center: &Point2) -> Vec<Contour> {
        self.generate_cap_for(&StrokeStyle::new(width), from, to, center)
    }

    /// Like [`generate_cap`](Self::generate_cap), sized by `line`'s width.
    /// Stroke-mode shapes keep the line's miter limit, tolerance and pen
    /// scale.
    #[must_use]
    pub fn generate_cap_for(
        &self,
        line: &StrokeStyle,
        from: &Point2,
        to: &Point2,
        center: &Point2,
    ) -> Vec<Contour> {
        let width = line.width();
        let dir = to - from;
        let len = dir.norm();
        if len < TOLERANCE {
            return Vec::new();
        }

        let rotation = UnitComplex::rotation_between(&Vector2::y(), &(dir / len));
        let transform = Similarity2::from_parts(
            Translation2::new(center.x, center.y),
            rotation,
            width * self.width_scale,
        );
        let points: Vec<Point2> = self
            .shape
            .points
            .iter()
            .map(|p| transform.transform_point(p))
            .collect();

        match self.mode {
            AnchorMode::Fill => vec![points],
            AnchorMode::Stroke {
                line_join,
                line_cap,
            } => {
                let style = line.decoration_style(line_join, line_cap);
                let cache = VertexCache::from_points(&points, self.shape.closed);
                StrokeSubpath::new(&cache, &style).execute()
            }
        }
    }

    fn scaled_points(&self, width: f64) -> Vec<Point2> {
        let s = width * self.width_scale;
        self.shape
            .points
            .iter()
            .map(|p| Point2::new(p.x * s, p.y * s))
            .collect()
    }
}

/// End decoration of an open subpath.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Anchor {
    Preset(PresetAnchor),
    Custom(CustomLineCap),
}

impl Anchor {
    /// The decoration's shape description; presets are materialised on demand.
    #[must_use]
    pub fn line_cap(&self) -> Cow<'_, CustomLineCap> {
        match self {
            Self::Preset(preset) => Cow::Owned(preset.line_cap()),
            Self::Custom(cap) => Cow::Borrowed(cap),
        }
    }
}

impl From<PresetAnchor> for Anchor {
    fn from(preset: PresetAnchor) -> Self {
        Self::Preset(preset)
    }
}

impl From<CustomLineCap> for Anchor {
    fn from(cap: CustomLineCap) -> Self {
        Self::Custom(cap)
    }
}

/// Edges of a shape, including the closing edge when `closed`.
fn shape_edges(points: &[Point2], closed: bool) -> Vec<(Point2, Point2)> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let count = if closed { n } else { n - 1 };
    (0..count)
        .map(|i| (points[i], points[(i + 1) % n]))
        .collect()
}

/// Deepest crossing of the outline with the negative y axis, as a positive
/// distance (0 when the outline never reaches below the origin).
fn axis_crossing_depth(points: &[Point2], closed: bool) -> f64 {
    let mut depth = 0.0_f64;
    for (a, b) in shape_edges(points, closed) {
        if a.x.abs() < TOLERANCE && b.x.abs() < TOLERANCE {
            // Edge lies on the axis.
            depth = depth.max(-a.y).max(-b.y);
            continue;
        }
        if (a.x <= 0.0 && b.x >= 0.0) || (a.x >= 0.0 && b.x <= 0.0) {
            let t = a.x / (a.x - b.x);
            depth = depth.max(-(a.y + t * (b.y - a.y)));
        }
    }
    depth
}

/// Farthest point `(0, −t)` on the axis lying exactly `half_width` from the
/// outline, as the positive distance `t`.
fn stroked_axis_depth(points: &[Point2], closed: bool, half_width: f64) -> f64 {
    let edges = shape_edges(points, closed);
    let mut candidates = Vec::new();

    for (a, b) in &edges {
        // Circles of radius `half_width` around the edge endpoints.
        for p in [a, b] {
            let h = half_width * half_width - p.x * p.x;
            if h >= 0.0 {
                let s = h.sqrt();
                candidates.push(-p.y + s);
                candidates.push(-p.y - s);
            }
        }

        // Lines parallel to the edge at `half_width`.
        let d = b - a;
        let len = d.norm();
        if len < TOLERANCE {
            continue;
        }
        let normal = Vector2::new(-d.y / len, d.x / len);
        if normal.y.abs() < TOLERANCE {
            continue;
        }
        let c = normal.x * a.x + normal.y * a.y;
        for s in [half_width, -half_width] {
            candidates.push(-(c + s) / normal.y);
        }
    }

    let distance_to_outline = |q: &Point2| {
        edges
            .iter()
            .map(|(a, b)| point_to_segment_dist(q, a, b))
            .fold(f64::INFINITY, f64::min)
    };

    let eps = 1e-9 * (1.0 + half_width);
    candidates
        .into_iter()
        .filter(|t| *t >= 0.0 && (distance_to_outline(&Point2::new(0.0, -t)) - half_width).abs() <= eps)
        .fold(0.0, f64::max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::stroke::Outline;

    fn chevron() -> Subpath {
        Subpath::from_xy(&[(-1.0, -2.0), (0.0, 0.0), (1.0, -2.0)], false)
    }

    #[test]
    fn arrow_devide_distance_is_its_length() {
        let cap = PresetAnchor::Arrow.line_cap();
        assert_relative_eq!(cap.devide_distance(1.0), 2.0);
        assert_relative_eq!(cap.devide_distance(3.0), 6.0);
    }

    #[test]
    fn centred_presets_reach_one_unit_back() {
        for preset in [PresetAnchor::Diamond, PresetAnchor::Square, PresetAnchor::Round] {
            let cap = preset.line_cap();
            assert_relative_eq!(cap.devide_distance(2.0), 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn width_scale_enlarges_devide_distance() {
        let shape = PresetAnchor::Arrow.shape();
        let cap = CustomLineCap::new(shape, AnchorMode::Fill, 0.0, 2.5).unwrap();
        assert_relative_eq!(cap.devide_distance(2.0), 10.0);
    }

    #[test]
    fn stroked_chevron_ends_inside_its_arms() {
        let cap = CustomLineCap::stroke(chevron(), LineJoin::Miter, LineCap::Flat).unwrap();
        // Axis points at distance 0.5 from arms of slope 2 sit at 0.5 * sqrt(5).
        assert_relative_eq!(cap.devide_distance(1.0), 0.5 * 5.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn stroked_closed_arrow_ends_outside_its_base() {
        let shape = PresetAnchor::Arrow.shape();
        let cap = CustomLineCap::stroke(shape, LineJoin::Miter, LineCap::Flat).unwrap();
        assert_relative_eq!(cap.devide_distance(1.0), 2.5, epsilon = 1e-9);
    }

    #[test]
    fn shape_above_axis_rejected() {
        let shape = Subpath::from_xy(&[(-1.0, 1.0), (1.0, 1.0), (0.0, 2.0)], true);
        let err = CustomLineCap::fill(shape).unwrap_err();
        assert!(matches!(err, StrokeError::InvalidAnchor(_)));
    }

    #[test]
    fn invalid_width_scale_rejected() {
        assert!(CustomLineCap::new(chevron(), AnchorMode::Fill, 0.0, 0.0).is_err());
    }

    #[test]
    fn max_distance_covers_shape() {
        let cap = PresetAnchor::Square.line_cap();
        assert_relative_eq!(cap.max_distance(1.0), 2.0_f64.sqrt());
        let stroked = CustomLineCap::stroke(chevron(), LineJoin::Bevel, LineCap::Flat).unwrap();
        assert_relative_eq!(stroked.max_distance(2.0), 2.0 * 5.0_f64.sqrt() + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn generated_arrow_points_along_direction() {
        let cap = PresetAnchor::Arrow.line_cap();
        let contours = cap.generate_cap(
            1.0,
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(10.0, 0.0),
        );
        assert_eq!(contours.len(), 1);
        let arrow = &contours[0];
        // Tip on the end point, base two units back.
        assert_relative_eq!(arrow[0], Point2::new(10.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(arrow[1].x, 8.0, epsilon = 1e-12);
        assert_relative_eq!(arrow[2].x, 8.0, epsilon = 1e-12);
        assert_relative_eq!((arrow[1].y - arrow[2].y).abs(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn stroked_cap_produces_stroke_outline() {
        let cap = CustomLineCap::stroke(chevron(), LineJoin::Bevel, LineCap::Flat).unwrap();
        let contours = cap.generate_cap(
            1.0,
            &Point2::new(0.0, -5.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(0.0, 0.0),
        );
        assert_eq!(contours.len(), 1);
        assert!(contours[0].len() >= 6);
    }

    #[test]
    fn degenerate_direction_produces_nothing() {
        let cap = PresetAnchor::Diamond.line_cap();
        let p = Point2::new(1.0, 1.0);
        assert!(cap.generate_cap(1.0, &p, &p, &p).is_empty());
    }

    #[test]
    fn open_filled_shape_is_measured_closed() {
        // The implicit closing edge (1,-2) -> (-1,-2) crosses the axis at y = -2.
        let cap = CustomLineCap::fill(chevron()).unwrap();
        assert_relative_eq!(cap.devide_distance(1.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(cap.devide_distance(3.0), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn stroked_cap_follows_line_miter_limit() {
        let cap = CustomLineCap::stroke(chevron(), LineJoin::Miter, LineCap::Flat).unwrap();
        let (from, tip) = (Point2::new(0.0, -5.0), Point2::new(0.0, 0.0));

        let sharp = cap.generate_cap(1.0, &from, &tip, &tip);
        let mut line = StrokeStyle::new(1.0);
        line.set_miter_limit(1.0).unwrap();
        let clipped = cap.generate_cap_for(&line, &from, &tip, &tip);

        // A miter limit of one half width truncates the tip into two points.
        assert_eq!(sharp[0].len(), 7);
        assert_eq!(clipped[0].len(), 8);
        let reach = |c: &Contour| c.iter().map(|q| q.y).fold(f64::MIN, f64::max);
        assert!(reach(&clipped[0]) < reach(&sharp[0]));
        assert_relative_eq!(reach(&clipped[0]), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn stroked_cap_follows_line_scale() {
        let cap = CustomLineCap::stroke(chevron(), LineJoin::Bevel, LineCap::Flat).unwrap();
        let (from, tip) = (Point2::new(0.0, -5.0), Point2::new(0.0, 0.0));
        let mut line = StrokeStyle::new(1.0);
        line.set_scale(3.0, 1.0).unwrap();
        let plain = Outline::from(cap.generate_cap(1.0, &from, &tip, &tip));
        let wide = Outline::from(cap.generate_cap_for(&line, &from, &tip, &tip));
        let (plain, wide) = (plain.bounds().unwrap(), wide.bounds().unwrap());
        assert!(wide.width() > plain.width());
    }

    #[test]
    fn anchor_resolves_presets() {
        let anchor = Anchor::from(PresetAnchor::Diamond);
        assert_eq!(anchor.line_cap().mode(), AnchorMode::Fill);
        let custom = Anchor::from(CustomLineCap::fill(chevron()).unwrap());
        assert!(matches!(custom.line_cap(), Cow::Borrowed(_)));
    }
}
