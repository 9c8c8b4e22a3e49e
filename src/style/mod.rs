mod anchor;
mod compound;
mod dash;

pub use anchor::{Anchor, AnchorMode, CustomLineCap, PresetAnchor};
pub use compound::CompoundArray;
pub use dash::DashPattern;

use crate::error::{Result, StrokeError};
use crate::math::{Rect, Vector2};

/// Default miter limit, as a multiple of the half width.
pub const DEFAULT_MITER_LIMIT: f64 = 10.0;

/// Default maximum deviation of round joins and caps from the true arc.
pub const DEFAULT_TOLERANCE: f64 = 0.125;

/// Geometry inserted where two segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum LineJoin {
    /// Sharp corner; clipped to a truncated miter, then bevel, past the limit.
    #[default]
    Miter,
    /// Sharp corner; straight to bevel at or past the limit.
    SvgMiterClipped,
    Bevel,
    Round,
}

/// Geometry inserted at a free end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum LineCap {
    #[default]
    Flat,
    Square,
    Round,
    Triangle,
}

/// Where the pen sits relative to a closed centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum PenAlignment {
    #[default]
    Center,
    /// Stroke lies entirely inside the figure.
    Inset,
    /// Stroke lies entirely outside the figure.
    Outset,
}

/// Immutable description of the pen used to stroke a path.
///
/// Infallible fields are set with the `with_*` builders. Fields with
/// invariants are set with the fallible `set_*` methods, which leave the
/// previous value in place when they reject their input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct StrokeStyle {
    width: f64,
    line_join: LineJoin,
    miter_limit: f64,
    start_cap: LineCap,
    end_cap: LineCap,
    dash_cap: LineCap,
    compound: CompoundArray,
    alignment: PenAlignment,
    scale: Vector2,
    dash_pattern: DashPattern,
    dash_offset: f64,
    dash_clip: Option<Rect>,
    start_anchor: Option<Anchor>,
    end_anchor: Option<Anchor>,
    tolerance: f64,
}

impl StrokeStyle {
    /// Creates a style with the given width; non-positive widths become 1.
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self {
            width: clamp_width(width),
            line_join: LineJoin::default(),
            miter_limit: DEFAULT_MITER_LIMIT,
            start_cap: LineCap::default(),
            end_cap: LineCap::default(),
            dash_cap: LineCap::default(),
            compound: CompoundArray::default(),
            alignment: PenAlignment::default(),
            scale: Vector2::new(1.0, 1.0),
            dash_pattern: DashPattern::default(),
            dash_offset: 0.0,
            dash_clip: None,
            start_anchor: None,
            end_anchor: None,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = clamp_width(width);
        self
    }

    #[must_use]
    pub fn with_line_join(mut self, line_join: LineJoin) -> Self {
        self.line_join = line_join;
        self
    }

    /// Sets both the start and end caps.
    #[must_use]
    pub fn with_caps(mut self, start: LineCap, end: LineCap) -> Self {
        self.start_cap = start;
        self.end_cap = end;
        self
    }

    #[must_use]
    pub fn with_start_cap(mut self, cap: LineCap) -> Self {
        self.start_cap = cap;
        self
    }

    #[must_use]
    pub fn with_end_cap(mut self, cap: LineCap) -> Self {
        self.end_cap = cap;
        self
    }

    /// Cap used on the interior ends created by dashing.
    #[must_use]
    pub fn with_dash_cap(mut self, cap: LineCap) -> Self {
        self.dash_cap = cap;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: PenAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Dash phase in width units; any sign.
    #[must_use]
    pub fn with_dash_offset(mut self, offset: f64) -> Self {
        self.dash_offset = offset;
        self
    }

    /// Dash segments wholly outside `clip` are dropped.
    #[must_use]
    pub fn with_dash_clip(mut self, clip: Option<Rect>) -> Self {
        self.dash_clip = clip;
        self
    }

    /// Sets the miter limit.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidParameter`] if `limit` is negative or
    /// not finite.
    pub fn set_miter_limit(&mut self, limit: f64) -> Result<()> {
        if !(limit.is_finite() && limit >= 0.0) {
            return Err(StrokeError::InvalidParameter {
                parameter: "miter_limit",
                value: limit,
            });
        }
        self.miter_limit = limit;
        Ok(())
    }

    /// Installs a dash pattern (width units); an empty slice means solid.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidDashPattern`] if the pattern is invalid.
    pub fn set_dash_pattern(&mut self, lengths: &[f64]) -> Result<()> {
        self.dash_pattern = DashPattern::new(lengths)?;
        Ok(())
    }

    /// Installs a compound array.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidCompoundArray`] if the array is invalid.
    pub fn set_compound_array(&mut self, entries: &[f64]) -> Result<()> {
        self.compound = CompoundArray::new(entries)?;
        Ok(())
    }

    /// Sets the non-uniform pen scale.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidParameter`] if a factor is not a
    /// positive finite number. A negative factor would mirror the offsets
    /// and swap the inner and outer sides of every corner.
    pub fn set_scale(&mut self, sx: f64, sy: f64) -> Result<()> {
        for (parameter, value) in [("scale_x", sx), ("scale_y", sy)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(StrokeError::InvalidParameter { parameter, value });
            }
        }
        self.scale = Vector2::new(sx, sy);
        Ok(())
    }

    /// Sets the round join/cap arc tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidParameter`] if `tolerance` is not a
    /// positive finite number.
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<()> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(StrokeError::InvalidParameter {
                parameter: "tolerance",
                value: tolerance,
            });
        }
        self.tolerance = tolerance;
        Ok(())
    }

    /// Installs (or clears) the decoration at the start of open subpaths.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidAnchor`] if the anchor has no positive
    /// devide distance at the current width.
    pub fn set_start_anchor(&mut self, anchor: Option<Anchor>) -> Result<()> {
        self.start_anchor = self.validate_anchor(anchor)?;
        Ok(())
    }

    /// Installs (or clears) the decoration at the end of open subpaths.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidAnchor`] if the anchor has no positive
    /// devide distance at the current width.
    pub fn set_end_anchor(&mut self, anchor: Option<Anchor>) -> Result<()> {
        self.end_anchor = self.validate_anchor(anchor)?;
        Ok(())
    }

    /// Pen for stroking a decoration shape: this style's width, miter limit,
    /// scale and tolerance with its own join and caps, and nothing else.
    pub(crate) fn decoration_style(&self, line_join: LineJoin, line_cap: LineCap) -> Self {
        Self {
            line_join,
            start_cap: line_cap,
            end_cap: line_cap,
            dash_cap: line_cap,
            miter_limit: self.miter_limit,
            scale: self.scale,
            tolerance: self.tolerance,
            ..Self::new(self.width)
        }
    }

    fn validate_anchor(&self, anchor: Option<Anchor>) -> Result<Option<Anchor>> {
        if let Some(a) = &anchor {
            let d = a.line_cap().devide_distance(self.width);
            if d <= 0.0 {
                return Err(StrokeError::InvalidAnchor(format!(
                    "devide distance {d} at width {} is not positive",
                    self.width
                )));
            }
        }
        Ok(anchor)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    #[must_use]
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    #[must_use]
    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    #[must_use]
    pub fn start_cap(&self) -> LineCap {
        self.start_cap
    }

    #[must_use]
    pub fn end_cap(&self) -> LineCap {
        self.end_cap
    }

    #[must_use]
    pub fn dash_cap(&self) -> LineCap {
        self.dash_cap
    }

    #[must_use]
    pub fn compound_array(&self) -> &CompoundArray {
        &self.compound
    }

    #[must_use]
    pub fn alignment(&self) -> PenAlignment {
        self.alignment
    }

    #[must_use]
    pub fn scale(&self) -> Vector2 {
        self.scale
    }

    #[must_use]
    pub fn dash_pattern(&self) -> &DashPattern {
        &self.dash_pattern
    }

    #[must_use]
    pub fn dash_offset(&self) -> f64 {
        self.dash_offset
    }

    #[must_use]
    pub fn dash_clip(&self) -> Option<Rect> {
        self.dash_clip
    }

    #[must_use]
    pub fn is_dashed(&self) -> bool {
        !self.dash_pattern.is_solid()
    }

    #[must_use]
    pub fn start_anchor(&self) -> Option<&Anchor> {
        self.start_anchor.as_ref()
    }

    #[must_use]
    pub fn end_anchor(&self) -> Option<&Anchor> {
        self.end_anchor.as_ref()
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn clamp_width(width: f64) -> f64 {
    if width > 0.0 && width.is_finite() {
        width
    } else {
        1.0
    }
}
