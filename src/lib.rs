//! Polyline stroking and dashing.
//!
//! Converts flattened centerline paths plus a [`StrokeStyle`] into closed
//! contours that, filled with the non-zero winding rule, reproduce the
//! stroked path.
//!
//! ```
//! use pathstroke::{Path, StrokePath, StrokeStyle, Subpath};
//!
//! let path = Path::from(Subpath::from_xy(&[(0.0, 0.0), (10.0, 0.0)], false));
//! let outline = StrokePath::new(&StrokeStyle::new(2.0)).execute(&path);
//! assert_eq!(outline.len(), 1);
//! ```

pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod stroke;
pub mod style;

pub use error::{Result, StrokeError};
pub use geometry::{Path, Subpath, VertexCache};
pub use stroke::{Contour, Outline, StrokePath, StrokeSubpath};
pub use style::{Anchor, AnchorMode, CustomLineCap, LineCap, LineJoin, PenAlignment, PresetAnchor, StrokeStyle};
