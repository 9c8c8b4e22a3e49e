mod anchor;
mod dash;
mod zoom;

pub use anchor::{AnchorGenerator, AnchoredLine};
pub use dash::{DashBuckets, DashSubpath};
pub use zoom::PathZoom;
