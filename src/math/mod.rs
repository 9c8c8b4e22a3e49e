pub mod clip_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

pub use clip_2d::{clip_segment, Rect};
pub use distance_2d::{cross_product, distance, left_normal, point_along, point_to_segment_dist};
pub use intersect_2d::{circle_segment_intersect, intersect};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Consecutive vertices closer than this are collapsed by the vertex cache.
pub const MIN_VERTEX_DISTANCE: f64 = 1e-6;

/// Line intersections with a denominator below this magnitude are parallel.
pub const INTERSECT_EPSILON: f64 = 1e-30;

/// Cross products of unit directions below this magnitude are collinear.
pub const COLLINEAR_EPSILON: f64 = 1e-12;
