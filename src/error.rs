use thiserror::Error;

/// Top-level error type for stroke configuration.
///
/// Stroking itself never fails: degenerate geometry is recovered locally.
/// Errors are only produced when an invalid value is offered to a style
/// setter, in which case the previous configuration stays in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrokeError {
    #[error("invalid dash pattern: {0}")]
    InvalidDashPattern(String),

    #[error("invalid compound array: {0}")]
    InvalidCompoundArray(String),

    #[error("invalid anchor: {0}")]
    InvalidAnchor(String),

    #[error("parameter {parameter} = {value} is out of range")]
    InvalidParameter { parameter: &'static str, value: f64 },
}

/// Convenience type alias for results using [`StrokeError`].
pub type Result<T> = std::result::Result<T, StrokeError>;
