//! Error types for the arrangement core.

/// Errors surfaced at the boundary of the arrangement core.
///
/// Misuse that the engine can absorb (superseded plans, unbalanced wait group
/// leaves, degenerate timing denominators) is logged instead of reported here.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ArrangementError {
    /// Base element size must be non-negative on every axis.
    #[error("Base element size must be non-negative, got ({x}, {y})")]
    NegativeElementSize { x: f32, y: f32 },

    /// A spline strategy was built from an unusable curve.
    #[error("Invalid spline: {reason}")]
    InvalidSpline { reason: String },

    /// An element key is not a member of the arrangement.
    #[error("Element is not tracked by this arrangement: {element}")]
    UntrackedElement { element: String },

    /// Configuration could not be parsed.
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

impl From<serde_json::Error> for ArrangementError {
    fn from(err: serde_json::Error) -> Self {
        ArrangementError::Config {
            reason: err.to_string(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ArrangementError>;
