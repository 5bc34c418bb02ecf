//! Field and grid errors.

use thiserror::Error;

/// Result type for grid and field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors raised while building or querying grids and fields.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Axis arrays violate the grid invariants.
    #[error("Invalid grid: {what}")]
    InvalidGrid { what: String },

    /// A point or array does not match the grid dimension.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A component array does not have the grid's shape.
    #[error("Component '{name}' has shape {got:?}, grid shape is {expected:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// No complete, recognized set of component names for the dimension.
    #[error("No recognized {dimension}D field components among {available:?}")]
    MissingComponents {
        dimension: usize,
        available: Vec<String>,
    },
}
