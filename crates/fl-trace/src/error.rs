//! Error types for tracing operations.

use fl_core::Point;
use fl_field::FieldError;
use thiserror::Error;

/// Errors raised while configuring or running a trace.
///
/// Leaving the box mid-trace is not an error; see [`crate::Termination`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    #[error("Dimension mismatch: field is {expected}D, point has {got} coordinates")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Invalid edges: {what}")]
    InvalidEdges { what: String },

    #[error("Invalid step length: {what}")]
    InvalidStep { what: String },

    #[error("No initial point set")]
    NotSeeded,

    #[error("Initial point {point:?} lies outside the boundary {edges:?}")]
    OutOfDomain { point: Vec<f64>, edges: Vec<f64> },

    #[error("Field error: {0}")]
    Field(#[from] FieldError),
}

pub type TraceResult<T> = Result<T, TraceError>;

impl TraceError {
    pub(crate) fn out_of_domain(point: &Point, edges: &[f64]) -> Self {
        Self::OutOfDomain {
            point: point.iter().copied().collect(),
            edges: edges.to_vec(),
        }
    }

    /// True for errors raised before tracing starts because of bad setup.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::OutOfDomain { .. })
    }
}
