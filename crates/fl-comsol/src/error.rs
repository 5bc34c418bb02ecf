//! Export parsing errors.

use fl_field::FieldError;
use thiserror::Error;

pub type ComsolResult<T> = Result<T, ComsolError>;

#[derive(Error, Debug)]
pub enum ComsolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed header: {what}")]
    MissingHeader { what: String },

    #[error("Parse error on line {line}: {what}")]
    Parse { line: usize, what: String },

    #[error("Line {line} has {got} columns, expected {expected}")]
    ColumnCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("Unknown length unit: {unit}")]
    UnknownUnit { unit: String },

    #[error("No snapshot matches parameters {selection}")]
    SnapshotNotFound { selection: String },

    #[error("{count} snapshots match parameters {selection}; specify more parameters")]
    AmbiguousSnapshot { count: usize, selection: String },

    #[error("Field error: {0}")]
    Field(#[from] FieldError),
}
