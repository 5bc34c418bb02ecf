//! Error types for the fl-app service layer.

use std::path::PathBuf;

/// Backend errors flattened to messages for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read field export: {path}")]
    FieldFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Field export error: {0}")]
    Export(String),

    #[error("Trace error: {0}")]
    Trace(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Seed not found: {0}")]
    SeedNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fl-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<fl_project::ProjectError> for AppError {
    fn from(err: fl_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<fl_comsol::ComsolError> for AppError {
    fn from(err: fl_comsol::ComsolError) -> Self {
        AppError::Export(err.to_string())
    }
}

impl From<fl_field::FieldError> for AppError {
    fn from(err: fl_field::FieldError) -> Self {
        AppError::Export(err.to_string())
    }
}

impl From<fl_trace::TraceError> for AppError {
    fn from(err: fl_trace::TraceError) -> Self {
        AppError::Trace(err.to_string())
    }
}

impl From<fl_results::ResultsError> for AppError {
    fn from(err: fl_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
