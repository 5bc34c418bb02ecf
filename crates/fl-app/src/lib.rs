//! Application service layer for fieldline.
//!
//! Ties project files, field exports, the tracer and the run store together
//! for the CLI.

pub mod error;
pub mod project_service;
pub mod query;
pub mod trace_service;

pub use error::{AppError, AppResult};
pub use project_service::{
    FieldSummary, LoadedField, inspect_field, load_field, load_project, selection,
};
pub use query::{SampleReport, parse_point, sample_point};
pub use trace_service::{
    TRACER_VERSION, TraceRequest, TraceResponse, ensure_trace, list_runs, load_run, trace_seed,
};
