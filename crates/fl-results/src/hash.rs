//! Content-based hashing for run IDs.

use fl_project::schema::{TraceDef, TraceProject};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Trace settings that change the traced points.
#[derive(Serialize)]
struct TraceKey<'a> {
    step_length: f64,
    max_steps: Option<usize>,
    stagnation_tol: f64,
    edges: Option<&'a [f64]>,
}

impl<'a> From<&'a TraceDef> for TraceKey<'a> {
    fn from(trace: &'a TraceDef) -> Self {
        Self {
            step_length: trace.step_length,
            max_steps: trace.max_steps,
            stagnation_tol: trace.stagnation_tol,
            edges: trace.edges.as_deref(),
        }
    }
}

/// Hash of everything that determines a run's output.
///
/// The project name, version and `emit_points` are left out; they do not
/// change the traced lines.
pub fn compute_run_id(project: &TraceProject, field_bytes: &[u8], tracer_version: &str) -> String {
    let mut hasher = Sha256::new();

    let field_json = serde_json::to_string(&project.field).unwrap_or_default();
    hasher.update(field_json.as_bytes());

    let trace_json = serde_json::to_string(&TraceKey::from(&project.trace)).unwrap_or_default();
    hasher.update(trace_json.as_bytes());

    let seeds_json = serde_json::to_string(&project.seeds).unwrap_or_default();
    hasher.update(seeds_json.as_bytes());

    hasher.update(field_bytes);
    hasher.update(tracer_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
