//! Trace execution and caching service.

use std::path::Path;
use std::time::Instant;

use fl_field::VectorField;
use fl_project::schema::{SeedDef, TraceDef};
use fl_results::{RunManifest, RunStore, TraceRecord};
use fl_trace::{FieldLine, NoopObserver, PointObserver, StdoutObserver, TraceOptions};

use crate::error::{AppError, AppResult};
use crate::project_service;

/// Mixed into run ids so a tracer upgrade invalidates cached runs.
pub const TRACER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Request to trace a project's seeds.
#[derive(Debug, Clone)]
pub struct TraceRequest<'a> {
    pub project_path: &'a Path,
    /// Trace only this seed
    pub seed_id: Option<&'a str>,
    pub use_cache: bool,
    /// Print points as they are produced (cached runs are replayed)
    pub emit_points: bool,
    pub step_length: Option<f64>,
    pub max_steps: Option<usize>,
}

impl<'a> TraceRequest<'a> {
    pub fn new(project_path: &'a Path) -> Self {
        Self {
            project_path,
            seed_id: None,
            use_cache: true,
            emit_points: false,
            step_length: None,
            max_steps: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TraceResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub records: Vec<TraceRecord>,
    pub loaded_from_cache: bool,
    pub elapsed_s: f64,
}

/// Trace one seed with the project's trace settings.
///
/// Per-seed edges win over project edges; without either the grid extent
/// bounds the line.
pub fn trace_seed(
    field: &VectorField,
    trace: &TraceDef,
    seed: &SeedDef,
    observer: &mut dyn PointObserver,
) -> AppResult<TraceRecord> {
    let edges = seed.edges.as_deref().or(trace.edges.as_deref());
    let seed_error = |e: fl_trace::TraceError| AppError::Trace(format!("seed '{}': {}", seed.id, e));

    let mut line = FieldLine::new(field, edges).map_err(seed_error)?;
    line.set_initial_point(&seed.point).map_err(seed_error)?;

    let options = TraceOptions {
        step_length: trace.step_length,
        max_steps: trace.max_steps,
        stagnation_tol: trace.stagnation_tol,
    };
    let trajectory = line.trajectory_with(&options, observer).map_err(seed_error)?;

    tracing::info!(
        seed = %seed.id,
        points = trajectory.len(),
        termination = %trajectory.termination,
        "traced seed"
    );

    Ok(TraceRecord {
        seed_id: seed.id.clone(),
        termination: trajectory.termination,
        points: trajectory.rows(),
    })
}

/// Trace the requested seeds, or load the identical run from the cache.
pub fn ensure_trace(request: &TraceRequest) -> AppResult<TraceResponse> {
    let started = Instant::now();

    let mut project = project_service::load_project(request.project_path)?;
    if let Some(id) = request.seed_id {
        let seed = project
            .seed(id)
            .cloned()
            .ok_or_else(|| AppError::SeedNotFound(id.to_string()))?;
        project.seeds = vec![seed];
    }
    if let Some(step) = request.step_length {
        project.trace.step_length = step;
    }
    if let Some(max) = request.max_steps {
        project.trace.max_steps = Some(max);
    }
    fl_project::validate_project(&project).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let field_path = fl_project::resolve_field_path(request.project_path, &project);
    let field_bytes = std::fs::read(&field_path).map_err(|source| AppError::FieldFileRead {
        path: field_path.clone(),
        source,
    })?;
    let run_id = fl_results::compute_run_id(&project, &field_bytes, TRACER_VERSION);

    let store = RunStore::for_project(request.project_path)?;
    let emit = request.emit_points || project.trace.emit_points;

    if request.use_cache && store.has_run(&run_id) {
        tracing::info!(run_id = %run_id, "loading cached run");
        let manifest = store.load_manifest(&run_id)?;
        let records = store.load_lines(&run_id)?;
        if emit {
            for record in &records {
                replay(record, &mut StdoutObserver);
            }
        }
        return Ok(TraceResponse {
            run_id,
            manifest,
            records,
            loaded_from_cache: true,
            elapsed_s: started.elapsed().as_secs_f64(),
        });
    }

    let loaded = project_service::load_field(request.project_path, &project)?;

    let mut records = Vec::with_capacity(project.seeds.len());
    for seed in &project.seeds {
        let record = if emit {
            trace_seed(&loaded.field, &project.trace, seed, &mut StdoutObserver)?
        } else {
            trace_seed(&loaded.field, &project.trace, seed, &mut NoopObserver)?
        };
        records.push(record);
    }

    let manifest = RunManifest {
        run_id: run_id.clone(),
        project_name: project.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        field_path: project.field.path.clone(),
        parameters: project.field.parameters.clone(),
        step_length: project.trace.step_length,
        max_steps: project.trace.max_steps,
        lines: records.iter().map(TraceRecord::summary).collect(),
    };
    store.save_run(&manifest, &records)?;

    tracing::info!(run_id = %run_id, lines = records.len(), "run saved");

    Ok(TraceResponse {
        run_id,
        manifest,
        records,
        loaded_from_cache: false,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

fn replay(record: &TraceRecord, observer: &mut dyn PointObserver) {
    for (index, row) in record.points.iter().enumerate() {
        observer.on_point(index, &fl_core::point(row));
    }
}

/// Cached runs of a project, oldest first.
pub fn list_runs(project_path: &Path) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_project(project_path)?;
    Ok(store.list_runs()?)
}

/// Manifest and lines of one cached run.
pub fn load_run(project_path: &Path, run_id: &str) -> AppResult<(RunManifest, Vec<TraceRecord>)> {
    let store = RunStore::for_project(project_path)?;
    let manifest = store.load_manifest(run_id)?;
    let records = store.load_lines(run_id)?;
    Ok((manifest, records))
}
