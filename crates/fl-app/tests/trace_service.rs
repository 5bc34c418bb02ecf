use std::path::{Path, PathBuf};

use fl_app::{
    AppError, TraceRequest, ensure_trace, inspect_field, list_runs, load_field, load_project,
    load_run, sample_point,
};
use fl_trace::Termination;

/// Uniform field `(1, 0)` over `[0, 1] x [0, 1]`, swept over `V0`.
const EXPORT: &str = "\
% Dimension: 2
% x y es.Ex (V/m) @ V0=1 es.Ey (V/m) @ V0=1 es.Ex (V/m) @ V0=2 es.Ey (V/m) @ V0=2
0 0 1 0 0 1
0.5 0 1 0 0 1
1 0 1 0 0 1
0 0.5 1 0 0 1
0.5 0.5 1 0 0 1
1 0.5 1 0 0 1
0 1 1 0 0 1
0.5 1 1 0 0 1
1 1 1 0 0 1
";

const PROJECT: &str = "\
version: 1
name: uniform
field:
  path: field.txt
  header_rows: 1
  parameters:
    V0: 1.0
trace:
  step_length: 0.25
seeds:
  - id: left
    point: [0.0, 0.5]
  - id: boxed
    point: [0.0, 0.5]
    edges: [0.0, 0.6, 0.0, 1.0]
";

fn setup(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fl_app_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("field.txt"), EXPORT).unwrap();
    let project_path = dir.join("project.yaml");
    std::fs::write(&project_path, PROJECT).unwrap();
    project_path
}

fn record<'a>(
    response: &'a fl_app::TraceResponse,
    seed: &str,
) -> &'a fl_results::TraceRecord {
    response
        .records
        .iter()
        .find(|r| r.seed_id == seed)
        .unwrap()
}

#[test]
fn traces_all_seeds_then_uses_cache() {
    let path = setup("cache");

    let first = ensure_trace(&TraceRequest::new(&path)).unwrap();
    assert!(!first.loaded_from_cache);
    assert_eq!(first.records.len(), 2);

    let left = record(&first, "left");
    assert_eq!(left.termination, Termination::BoundaryExit);
    assert_eq!(left.points.len(), 5);
    assert_eq!(left.points[4], vec![1.0, 0.5]);

    let boxed = record(&first, "boxed");
    assert_eq!(boxed.points.len(), 3);

    let second = ensure_trace(&TraceRequest::new(&path)).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(second.run_id, first.run_id);
    assert_eq!(second.records, first.records);

    let runs = list_runs(&path).unwrap();
    assert_eq!(runs.len(), 1);
    let (manifest, records) = load_run(&path, &first.run_id).unwrap();
    assert_eq!(manifest.lines.len(), 2);
    assert_eq!(records, first.records);
}

#[test]
fn single_seed_and_overrides_change_run_id() {
    let path = setup("single");

    let all = ensure_trace(&TraceRequest::new(&path)).unwrap();

    let mut request = TraceRequest::new(&path);
    request.seed_id = Some("left");
    request.max_steps = Some(2);
    let one = ensure_trace(&request).unwrap();

    assert_ne!(one.run_id, all.run_id);
    assert_eq!(one.records.len(), 1);
    assert_eq!(one.records[0].termination, Termination::StepLimit);
    assert_eq!(one.records[0].points.len(), 3);
}

#[test]
fn unknown_seed_is_reported() {
    let path = setup("unknown_seed");
    let mut request = TraceRequest::new(&path);
    request.seed_id = Some("nope");
    assert!(matches!(
        ensure_trace(&request),
        Err(AppError::SeedNotFound(id)) if id == "nope"
    ));
}

#[test]
fn missing_export_is_reported() {
    let path = setup("missing_export");
    std::fs::remove_file(path.parent().unwrap().join("field.txt")).unwrap();
    assert!(matches!(
        ensure_trace(&TraceRequest::new(&path)),
        Err(AppError::FieldFileRead { .. })
    ));
}

#[test]
fn snapshot_selection_picks_field() {
    let path = setup("selection");
    let project = load_project(&path).unwrap();
    let loaded = load_field(&path, &project).unwrap();

    let report = sample_point(&loaded.field, None, &[0.25, 0.25]).unwrap();
    assert_eq!(report.value, vec![1.0, 0.0]);
    assert!(report.inside);
}

#[test]
fn inspect_reports_sweep() {
    let path = setup("inspect");
    let project = load_project(&path).unwrap();
    let summary = inspect_field(&path, &project).unwrap();

    assert_eq!(summary.dimension, 2);
    assert_eq!(summary.shape, vec![3, 3]);
    assert_eq!(summary.extent, vec![0.0, 1.0, 0.0, 1.0]);
    assert_eq!(summary.snapshot_count, 2);
    assert_eq!(summary.columns.len(), 6);
    assert_eq!(summary.sweep, vec![("V0".to_string(), vec![1.0, 2.0])]);
    assert!(summary.path.ends_with(Path::new("field.txt")));
}
