use std::collections::BTreeMap;

use fl_results::{LineSummary, ResultsError, RunManifest, RunStore, TraceRecord};
use fl_trace::Termination;

fn temp_store(name: &str) -> RunStore {
    let dir = std::env::temp_dir().join(format!("fl_results_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    RunStore::new(dir).unwrap()
}

fn manifest(run_id: &str, timestamp: &str, records: &[TraceRecord]) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        project_name: "plates".to_string(),
        timestamp: timestamp.to_string(),
        field_path: "plates.txt".to_string(),
        parameters: BTreeMap::new(),
        step_length: 0.1,
        max_steps: None,
        lines: records.iter().map(TraceRecord::summary).collect(),
    }
}

fn records() -> Vec<TraceRecord> {
    vec![
        TraceRecord {
            seed_id: "a".to_string(),
            termination: Termination::BoundaryExit,
            points: vec![vec![0.0, 0.0], vec![0.1, 0.0]],
        },
        TraceRecord {
            seed_id: "b".to_string(),
            termination: Termination::Stagnation,
            points: vec![vec![0.5, 0.5]],
        },
    ]
}

#[test]
fn save_and_load_run() {
    let store = temp_store("save_load");
    let records = records();
    let m = manifest("run1", "2026-01-01T00:00:00+00:00", &records);

    assert!(!store.has_run("run1"));
    store.save_run(&m, &records).unwrap();
    assert!(store.has_run("run1"));

    assert_eq!(store.load_manifest("run1").unwrap(), m);
    assert_eq!(store.load_lines("run1").unwrap(), records);

    let line: &LineSummary = m.line("a").unwrap();
    assert_eq!(line.points, 2);
    assert_eq!(line.termination, Termination::BoundaryExit);
    assert!((line.arc_length - 0.1).abs() < 1e-12);
    assert_eq!(m.total_points(), 3);
}

#[test]
fn list_runs_sorted_by_timestamp() {
    let store = temp_store("list");
    let records = records();
    store
        .save_run(&manifest("late", "2026-03-01T00:00:00+00:00", &records), &records)
        .unwrap();
    store
        .save_run(&manifest("early", "2026-02-01T00:00:00+00:00", &records), &records)
        .unwrap();

    let runs = store.list_runs().unwrap();
    let ids: Vec<&str> = runs.iter().map(|r| r.run_id.as_str()).collect();
    assert_eq!(ids, ["early", "late"]);
}

#[test]
fn delete_run_removes_it() {
    let store = temp_store("delete");
    let records = records();
    store
        .save_run(&manifest("gone", "2026-01-01T00:00:00+00:00", &records), &records)
        .unwrap();
    store.delete_run("gone").unwrap();

    assert!(!store.has_run("gone"));
    assert!(matches!(
        store.load_manifest("gone"),
        Err(ResultsError::RunNotFound { .. })
    ));
    store.delete_run("gone").unwrap();
}

#[test]
fn for_project_uses_hidden_directory() {
    let dir = std::env::temp_dir().join("fl_results_for_project");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let store = RunStore::for_project(&dir.join("project.yaml")).unwrap();
    assert_eq!(store.root_dir(), dir.join(".fieldline").join("runs"));
    assert!(store.root_dir().is_dir());
}

#[test]
fn for_project_rejects_path_without_parent() {
    assert!(matches!(
        RunStore::for_project(std::path::Path::new("/")),
        Err(ResultsError::InvalidPath { .. })
    ));
}
