use std::collections::BTreeMap;
use std::path::Path;

use fl_project::schema::*;
use fl_project::{
    load, load_json, load_yaml, resolve_field_path, save_json, save_yaml, validate_project,
};

fn sample_project() -> TraceProject {
    let mut parameters = BTreeMap::new();
    parameters.insert("V0".to_string(), 2.0);

    TraceProject {
        version: 1,
        name: "Parallel plates".to_string(),
        field: FieldSourceDef {
            path: "plates.txt".to_string(),
            header_rows: 8,
            si_lengths: true,
            parameters,
        },
        trace: TraceDef {
            step_length: 1e-4,
            max_steps: Some(5000),
            stagnation_tol: 1e-12,
            edges: Some(vec![0.0, 0.01, -0.005, 0.005]),
            emit_points: false,
        },
        seeds: vec![
            SeedDef {
                id: "center".to_string(),
                point: vec![0.001, 0.0],
                edges: None,
            },
            SeedDef {
                id: "upper".to_string(),
                point: vec![0.001, 0.002],
                edges: Some(vec![0.0, 0.005, 0.0, 0.005]),
            },
        ],
    }
}

#[test]
fn roundtrip_yaml() {
    let project = sample_project();
    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("fl_project_roundtrip.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json() {
    let project = sample_project();

    let path = std::env::temp_dir().join("fl_project_roundtrip.json");
    save_json(&path, &project).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(project, loaded);
    assert_eq!(load_json(&path).unwrap(), loaded);
}

#[test]
fn defaults_fill_optional_sections() {
    let yaml = r#"
version: 1
name: minimal
field:
  path: field.txt
seeds:
  - id: s1
    point: [0.0, 0.5]
"#;
    let path = std::env::temp_dir().join("fl_project_minimal.yaml");
    std::fs::write(&path, yaml).unwrap();

    let project = load_yaml(&path).unwrap();
    assert_eq!(project.field.header_rows, 8);
    assert!(!project.field.si_lengths);
    assert!(project.field.parameters.is_empty());
    assert_eq!(project.trace, TraceDef::default());
    assert!(project.seed("s1").is_some());
    assert!(project.seed("s2").is_none());
}

#[test]
fn invalid_project_is_not_saved() {
    let mut project = sample_project();
    project.trace.step_length = -1.0;

    let path = std::env::temp_dir().join("fl_project_invalid.yaml");
    let _ = std::fs::remove_file(&path);
    assert!(save_yaml(&path, &project).is_err());
    assert!(!path.exists());
}

#[test]
fn field_path_is_relative_to_project() {
    let project = sample_project();
    let resolved = resolve_field_path(Path::new("/data/study/project.yaml"), &project);
    assert_eq!(resolved, Path::new("/data/study/plates.txt"));
}
