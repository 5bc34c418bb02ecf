//! Project validation logic.

use std::collections::HashSet;

use crate::schema::{SeedDef, TraceDef, TraceProject};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing value: {field}")]
    Missing { field: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_project(project: &TraceProject) -> Result<(), ValidationError> {
    if project.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    if project.field.path.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "field.path".to_string(),
        });
    }
    for (name, value) in &project.field.parameters {
        if !value.is_finite() {
            return Err(invalid(format!("field.parameters.{name}"), value, "must be finite"));
        }
    }

    validate_trace(&project.trace)?;

    if project.seeds.is_empty() {
        return Err(ValidationError::Missing {
            field: "seeds".to_string(),
        });
    }

    let mut seed_ids = HashSet::new();
    for seed in &project.seeds {
        if !seed_ids.insert(&seed.id) {
            return Err(ValidationError::DuplicateId {
                id: seed.id.clone(),
                context: "seeds".to_string(),
            });
        }
        validate_seed(seed)?;
    }

    Ok(())
}

fn validate_trace(trace: &TraceDef) -> Result<(), ValidationError> {
    if !trace.step_length.is_finite() || trace.step_length <= 0.0 {
        return Err(invalid("trace.step_length", trace.step_length, "must be positive"));
    }
    if !trace.stagnation_tol.is_finite() || trace.stagnation_tol < 0.0 {
        return Err(invalid(
            "trace.stagnation_tol",
            trace.stagnation_tol,
            "must be non-negative",
        ));
    }
    if trace.max_steps == Some(0) {
        return Err(invalid("trace.max_steps", 0, "must be positive"));
    }
    if let Some(edges) = &trace.edges {
        validate_edges("trace.edges", edges)?;
    }
    Ok(())
}

fn validate_seed(seed: &SeedDef) -> Result<(), ValidationError> {
    let field = format!("seeds.{}.point", seed.id);
    if !(2..=3).contains(&seed.point.len()) {
        return Err(invalid(field, seed.point.len(), "point needs 2 or 3 coordinates"));
    }
    if seed.point.iter().any(|v| !v.is_finite()) {
        return Err(invalid(field, format!("{:?}", seed.point), "must be finite"));
    }
    if let Some(edges) = &seed.edges {
        let field = format!("seeds.{}.edges", seed.id);
        validate_edges(&field, edges)?;
        if edges.len() != 2 * seed.point.len() {
            return Err(invalid(field, edges.len(), "edges do not match point dimension"));
        }
    }
    Ok(())
}

fn validate_edges(field: &str, edges: &[f64]) -> Result<(), ValidationError> {
    if edges.len() != 4 && edges.len() != 6 {
        return Err(invalid(field, edges.len(), "edges need 4 (2D) or 6 (3D) values"));
    }
    if edges.iter().any(|v| !v.is_finite()) {
        return Err(invalid(field, format!("{:?}", edges), "must be finite"));
    }
    for (axis, pair) in edges.chunks_exact(2).enumerate() {
        if pair[0] > pair[1] {
            return Err(invalid(
                format!("{field}[{axis}]"),
                format!("{} > {}", pair[0], pair[1]),
                "min must not exceed max",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSourceDef;
    use std::collections::BTreeMap;

    fn project() -> TraceProject {
        TraceProject {
            version: 1,
            name: "plates".to_string(),
            field: FieldSourceDef {
                path: "field.txt".to_string(),
                header_rows: 8,
                si_lengths: false,
                parameters: BTreeMap::new(),
            },
            trace: TraceDef::default(),
            seeds: vec![SeedDef {
                id: "s1".to_string(),
                point: vec![0.0, 0.0],
                edges: None,
            }],
        }
    }

    #[test]
    fn valid_project_passes() {
        validate_project(&project()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut p = project();
        p.version = 99;
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }

    #[test]
    fn rejects_bad_step() {
        let mut p = project();
        p.trace.step_length = 0.0;
        assert!(validate_project(&p).is_err());
        p.trace.step_length = f64::NAN;
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn rejects_duplicate_seed_ids() {
        let mut p = project();
        p.seeds.push(p.seeds[0].clone());
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_inverted_edges() {
        let mut p = project();
        p.trace.edges = Some(vec![1.0, 0.0, 0.0, 1.0]);
        let err = validate_project(&p).unwrap_err();
        assert!(err.to_string().contains("min must not exceed max"));
    }

    #[test]
    fn rejects_seed_edges_of_wrong_dimension() {
        let mut p = project();
        p.seeds[0].edges = Some(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn requires_seeds() {
        let mut p = project();
        p.seeds.clear();
        assert!(matches!(
            validate_project(&p),
            Err(ValidationError::Missing { .. })
        ));
    }
}
