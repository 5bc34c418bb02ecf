//! Project loading and field inspection.

use std::path::{Path, PathBuf};

use fl_comsol::{ComsolError, ComsolExport, Selection};
use fl_field::{ComponentConvention, VectorField};
use fl_project::schema::TraceProject;

use crate::error::{AppError, AppResult};

/// Load and validate a project file (YAML, or JSON by extension).
pub fn load_project(path: &Path) -> AppResult<TraceProject> {
    let project = fl_project::load(path)?;
    tracing::debug!(
        path = %path.display(),
        seeds = project.seeds.len(),
        "loaded project"
    );
    Ok(project)
}

/// Snapshot selection from the project's field parameters.
pub fn selection(project: &TraceProject) -> Selection {
    project.field.parameters.clone()
}

fn read_export(path: &Path, project: &TraceProject) -> AppResult<ComsolExport> {
    match ComsolExport::from_path(path, project.field.header_rows) {
        Ok(export) => Ok(export),
        Err(ComsolError::Io(source)) => Err(AppError::FieldFileRead {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) => Err(e.into()),
    }
}

/// A parsed export together with the field built from the selected snapshot.
#[derive(Debug, Clone)]
pub struct LoadedField {
    pub path: PathBuf,
    pub export: ComsolExport,
    pub field: VectorField,
}

/// Read the project's export and build its vector field.
pub fn load_field(project_path: &Path, project: &TraceProject) -> AppResult<LoadedField> {
    let path = fl_project::resolve_field_path(project_path, project);
    let export = read_export(&path, project)?;
    let field = export.vector_field(&selection(project), project.field.si_lengths)?;
    tracing::info!(
        path = %path.display(),
        dimension = field.dimension(),
        convention = %field.convention(),
        "loaded field"
    );
    Ok(LoadedField {
        path,
        export,
        field,
    })
}

/// Description of an export for listing.
#[derive(Debug, Clone)]
pub struct FieldSummary {
    pub path: PathBuf,
    pub dimension: usize,
    pub shape: Vec<usize>,
    /// `[xmin, xmax, ymin, ymax(, zmin, zmax)]`
    pub extent: Vec<f64>,
    pub length_unit: Option<String>,
    pub variables: Vec<String>,
    pub columns: Vec<String>,
    /// Sweep parameters with their distinct values
    pub sweep: Vec<(String, Vec<f64>)>,
    pub snapshot_count: usize,
    /// Convention of the selected snapshot, when one could be built
    pub convention: Option<ComponentConvention>,
}

/// Summarize the project's export without requiring a valid selection.
pub fn inspect_field(project_path: &Path, project: &TraceProject) -> AppResult<FieldSummary> {
    let path = fl_project::resolve_field_path(project_path, project);
    let export = read_export(&path, project)?;
    let header = export.header();

    let variables = header
        .variables()
        .into_iter()
        .map(|v| match v.unit {
            Some(unit) => format!("{} ({})", v.name, unit),
            None => v.name,
        })
        .collect();
    let sweep = export
        .sweep_space()
        .params
        .into_iter()
        .map(|p| (p.name, p.values))
        .collect();
    let convention = export
        .vector_field(&selection(project), project.field.si_lengths)
        .ok()
        .map(|f| f.convention());

    Ok(FieldSummary {
        dimension: export.dimension(),
        shape: export.grid().shape(),
        extent: export.grid().extent(),
        length_unit: header.length_unit.clone(),
        variables,
        columns: header.columns.column_names(),
        sweep,
        snapshot_count: export.snapshots().len(),
        convention,
        path,
    })
}
