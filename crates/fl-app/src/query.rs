//! Point queries against a loaded field.

use fl_field::VectorField;
use fl_trace::FieldLine;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport {
    pub point: Vec<f64>,
    pub value: Vec<f64>,
    pub magnitude: f64,
    /// Inside the tracing box
    pub inside: bool,
    pub closest_node: Vec<usize>,
}

/// Parse `x,y` or `x,y,z`.
pub fn parse_point(text: &str) -> AppResult<Vec<f64>> {
    let coords = text
        .split(',')
        .map(|t| t.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::InvalidInput(format!("point '{}': {}", text, e)))?;
    if !(2..=3).contains(&coords.len()) {
        return Err(AppError::InvalidInput(format!(
            "point '{}' needs 2 or 3 coordinates",
            text
        )));
    }
    Ok(coords)
}

/// Interpolated field, box membership and nearest node at `point`.
pub fn sample_point(
    field: &VectorField,
    edges: Option<&[f64]>,
    point: &[f64],
) -> AppResult<SampleReport> {
    let mut line = FieldLine::new(field, edges)?;
    line.set_initial_point(point)?;

    let value = line.interpolate(point)?;
    Ok(SampleReport {
        point: point.to_vec(),
        magnitude: value.norm(),
        value: value.iter().copied().collect(),
        inside: line.contains(point),
        closest_node: line.closest_point()?,
    })
}
