//! Export header parsing.
//!
//! A COMSOL text export starts with `%`-prefixed metadata lines
//! (`% Dimension: 2`, `% Length unit: mm`, ...) followed by one column header:
//!
//! ```text
//! % x   y   es.Ex (V/m) @ V0=1   es.Ey (V/m) @ V0=1   es.Ex (V/m) @ V0=2 ...
//! ```
//!
//! The first `dimension` columns are node coordinates; every other column is
//! one variable evaluated for one combination of sweep parameters.

use fl_core::{Real, Tolerances, nearly_equal};

use crate::error::{ComsolError, ComsolResult};

/// Metadata lines preceding the column header in a default export.
pub const DEFAULT_HEADER_ROWS: usize = 8;

/// Coerce a header value to a number.
///
/// Accepts integers and floats, with an optional trailing unit in brackets
/// (`2.5[mm]`) and a trailing comma.
pub fn parse_number(text: &str) -> Option<Real> {
    let text = text.trim().trim_end_matches(',');
    let text = match text.find('[') {
        Some(i) if text.ends_with(']') => &text[..i],
        _ => text,
    };
    if let Ok(i) = text.parse::<i64>() {
        return Some(i as Real);
    }
    text.parse::<Real>().ok()
}

/// A named quantity with an optional unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub unit: Option<String>,
}

/// One exported field column.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldColumn {
    /// Full expression as exported (e.g. `es.Ex`)
    pub expression: String,
    /// Variable name: the text after the last `.` (e.g. `Ex`)
    pub variable: String,
    pub unit: Option<String>,
    /// Sweep parameters this column was evaluated at, in header order
    pub params: Vec<(String, Real)>,
}

/// Values taken by one sweep parameter, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepParam {
    pub name: String,
    pub values: Vec<Real>,
}

/// All sweep parameters of an export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepSpace {
    pub params: Vec<SweepParam>,
}

impl SweepSpace {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SweepParam> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Column structure of the data section.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub coordinates: Vec<String>,
    pub fields: Vec<FieldColumn>,
}

impl ColumnLayout {
    /// Number of values per data row.
    pub fn width(&self) -> usize {
        self.coordinates.len() + self.fields.len()
    }

    /// Coordinates followed by the distinct field variables, with units.
    ///
    /// Coordinates carry the export length unit.
    pub fn variables(&self, length_unit: Option<&str>) -> Vec<Variable> {
        let mut vars: Vec<Variable> = self
            .coordinates
            .iter()
            .map(|c| Variable {
                name: c.clone(),
                unit: length_unit.map(str::to_string),
            })
            .collect();
        for column in &self.fields {
            if !vars.iter().any(|v| v.name == column.variable) {
                vars.push(Variable {
                    name: column.variable.clone(),
                    unit: column.unit.clone(),
                });
            }
        }
        vars
    }

    /// Sweep parameters and the distinct values each one takes.
    pub fn sweep_space(&self) -> SweepSpace {
        let tol = Tolerances::default();
        let mut space = SweepSpace::default();
        for column in &self.fields {
            for (name, value) in &column.params {
                match space.params.iter_mut().find(|p| &p.name == name) {
                    Some(param) => {
                        if !param.values.iter().any(|v| nearly_equal(*v, *value, tol)) {
                            param.values.push(*value);
                        }
                    }
                    None => space.params.push(SweepParam {
                        name: name.clone(),
                        values: vec![*value],
                    }),
                }
            }
        }
        space
    }

    /// Distinct parameter combinations, in column order.
    pub fn snapshots(&self) -> Vec<Vec<(String, Real)>> {
        let mut out: Vec<Vec<(String, Real)>> = Vec::new();
        for column in &self.fields {
            if !out.contains(&column.params) {
                out.push(column.params.clone());
            }
        }
        if out.is_empty() {
            out.push(Vec::new());
        }
        out
    }

    /// Flat column names: coordinates, then `variable p1=v1 p2=v2` per field column.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.coordinates.clone();
        for column in &self.fields {
            let mut name = column.variable.clone();
            for (p, v) in &column.params {
                name.push_str(&format!(" {p}={v}"));
            }
            names.push(name);
        }
        names
    }
}

/// Parsed export header.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportHeader {
    /// `Key: value` metadata pairs in file order
    pub metadata: Vec<(String, String)>,
    pub dimension: usize,
    pub length_unit: Option<String>,
    pub columns: ColumnLayout,
}

impl ExportHeader {
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn variables(&self) -> Vec<Variable> {
        self.columns.variables(self.length_unit.as_deref())
    }

    pub fn sweep_space(&self) -> SweepSpace {
        self.columns.sweep_space()
    }
}

fn strip_comment(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix('%')
}

fn parse_metadata_line(line: &str) -> Option<(String, String)> {
    let body = strip_comment(line)?;
    let (key, value) = body.split_once(':')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

/// Parse `skip_rows` metadata lines followed by the column header line.
pub fn parse_header(lines: &[&str], skip_rows: usize) -> ComsolResult<ExportHeader> {
    if lines.len() <= skip_rows {
        return Err(ComsolError::MissingHeader {
            what: format!(
                "expected {} metadata lines and a column header, found {} lines",
                skip_rows,
                lines.len()
            ),
        });
    }

    let mut metadata = Vec::new();
    for (i, line) in lines[..skip_rows].iter().enumerate() {
        if strip_comment(line).is_none() {
            return Err(ComsolError::MissingHeader {
                what: format!("line {} is not a '%' metadata line", i + 1),
            });
        }
        if let Some(pair) = parse_metadata_line(line) {
            metadata.push(pair);
        }
    }

    let lookup = |key: &str| {
        metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.clone())
    };

    let dim_text = lookup("Dimension").ok_or_else(|| ComsolError::MissingHeader {
        what: "no 'Dimension' entry".to_string(),
    })?;
    let dimension = dim_text
        .split_whitespace()
        .last()
        .and_then(|t| t.parse::<usize>().ok())
        .filter(|d| (2..=3).contains(d))
        .ok_or_else(|| ComsolError::MissingHeader {
            what: format!("unsupported dimension '{}'", dim_text),
        })?;
    let length_unit =
        lookup("Length unit").and_then(|u| u.split_whitespace().last().map(str::to_string));

    let columns = parse_columns(lines[skip_rows], dimension)?;

    Ok(ExportHeader {
        metadata,
        dimension,
        length_unit,
        columns,
    })
}

/// Split a column header line into coordinates and field columns.
pub fn parse_columns(line: &str, dimension: usize) -> ComsolResult<ColumnLayout> {
    let body = strip_comment(line).unwrap_or(line);
    let mut tokens = body.split_whitespace();

    let coordinates: Vec<String> = tokens.by_ref().take(dimension).map(str::to_string).collect();
    if coordinates.len() != dimension {
        return Err(ComsolError::MissingHeader {
            what: format!(
                "column header has {} coordinate names, expected {}",
                coordinates.len(),
                dimension
            ),
        });
    }

    let mut fields: Vec<FieldColumn> = Vec::new();
    let mut in_params = false;

    for token in tokens {
        if token == "@" {
            if fields.is_empty() {
                return Err(ComsolError::MissingHeader {
                    what: "'@' before any field column".to_string(),
                });
            }
            in_params = true;
            continue;
        }

        if let Some(current) = fields.last_mut() {
            if in_params && token.contains('=') {
                for assignment in token.split(',').filter(|s| !s.is_empty()) {
                    let (name, value) =
                        assignment
                            .split_once('=')
                            .ok_or_else(|| ComsolError::MissingHeader {
                                what: format!("malformed parameter '{}'", assignment),
                            })?;
                    let value = parse_number(value).ok_or_else(|| ComsolError::MissingHeader {
                        what: format!("parameter '{}' has non-numeric value '{}'", name, value),
                    })?;
                    current.params.push((name.to_string(), value));
                }
                continue;
            }
            if !in_params
                && current.unit.is_none()
                && token.starts_with('(')
                && token.ends_with(')')
            {
                current.unit = Some(token[1..token.len() - 1].to_string());
                continue;
            }
        }

        in_params = false;
        let variable = token.rsplit('.').next().unwrap_or(token).to_string();
        fields.push(FieldColumn {
            expression: token.to_string(),
            variable,
            unit: None,
            params: Vec::new(),
        });
    }

    Ok(ColumnLayout {
        coordinates,
        fields,
    })
}
