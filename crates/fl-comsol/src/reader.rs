//! Export data reader and snapshot selection.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use fl_core::{LengthUnit, Real, Tolerances, nearly_equal};
use fl_field::{Grid, VectorField};
use ndarray::{ArrayD, IxDyn};

use crate::error::{ComsolError, ComsolResult};
use crate::header::{ExportHeader, SweepSpace, parse_header};

/// Sweep parameter values used to pick a snapshot.
pub type Selection = BTreeMap<String, Real>;

/// All variables of one sweep parameter combination, on the export grid.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub params: Vec<(String, Real)>,
    pub arrays: BTreeMap<String, ArrayD<Real>>,
}

impl Snapshot {
    fn matches(&self, selection: &Selection, tol: Tolerances) -> bool {
        selection.iter().all(|(key, value)| {
            self.params
                .iter()
                .any(|(name, v)| name == key && nearly_equal(*v, *value, tol))
        })
    }
}

/// A parsed COMSOL grid export.
#[derive(Debug, Clone)]
pub struct ComsolExport {
    header: ExportHeader,
    grid: Grid,
    snapshots: Vec<Snapshot>,
}

fn describe(selection: &Selection) -> String {
    if selection.is_empty() {
        return "{}".to_string();
    }
    let parts: Vec<String> = selection.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", parts.join(", "))
}

/// Sorted distinct values of one coordinate column.
fn unique_axis(rows: &[Vec<Real>], d: usize) -> Vec<Real> {
    let mut axis: Vec<Real> = rows.iter().map(|r| r[d]).collect();
    axis.sort_by(|a, b| a.total_cmp(b));
    axis.dedup();
    axis
}

impl ComsolExport {
    /// Read an export file.
    pub fn from_path(path: &Path, skip_rows: usize) -> ComsolResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), skip_rows)
    }

    /// Parse export text already in memory.
    pub fn parse_str(text: &str, skip_rows: usize) -> ComsolResult<Self> {
        Self::from_reader(text.as_bytes(), skip_rows)
    }

    pub fn from_reader<R: BufRead>(reader: R, skip_rows: usize) -> ComsolResult<Self> {
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
        let head: Vec<&str> = lines
            .iter()
            .take(skip_rows + 1)
            .map(String::as_str)
            .collect();
        let header = parse_header(&head, skip_rows)?;

        let dim = header.dimension;
        let width = header.columns.width();

        let mut rows: Vec<Vec<Real>> = Vec::new();
        for (offset, line) in lines.iter().enumerate().skip(skip_rows + 1) {
            let line_no = offset + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            let row = trimmed
                .split_whitespace()
                .map(|t| t.parse::<Real>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ComsolError::Parse {
                    line: line_no,
                    what: e.to_string(),
                })?;
            if row.len() != width {
                return Err(ComsolError::ColumnCount {
                    line: line_no,
                    expected: width,
                    got: row.len(),
                });
            }
            if let Some(bad) = row[..dim].iter().find(|v| !v.is_finite()) {
                return Err(ComsolError::Parse {
                    line: line_no,
                    what: format!("non-finite coordinate {}", bad),
                });
            }
            rows.push(row);
        }

        let axes: Vec<Vec<Real>> = (0..dim).map(|d| unique_axis(&rows, d)).collect();
        let grid = Grid::new(axes)?;
        let shape = grid.shape();

        if rows.len() < grid.node_count() {
            tracing::warn!(
                rows = rows.len(),
                nodes = grid.node_count(),
                "export does not cover every grid node; missing samples are NaN"
            );
        }

        let mut snapshots: Vec<Snapshot> = header
            .columns
            .snapshots()
            .into_iter()
            .map(|params| Snapshot {
                params,
                arrays: BTreeMap::new(),
            })
            .collect();

        // column -> (snapshot index, variable)
        let mut targets = Vec::with_capacity(header.columns.fields.len());
        for column in &header.columns.fields {
            let s = snapshots
                .iter()
                .position(|snap| snap.params == column.params)
                .unwrap_or(0);
            snapshots[s]
                .arrays
                .entry(column.variable.clone())
                .or_insert_with(|| ArrayD::from_elem(IxDyn(&shape), Real::NAN));
            targets.push((s, column.variable.clone()));
        }

        let mut index = vec![0usize; dim];
        for row in &rows {
            for (d, slot) in index.iter_mut().enumerate() {
                *slot = match grid.axis(d).binary_search_by(|v| v.total_cmp(&row[d])) {
                    Ok(i) | Err(i) => i,
                };
            }
            for ((s, variable), value) in targets.iter().zip(&row[dim..]) {
                if let Some(array) = snapshots[*s].arrays.get_mut(variable) {
                    array[index.as_slice()] = *value;
                }
            }
        }

        tracing::debug!(
            dimension = dim,
            nodes = grid.node_count(),
            snapshots = snapshots.len(),
            "parsed export"
        );

        Ok(Self {
            header,
            grid,
            snapshots,
        })
    }

    pub fn header(&self) -> &ExportHeader {
        &self.header
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dimension(&self) -> usize {
        self.header.dimension
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn sweep_space(&self) -> SweepSpace {
        self.header.sweep_space()
    }

    /// Export length unit, if the header declares one.
    pub fn length_unit(&self) -> ComsolResult<Option<LengthUnit>> {
        match &self.header.length_unit {
            None => Ok(None),
            Some(tag) => LengthUnit::parse(tag)
                .map(Some)
                .ok_or_else(|| ComsolError::UnknownUnit { unit: tag.clone() }),
        }
    }

    /// The unique snapshot whose parameters match `selection`.
    ///
    /// An empty selection is accepted only when there is a single snapshot.
    pub fn snapshot(&self, selection: &Selection) -> ComsolResult<&Snapshot> {
        let tol = Tolerances::default();
        let matching: Vec<&Snapshot> = self
            .snapshots
            .iter()
            .filter(|s| s.matches(selection, tol))
            .collect();

        match matching.as_slice() {
            [only] => Ok(*only),
            [] => Err(ComsolError::SnapshotNotFound {
                selection: describe(selection),
            }),
            many => Err(ComsolError::AmbiguousSnapshot {
                count: many.len(),
                selection: describe(selection),
            }),
        }
    }

    /// Build the vector field of the selected snapshot.
    ///
    /// With `si_lengths`, grid coordinates are converted from the export
    /// length unit to meters.
    pub fn vector_field(
        &self,
        selection: &Selection,
        si_lengths: bool,
    ) -> ComsolResult<VectorField> {
        let snapshot = self.snapshot(selection)?;
        let grid = if si_lengths {
            match self.length_unit()? {
                Some(unit) => self.grid.scaled(unit.meters_per_unit())?,
                None => self.grid.clone(),
            }
        } else {
            self.grid.clone()
        };
        Ok(VectorField::from_named(grid, snapshot.arrays.clone())?)
    }
}
