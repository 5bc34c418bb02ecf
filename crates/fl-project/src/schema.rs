//! Project schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceProject {
    pub version: u32,
    pub name: String,
    pub field: FieldSourceDef,
    #[serde(default)]
    pub trace: TraceDef,
    #[serde(default)]
    pub seeds: Vec<SeedDef>,
}

impl TraceProject {
    pub fn seed(&self, id: &str) -> Option<&SeedDef> {
        self.seeds.iter().find(|s| s.id == id)
    }
}

/// Where the field comes from and which snapshot to use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSourceDef {
    /// Export file, relative to the project file
    pub path: String,
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
    /// Convert grid coordinates from the export length unit to meters
    #[serde(default)]
    pub si_lengths: bool,
    /// Sweep parameter values selecting the snapshot
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, f64>,
}

fn default_header_rows() -> usize {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceDef {
    pub step_length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    #[serde(default = "default_stagnation_tol")]
    pub stagnation_tol: f64,
    /// `[xmin, xmax, ymin, ymax(, zmin, zmax)]`; grid extent when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<f64>>,
    #[serde(default)]
    pub emit_points: bool,
}

fn default_stagnation_tol() -> f64 {
    1e-12
}

impl Default for TraceDef {
    fn default() -> Self {
        Self {
            step_length: 1e-3,
            max_steps: None,
            stagnation_tol: default_stagnation_tol(),
            edges: None,
            emit_points: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedDef {
    pub id: String,
    pub point: Vec<f64>,
    /// Per-seed box overriding `trace.edges`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<f64>>,
}
