//! Result data types.

use std::collections::BTreeMap;

use fl_trace::{Termination, polyline_length};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub project_name: String,
    /// RFC 3339
    pub timestamp: String,
    pub field_path: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, f64>,
    pub step_length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    pub lines: Vec<LineSummary>,
}

impl RunManifest {
    pub fn line(&self, seed_id: &str) -> Option<&LineSummary> {
        self.lines.iter().find(|l| l.seed_id == seed_id)
    }

    pub fn total_points(&self) -> usize {
        self.lines.iter().map(|l| l.points).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSummary {
    pub seed_id: String,
    pub points: usize,
    pub termination: Termination,
    pub arc_length: f64,
}

/// One traced line, stored as a single JSON line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceRecord {
    pub seed_id: String,
    pub termination: Termination,
    pub points: Vec<Vec<f64>>,
}

impl TraceRecord {
    pub fn summary(&self) -> LineSummary {
        let arc_length = polyline_length(self.points.iter().map(Vec::as_slice));
        LineSummary {
            seed_id: self.seed_id.clone(),
            points: self.points.len(),
            termination: self.termination,
            arc_length,
        }
    }
}
