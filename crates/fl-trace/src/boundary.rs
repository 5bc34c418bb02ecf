//! Rectangular (2D) and box (3D) tracing domains.

use fl_core::Real;
use fl_field::Grid;

use crate::error::{TraceError, TraceResult};

/// True iff `edges[2i] <= point[i] <= edges[2i + 1]` on every axis.
///
/// Intervals are closed. A NaN coordinate is never inside. Axes beyond the
/// shorter of `point` and `edges` are not checked.
pub fn contains(point: &[Real], edges: &[Real]) -> bool {
    point
        .iter()
        .zip(edges.chunks_exact(2))
        .all(|(&x, e)| e[0] <= x && x <= e[1])
}

/// Axis-aligned box given as `[xmin, xmax, ymin, ymax(, zmin, zmax)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    edges: Vec<Real>,
}

impl BoundingBox {
    /// Box covering the whole grid.
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            edges: grid.extent(),
        }
    }

    /// Box from explicit edges for a `dimension`-dimensional field.
    ///
    /// Exactly `2 * dimension` values are required. Inverted axes are accepted
    /// (they contain nothing) but logged.
    pub fn from_edges(edges: &[Real], dimension: usize) -> TraceResult<Self> {
        if edges.len() != 2 * dimension {
            return Err(TraceError::InvalidEdges {
                what: format!(
                    "expected {} values for a {}D field, got {}",
                    2 * dimension,
                    dimension,
                    edges.len()
                ),
            });
        }
        let bbox = Self {
            edges: edges.to_vec(),
        };
        bbox.warn_if_inverted();
        Ok(bbox)
    }

    pub fn dimension(&self) -> usize {
        self.edges.len() / 2
    }

    pub fn edges(&self) -> &[Real] {
        &self.edges
    }

    /// `(min, max)` along axis `d`.
    pub fn axis(&self, d: usize) -> (Real, Real) {
        (self.edges[2 * d], self.edges[2 * d + 1])
    }

    pub fn contains(&self, point: &[Real]) -> bool {
        point.len() == self.dimension() && contains(point, &self.edges)
    }

    /// Overwrite the leading edges with `edges`, keeping the rest.
    ///
    /// Extra values beyond `2 * dimension` are ignored.
    pub(crate) fn update(&mut self, edges: &[Real]) {
        let n = edges.len().min(self.edges.len());
        self.edges[..n].copy_from_slice(&edges[..n]);
        self.warn_if_inverted();
    }

    fn warn_if_inverted(&self) {
        for d in 0..self.dimension() {
            let (lo, hi) = self.axis(d);
            if lo > hi {
                tracing::warn!(axis = d, lo, hi, "bounding box axis is inverted");
            }
        }
    }
}
