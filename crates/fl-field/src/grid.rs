//! Structured, axis-aligned grids.
//!
//! A grid is the outer product of one coordinate array per spatial axis.
//! Axes may be non-uniform but must be strictly ascending.

use fl_core::{Point, Real, ensure_finite};

use crate::error::{FieldError, FieldResult};

/// Axis-aligned grid of 2 or 3 dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    axes: Vec<Vec<Real>>,
}

impl Grid {
    /// Build a grid from per-axis coordinates.
    ///
    /// Each axis needs at least two finite, strictly ascending values.
    pub fn new(axes: Vec<Vec<Real>>) -> FieldResult<Self> {
        if !(2..=3).contains(&axes.len()) {
            return Err(FieldError::InvalidGrid {
                what: format!("grid must have 2 or 3 axes, got {}", axes.len()),
            });
        }

        for (d, axis) in axes.iter().enumerate() {
            if axis.len() < 2 {
                return Err(FieldError::InvalidGrid {
                    what: format!("axis {} has {} values (need at least 2)", d, axis.len()),
                });
            }
            if let Some(bad) = axis.iter().find(|v| !v.is_finite()) {
                return Err(FieldError::InvalidGrid {
                    what: format!("axis {} contains non-finite value {}", d, bad),
                });
            }
            if let Some(w) = axis.windows(2).find(|w| w[1] <= w[0]) {
                return Err(FieldError::InvalidGrid {
                    what: format!(
                        "axis {} is not strictly ascending ({} then {})",
                        d, w[0], w[1]
                    ),
                });
            }
        }

        Ok(Self { axes })
    }

    /// Number of spatial dimensions.
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self) -> &[Vec<Real>] {
        &self.axes
    }

    pub fn axis(&self, d: usize) -> &[Real] {
        &self.axes[d]
    }

    /// Shape of grid-shaped arrays: one entry per axis.
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(Vec::len).collect()
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.axes.iter().map(Vec::len).product()
    }

    /// Grid extent as `[xmin, xmax, ymin, ymax(, zmin, zmax)]`.
    pub fn extent(&self) -> Vec<Real> {
        self.axes
            .iter()
            .flat_map(|axis| [axis[0], axis[axis.len() - 1]])
            .collect()
    }

    /// Coordinates of the node at `index`.
    pub fn node(&self, index: &[usize]) -> FieldResult<Point> {
        if index.len() != self.dimension() {
            return Err(FieldError::DimensionMismatch {
                expected: self.dimension(),
                got: index.len(),
            });
        }
        let mut coords = Vec::with_capacity(index.len());
        for (d, (&i, axis)) in index.iter().zip(&self.axes).enumerate() {
            let v = axis.get(i).ok_or_else(|| FieldError::InvalidGrid {
                what: format!("index {} out of range on axis {} (len {})", i, d, axis.len()),
            })?;
            coords.push(*v);
        }
        Ok(fl_core::point(&coords))
    }

    /// Multi-index of the node closest to `point` (see [`closest_point_grid`]).
    pub fn closest_node(&self, point: &[Real]) -> FieldResult<Vec<usize>> {
        closest_point_grid(point, &self.axes)
    }

    /// Scale every coordinate by `factor` (unit conversion).
    pub fn scaled(&self, factor: Real) -> FieldResult<Self> {
        let factor = ensure_finite(factor, "grid scale factor").map_err(|e| {
            FieldError::InvalidGrid {
                what: e.to_string(),
            }
        })?;
        let axes = self
            .axes
            .iter()
            .map(|axis| axis.iter().map(|v| v * factor).collect())
            .collect();
        Self::new(axes)
    }
}

/// Index of the value in `axis` closest to `x`.
///
/// Values outside the axis clamp to the first or last index; ties between two
/// neighbours resolve to the lower index.
pub(crate) fn nearest_index(axis: &[Real], x: Real) -> usize {
    let upper = axis.partition_point(|&v| v < x);
    if upper == 0 {
        return 0;
    }
    if upper >= axis.len() {
        return axis.len() - 1;
    }
    let lower = upper - 1;
    if x - axis[lower] <= axis[upper] - x {
        lower
    } else {
        upper
    }
}

/// Nearest grid node to `point`, searched independently on each axis.
///
/// This is a nearest-corner lookup, not a Euclidean nearest neighbour. Points
/// outside the grid clamp to the boundary indices.
pub fn closest_point_grid(point: &[Real], axes: &[Vec<Real>]) -> FieldResult<Vec<usize>> {
    if point.len() != axes.len() {
        return Err(FieldError::DimensionMismatch {
            expected: axes.len(),
            got: point.len(),
        });
    }
    Ok(point
        .iter()
        .zip(axes)
        .map(|(&x, axis)| nearest_index(axis, x))
        .collect())
}
