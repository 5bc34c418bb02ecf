//! fl-field: structured grids and vector fields sampled on them.
//!
//! Provides:
//! - `Grid`: per-axis coordinate arrays (2D or 3D, possibly non-uniform)
//! - `closest_point_grid`: nearest-node lookup, independent per axis
//! - `VectorField`: grid-shaped component arrays with a validated naming convention
//! - `interpolate`: multilinear sampling of the field at a continuous point

pub mod error;
pub mod field;
pub mod grid;
pub mod interpolate;

pub use error::{FieldError, FieldResult};
pub use field::{ComponentConvention, VectorField};
pub use grid::{Grid, closest_point_grid};
pub use interpolate::interpolate;
