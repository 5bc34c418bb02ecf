use crate::{FlError, FlResult};
use nalgebra::DVector;

/// Floating point type used throughout system
pub type Real = f64;

/// A position (or field vector) in 2D or 3D space.
pub type Point = DVector<Real>;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> FlResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FlError::NonFinite { what, value: v })
    }
}

/// Build a point from a coordinate slice.
pub fn point(coords: &[Real]) -> Point {
    DVector::from_column_slice(coords)
}

/// True when every coordinate is finite.
pub fn all_finite(v: &Point) -> bool {
    v.iter().all(|x| x.is_finite())
}
