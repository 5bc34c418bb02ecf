//! Multilinear interpolation of grid-shaped component arrays.

use fl_core::{Point, Real};
use ndarray::ArrayD;

use crate::error::{FieldError, FieldResult};
use crate::grid::closest_point_grid;

/// Bracketing samples on one axis and the weight of the upper one.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bracket {
    low: usize,
    high: usize,
    weight: Real,
}

fn bracket(axis: &[Real], anchor: usize, x: Real) -> Bracket {
    let (low, high) = if x > axis[anchor] && anchor + 1 < axis.len() {
        (anchor, anchor + 1)
    } else if x < axis[anchor] && anchor > 0 {
        (anchor - 1, anchor)
    } else {
        // on a node, or beyond the last sample: collapse to one sample
        (anchor, anchor)
    };

    let span = axis[high] - axis[low];
    let weight = if span == 0.0 {
        0.0
    } else {
        (x - axis[low]) / span
    };

    Bracket { low, high, weight }
}

/// Field vector at `point`, one value per component in input order.
///
/// The enclosing cell is found from the nearest node; each axis then uses the
/// two samples bracketing the coordinate (or the nearest single sample when
/// the coordinate sits on a node or outside the grid). Corner values are
/// combined with product-of-linear weights: bilinear in 2D, trilinear in 3D.
pub fn interpolate(
    point: &[Real],
    axes: &[Vec<Real>],
    components: &[ArrayD<Real>],
) -> FieldResult<Point> {
    let anchor = closest_point_grid(point, axes)?;
    let shape: Vec<usize> = axes.iter().map(Vec::len).collect();
    for (i, component) in components.iter().enumerate() {
        if component.shape() != shape.as_slice() {
            return Err(FieldError::ShapeMismatch {
                name: format!("component {i}"),
                expected: shape,
                got: component.shape().to_vec(),
            });
        }
    }

    let brackets: Vec<Bracket> = axes
        .iter()
        .zip(&anchor)
        .zip(point)
        .map(|((axis, &a), &x)| bracket(axis, a, x))
        .collect();

    let dim = axes.len();
    let mut out = vec![0.0; components.len()];
    let mut corner = vec![0usize; dim];

    for mask in 0..(1usize << dim) {
        let mut w = 1.0;
        for (d, b) in brackets.iter().enumerate() {
            if mask & (1 << d) == 0 {
                corner[d] = b.low;
                w *= 1.0 - b.weight;
            } else {
                corner[d] = b.high;
                w *= b.weight;
            }
        }
        if w == 0.0 {
            continue;
        }
        for (acc, component) in out.iter_mut().zip(components) {
            *acc += w * component[corner.as_slice()];
        }
    }

    Ok(fl_core::point(&out))
}
