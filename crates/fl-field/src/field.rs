//! Vector fields on structured grids.

use std::collections::BTreeMap;
use std::fmt;

use fl_core::{Point, Real};
use ndarray::ArrayD;

use crate::error::{FieldError, FieldResult};
use crate::grid::Grid;

/// Supported component naming conventions.
///
/// Detected once when the field is built; the component order of the field
/// follows the order of [`ComponentConvention::names`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentConvention {
    /// 2D Cartesian: `Ex`, `Ey`
    Cartesian2D,
    /// 2D axisymmetric: `Er`, `Ez`
    Cylindrical2D,
    /// 3D Cartesian: `Ex`, `Ey`, `Ez`
    Cartesian3D,
}

impl ComponentConvention {
    /// Component names in field order.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Cartesian2D => &["Ex", "Ey"],
            Self::Cylindrical2D => &["Er", "Ez"],
            Self::Cartesian3D => &["Ex", "Ey", "Ez"],
        }
    }

    pub fn dimension(self) -> usize {
        self.names().len()
    }

    /// Pick the convention whose names are all available.
    ///
    /// In 2D, Cartesian components take precedence over cylindrical ones.
    pub fn detect<'a, I>(dimension: usize, available: I) -> FieldResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let available: Vec<&str> = available.into_iter().collect();
        let candidates: &[Self] = match dimension {
            2 => &[Self::Cartesian2D, Self::Cylindrical2D],
            3 => &[Self::Cartesian3D],
            _ => &[],
        };

        candidates
            .iter()
            .copied()
            .find(|c| c.names().iter().all(|n| available.contains(n)))
            .ok_or_else(|| FieldError::MissingComponents {
                dimension,
                available: available.iter().map(|s| s.to_string()).collect(),
            })
    }
}

impl fmt::Display for ComponentConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cartesian2D => write!(f, "Cartesian 2D (Ex, Ey)"),
            Self::Cylindrical2D => write!(f, "Cylindrical 2D (Er, Ez)"),
            Self::Cartesian3D => write!(f, "Cartesian 3D (Ex, Ey, Ez)"),
        }
    }
}

/// A vector field sampled on every node of a [`Grid`].
///
/// Component arrays are indexed `[i, j(, k)]` in axis order. The field is
/// immutable once built.
#[derive(Debug, Clone)]
pub struct VectorField {
    grid: Grid,
    convention: ComponentConvention,
    components: Vec<ArrayD<Real>>,
}

impl VectorField {
    /// Build a field from named arrays, detecting the naming convention.
    ///
    /// Names outside the detected convention are ignored.
    pub fn from_named(grid: Grid, mut named: BTreeMap<String, ArrayD<Real>>) -> FieldResult<Self> {
        let convention =
            ComponentConvention::detect(grid.dimension(), named.keys().map(String::as_str))?;

        let mut components = Vec::with_capacity(convention.dimension());
        for name in convention.names() {
            // detect() guarantees presence
            if let Some(array) = named.remove(*name) {
                components.push(array);
            }
        }

        Self::new(grid, convention, components)
    }

    /// Build a field from arrays already ordered by `convention`.
    pub fn new(
        grid: Grid,
        convention: ComponentConvention,
        components: Vec<ArrayD<Real>>,
    ) -> FieldResult<Self> {
        if convention.dimension() != grid.dimension() {
            return Err(FieldError::DimensionMismatch {
                expected: grid.dimension(),
                got: convention.dimension(),
            });
        }
        if components.len() != convention.dimension() {
            return Err(FieldError::DimensionMismatch {
                expected: convention.dimension(),
                got: components.len(),
            });
        }

        let shape = grid.shape();
        for (name, array) in convention.names().iter().zip(&components) {
            if array.shape() != shape.as_slice() {
                return Err(FieldError::ShapeMismatch {
                    name: name.to_string(),
                    expected: shape.clone(),
                    got: array.shape().to_vec(),
                });
            }
        }

        let missing = components[0].iter().filter(|v| !v.is_finite()).count();
        if missing > 0 {
            tracing::debug!(
                missing,
                nodes = grid.node_count(),
                "field has non-finite samples"
            );
        }

        Ok(Self {
            grid,
            convention,
            components,
        })
    }

    pub fn dimension(&self) -> usize {
        self.grid.dimension()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn convention(&self) -> ComponentConvention {
        self.convention
    }

    /// Component arrays in convention order.
    pub fn components(&self) -> &[ArrayD<Real>] {
        &self.components
    }

    /// Look up a component array by name.
    pub fn component(&self, name: &str) -> Option<&ArrayD<Real>> {
        self.convention
            .names()
            .iter()
            .position(|n| *n == name)
            .map(|i| &self.components[i])
    }

    /// Stored field vector at a grid node.
    pub fn at_node(&self, index: &[usize]) -> Option<Point> {
        let values: Option<Vec<Real>> = self
            .components
            .iter()
            .map(|c| c.get(index).copied())
            .collect();
        values.map(|v| fl_core::point(&v))
    }

    /// Interpolated field vector at `point` (see [`crate::interpolate`]).
    pub fn sample(&self, point: &[Real]) -> FieldResult<Point> {
        crate::interpolate::interpolate(point, self.grid.axes(), &self.components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn unit_grid() -> Grid {
        Grid::new(vec![vec![0.0, 1.0], vec![0.0, 1.0]]).unwrap()
    }

    fn filled(value: Real) -> ArrayD<Real> {
        ArrayD::from_elem(IxDyn(&[2, 2]), value)
    }

    #[test]
    fn detects_cartesian_2d() {
        let c = ComponentConvention::detect(2, ["normE", "Ey", "Ex"]).unwrap();
        assert_eq!(c, ComponentConvention::Cartesian2D);
    }

    #[test]
    fn detects_cylindrical_2d() {
        let c = ComponentConvention::detect(2, ["Er", "Ez"]).unwrap();
        assert_eq!(c, ComponentConvention::Cylindrical2D);
    }

    #[test]
    fn cartesian_wins_when_both_present() {
        let c = ComponentConvention::detect(2, ["Er", "Ez", "Ex", "Ey"]).unwrap();
        assert_eq!(c, ComponentConvention::Cartesian2D);
    }

    #[test]
    fn incomplete_set_is_rejected() {
        let err = ComponentConvention::detect(3, ["Ex", "Ey"]).unwrap_err();
        assert!(matches!(
            err,
            FieldError::MissingComponents { dimension: 3, .. }
        ));
        assert!(ComponentConvention::detect(2, ["Ex", "Ez"]).is_err());
    }

    #[test]
    fn from_named_orders_components() {
        let mut named = BTreeMap::new();
        named.insert("Ez".to_string(), filled(2.0));
        named.insert("Er".to_string(), filled(1.0));
        named.insert("normE".to_string(), filled(9.0));

        let field = VectorField::from_named(unit_grid(), named).unwrap();
        assert_eq!(field.convention(), ComponentConvention::Cylindrical2D);
        assert_eq!(field.components().len(), 2);
        assert_eq!(field.components()[0][[0, 0].as_slice()], 1.0);
        assert_eq!(field.components()[1][[1, 1].as_slice()], 2.0);
        assert!(field.component("Er").is_some());
        assert!(field.component("normE").is_none());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let mut named = BTreeMap::new();
        named.insert("Ex".to_string(), filled(1.0));
        named.insert("Ey".to_string(), ArrayD::zeros(IxDyn(&[3, 2])));

        let err = VectorField::from_named(unit_grid(), named).unwrap_err();
        assert!(matches!(err, FieldError::ShapeMismatch { ref name, .. } if name == "Ey"));
    }

    #[test]
    fn at_node_reads_stored_values() {
        let field = VectorField::new(
            unit_grid(),
            ComponentConvention::Cartesian2D,
            vec![filled(3.0), filled(-4.0)],
        )
        .unwrap();
        let v = field.at_node(&[1, 0]).unwrap();
        assert_eq!(v.as_slice(), &[3.0, -4.0]);
        assert!(field.at_node(&[2, 0]).is_none());
    }

    #[test]
    fn field_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VectorField>();
    }
}
