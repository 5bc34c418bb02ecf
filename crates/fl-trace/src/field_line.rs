//! Fixed-step field line integration.

use std::fmt;

use fl_core::{Point, Real, all_finite};
use fl_field::VectorField;
use serde::{Deserialize, Serialize};

use crate::boundary::BoundingBox;
use crate::error::{TraceError, TraceResult};
use crate::observer::{NoopObserver, PointObserver, StdoutObserver};

/// Why a trace stopped. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// Field magnitude fell to the stagnation tolerance.
    Stagnation,
    /// The next step would have left the bounding box.
    BoundaryExit,
    /// The sampled field had a NaN or infinite component.
    NonFiniteField,
    /// `max_steps` steps were taken.
    StepLimit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stagnation => write!(f, "stagnation"),
            Self::BoundaryExit => write!(f, "boundary exit"),
            Self::NonFiniteField => write!(f, "non-finite field"),
            Self::StepLimit => write!(f, "step limit"),
        }
    }
}

/// Lifecycle of a [`FieldLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Field and edges set, no initial point yet.
    Configured,
    /// Initial point set; cursor sits on the seed.
    Seeded,
    /// At least one trace has completed.
    Traced,
}

/// Options for a single trace.
#[derive(Clone, Debug)]
pub struct TraceOptions {
    /// Euclidean length of every step
    pub step_length: Real,
    /// Optional cap on the number of steps (unbounded when `None`)
    pub max_steps: Option<usize>,
    /// Field magnitudes at or below this are stagnation points
    pub stagnation_tol: Real,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            step_length: 1e-3,
            max_steps: None,
            stagnation_tol: 1e-12,
        }
    }
}

impl TraceOptions {
    pub fn new(step_length: Real) -> Self {
        Self {
            step_length,
            ..Self::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    fn validate(&self) -> TraceResult<()> {
        if !self.step_length.is_finite() || self.step_length <= 0.0 {
            return Err(TraceError::InvalidStep {
                what: format!("step length must be positive, got {}", self.step_length),
            });
        }
        if !self.stagnation_tol.is_finite() || self.stagnation_tol < 0.0 {
            return Err(TraceError::InvalidStep {
                what: format!(
                    "stagnation tolerance must be non-negative, got {}",
                    self.stagnation_tol
                ),
            });
        }
        Ok(())
    }
}

/// Summed segment lengths of the polyline through `points`.
pub fn polyline_length<'p, I>(points: I) -> Real
where
    I: IntoIterator<Item = &'p [Real]>,
{
    let mut total = 0.0;
    let mut previous: Option<&[Real]> = None;
    for point in points {
        if let Some(prev) = previous {
            total += prev
                .iter()
                .zip(point)
                .map(|(a, b)| (b - a) * (b - a))
                .sum::<Real>()
                .sqrt();
        }
        previous = Some(point);
    }
    total
}

/// Ordered points of a completed trace. Always starts with the seed.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub points: Vec<Point>,
    pub termination: Termination,
}

impl Trajectory {
    /// Number of points, seed included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for a trajectory produced by [`FieldLine`].
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of steps taken.
    pub fn steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Polyline length.
    pub fn arc_length(&self) -> Real {
        polyline_length(self.points.iter().map(|p| p.as_slice()))
    }

    /// Points as plain coordinate rows.
    pub fn rows(&self) -> Vec<Vec<Real>> {
        self.points
            .iter()
            .map(|p| p.iter().copied().collect())
            .collect()
    }
}

/// A streamline tracer over a borrowed vector field.
///
/// The field is never copied or mutated; several lines may share one field.
#[derive(Debug, Clone)]
pub struct FieldLine<'a> {
    field: &'a VectorField,
    edges: BoundingBox,
    seed: Option<Point>,
    cursor: Option<Point>,
    state: LineState,
}

impl<'a> FieldLine<'a> {
    /// Tracer over `field`, bounded by `edges` or by the grid extent when `None`.
    pub fn new(field: &'a VectorField, edges: Option<&[Real]>) -> TraceResult<Self> {
        let edges = match edges {
            Some(e) => BoundingBox::from_edges(e, field.dimension())?,
            None => BoundingBox::from_grid(field.grid()),
        };
        Ok(Self {
            field,
            edges,
            seed: None,
            cursor: None,
            state: LineState::Configured,
        })
    }

    pub fn field(&self) -> &'a VectorField {
        self.field
    }

    pub fn dimension(&self) -> usize {
        self.field.dimension()
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    pub fn edges(&self) -> &BoundingBox {
        &self.edges
    }

    /// Override the bounding box.
    ///
    /// With at least `2 * dimension` values the leading `2 * dimension` replace
    /// the box; with fewer, only the leading edges are overwritten.
    pub fn set_edges(&mut self, edges: &[Real]) -> &[Real] {
        self.edges.update(edges);
        self.edges.edges()
    }

    /// Set the seed and move the cursor onto it.
    pub fn set_initial_point(&mut self, p0: &[Real]) -> TraceResult<()> {
        if p0.len() != self.dimension() {
            return Err(TraceError::DimensionMismatch {
                expected: self.dimension(),
                got: p0.len(),
            });
        }
        let seed = fl_core::point(p0);
        self.cursor = Some(seed.clone());
        self.seed = Some(seed);
        self.state = LineState::Seeded;
        Ok(())
    }

    pub fn seed(&self) -> Option<&Point> {
        self.seed.as_ref()
    }

    /// Current tracer position: the seed, or the last point of the latest trace.
    pub fn cursor(&self) -> Option<&Point> {
        self.cursor.as_ref()
    }

    /// True when `point` lies inside the bounding box.
    pub fn contains(&self, point: &[Real]) -> bool {
        self.edges.contains(point)
    }

    /// Interpolated field vector at `point`.
    pub fn interpolate(&self, point: &[Real]) -> TraceResult<Point> {
        Ok(self.field.sample(point)?)
    }

    /// Grid node closest to the cursor.
    pub fn closest_point(&self) -> TraceResult<Vec<usize>> {
        let cursor = self.cursor.as_ref().ok_or(TraceError::NotSeeded)?;
        Ok(self.field.grid().closest_node(cursor.as_slice())?)
    }

    /// Trace from the seed with `step_length`, printing points when `emit_points`.
    pub fn trajectory(&mut self, step_length: Real, emit_points: bool) -> TraceResult<Trajectory> {
        let options = TraceOptions::new(step_length);
        if emit_points {
            self.trajectory_with(&options, &mut StdoutObserver)
        } else {
            self.trajectory_with(&options, &mut NoopObserver)
        }
    }

    /// Trace from the seed, reporting every appended point to `observer`.
    ///
    /// Fails before stepping when the line is unseeded, the options are
    /// invalid, or the seed is outside the box. Otherwise the whole line is
    /// built eagerly and returned with its [`Termination`].
    pub fn trajectory_with(
        &mut self,
        options: &TraceOptions,
        observer: &mut dyn PointObserver,
    ) -> TraceResult<Trajectory> {
        let seed = self.seed.clone().ok_or(TraceError::NotSeeded)?;
        options.validate()?;
        if !self.edges.contains(seed.as_slice()) {
            return Err(TraceError::out_of_domain(&seed, self.edges.edges()));
        }

        tracing::debug!(
            dimension = self.dimension(),
            step_length = options.step_length,
            max_steps = ?options.max_steps,
            "tracing field line"
        );

        let mut cursor = seed.clone();
        let mut points = vec![seed];
        observer.on_point(0, &cursor);

        let termination = loop {
            if let Some(max) = options.max_steps
                && points.len() - 1 >= max
            {
                break Termination::StepLimit;
            }

            let e = self.field.sample(cursor.as_slice())?;
            if !all_finite(&e) {
                break Termination::NonFiniteField;
            }
            let magnitude = e.norm();
            if magnitude <= options.stagnation_tol {
                break Termination::Stagnation;
            }

            let direction = e / magnitude;
            let next = &cursor + direction * options.step_length;
            if !self.edges.contains(next.as_slice()) {
                break Termination::BoundaryExit;
            }

            observer.on_point(points.len(), &next);
            points.push(next.clone());
            cursor = next;
        };

        tracing::debug!(points = points.len(), %termination, "field line finished");

        self.cursor = Some(cursor);
        self.state = LineState::Traced;
        Ok(Trajectory {
            points,
            termination,
        })
    }
}
