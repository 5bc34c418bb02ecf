//! Field line tracing over structured vector fields.
//!
//! A [`FieldLine`] borrows a [`fl_field::VectorField`], is seeded with an
//! initial point, and advances a tracer with fixed-length steps along the
//! normalized local field until it leaves its [`BoundingBox`], reaches a
//! stagnation point, or runs into missing field data.

pub mod boundary;
pub mod error;
pub mod field_line;
pub mod observer;

pub use boundary::{BoundingBox, contains};
pub use error::{TraceError, TraceResult};
pub use field_line::{
    FieldLine, LineState, Termination, TraceOptions, Trajectory, polyline_length,
};
pub use observer::{NoopObserver, PointObserver, StdoutObserver};
