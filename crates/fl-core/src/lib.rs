//! fl-core: shared foundation for fieldline.
//!
//! Contains:
//! - numeric (Real, Point, tolerances, float helpers)
//! - units (uom length types + export unit lookup)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{FlError, FlResult};
pub use numeric::*;
pub use units::*;
