//! fl-comsol: reader for COMSOL spreadsheet-style text exports.
//!
//! Provides:
//! - Header parsing (dimension, length unit, column layout, sweep parameters)
//! - Grid reconstruction from exported node coordinates
//! - Snapshot selection by sweep parameters and conversion to a `VectorField`
//!
//! # Example
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use std::path::Path;
//! use fl_comsol::{ComsolExport, DEFAULT_HEADER_ROWS};
//!
//! let export = ComsolExport::from_path(Path::new("field.txt"), DEFAULT_HEADER_ROWS).unwrap();
//! let mut selection = BTreeMap::new();
//! selection.insert("V0".to_string(), 1.0);
//! let field = export.vector_field(&selection, false).unwrap();
//! println!("{}D field, {}", field.dimension(), field.convention());
//! ```

pub mod error;
pub mod header;
pub mod reader;

pub use error::{ComsolError, ComsolResult};
pub use header::{
    ColumnLayout, DEFAULT_HEADER_ROWS, ExportHeader, FieldColumn, SweepParam, SweepSpace,
    Variable, parse_columns, parse_header, parse_number,
};
pub use reader::{ComsolExport, Selection, Snapshot};
