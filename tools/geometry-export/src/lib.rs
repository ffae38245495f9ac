//! geometry-export library
//!
//! Shape config parsing and OBJ output, shared by the CLI and its tests.

pub mod config;
pub mod obj;

pub use config::{ExportConfig, OutputSection, ShapeConfig};
pub use obj::write_obj;
