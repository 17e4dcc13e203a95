//! Resource package sources.
//!
//! A resource package is the directory of data modules, publication
//! modules and ICN media that a SCORM package is built from. This layer
//! names every file in it.

pub mod package;
pub mod urn_map;

pub use package::{scan_package, MapError};
pub use urn_map::{UrnEntry, UrnMap};
