//! Manifest construction and serialization.
//!
//! This module turns a SCORM content package module into the initial
//! manifest tree and writes finished manifests back out.

pub mod scpm;
pub mod writer;

pub use scpm::{build_manifest, BuildError};
pub use writer::write_manifest;
