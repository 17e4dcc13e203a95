//! scopack - SCORM packaging for S1000D content
//!
//! This crate turns an S1000D resource package and its SCORM content
//! package module into an `imsmanifest.xml`, resolving the content each
//! SCO needs into dependency edges.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test fixtures for scopack unit tests.
///
/// This module is only available when running tests. It provides
/// builders for S1000D documents and packages, and an in-memory
/// document loader.
#[cfg(test)]
pub mod test_support;

pub use core::{
    document::DocumentLoader, identifier::ResourceId, manifest::Manifest, resource::Resource,
};

pub use resolver::{resolve, ResolveError, ResolveReport};
pub use util::context::GlobalContext;
