//! Core data structures for scopack.
//!
//! This module contains the foundational types used throughout scopack:
//! - Resource identifiers and S1000D document codes
//! - Manifest resources and their dependency edges
//! - The manifest tree itself
//! - Parsed content documents and the loaders that fetch them

pub mod document;
pub mod identifier;
pub mod manifest;
pub mod resource;

pub use document::{ContentDocument, DocumentLoader, FsDocumentLoader, LoadError};
pub use identifier::ResourceId;
pub use manifest::{Manifest, ManifestError};
pub use resource::{Dependency, DependencyOrigin, Resource, ScormType};
