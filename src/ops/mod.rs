//! High-level operations.
//!
//! This module contains the implementation of scopack commands.

pub mod annotate;
pub mod convert;
pub mod resolve;

pub use annotate::annotate;
pub use convert::{convert, ConvertOptions, ConvertResult};
pub use resolve::{resolve_manifest, resolve_package, ResolveEvent, ResolveOptions, ResolveResult};
