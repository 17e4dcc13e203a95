//! Test utilities for scopack unit tests.
//!
//! Provides fixture builders for S1000D content and an in-memory document
//! loader, so resolution can be tested without touching the filesystem.
//!
//! # Example
//!
//! ```rust,ignore
//! use scopack::test_support::MemoryLoader;
//!
//! let mut loader = MemoryLoader::new();
//! loader.add("DMC-A", &["ICN-1"], &["DMC-B"]);
//! loader.add("DMC-B", &[], &[]);
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::rc::Rc;

use crate::core::document::{ContentDocument, DocumentLoader, LoadError};
use crate::core::identifier::ResourceId;
use crate::core::resource::Resource;
use crate::util::xml;

// Re-export fixtures for convenience
pub use fixtures::*;

/// In-memory document loader.
///
/// Resources without a registered document load as `NotFound`.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    documents: HashMap<ResourceId, Rc<ContentDocument>>,
    broken: Vec<ResourceId>,
    loads: Vec<ResourceId>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document with its media and module references.
    pub fn add(&mut self, identifier: &str, media: &[&str], modules: &[&str]) -> &mut Self {
        let document = ContentDocument::new(
            identifier,
            media.iter().map(|m| ResourceId::from(*m)).collect(),
            modules.iter().map(|m| ResourceId::from(*m)).collect(),
        );
        self.documents
            .insert(ResourceId::from(identifier), Rc::new(document));
        self
    }

    /// Register a resource whose document fails to parse.
    pub fn add_broken(&mut self, identifier: &str) -> &mut Self {
        self.broken.push(ResourceId::from(identifier));
        self
    }

    /// Identifiers loaded so far, in call order.
    pub fn loads(&self) -> &[ResourceId] {
        &self.loads
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&mut self, resource: &Resource) -> Result<Rc<ContentDocument>, LoadError> {
        let identifier = &resource.identifier;
        self.loads.push(identifier.clone());

        if self.broken.contains(identifier) {
            let source = match xml::parse("<dmodule>") {
                Err(err) => err,
                Ok(_) => unreachable!("unterminated element parsed"),
            };
            return Err(LoadError::Parse {
                identifier: identifier.clone(),
                source,
            });
        }

        self.documents
            .get(identifier)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(identifier.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::DEFAULT_MEDIA_ATTRIBUTE;
    use tempfile::TempDir;

    #[test]
    fn test_memory_loader() {
        let mut loader = MemoryLoader::new();
        loader.add("DM-A", &["ICN-1"], &["DM-B"]);

        let doc = loader.load(&Resource::asset("DM-A", "DM-A.XML")).unwrap();
        assert_eq!(doc.media_references()[0].as_str(), "ICN-1");
        assert_eq!(doc.module_references()[0].as_str(), "DM-B");

        let missing = loader.load(&Resource::asset("DM-B", "DM-B.XML"));
        assert!(matches!(missing, Err(LoadError::NotFound(_))));
        assert_eq!(loader.loads().len(), 2);
    }

    #[test]
    fn test_data_module_fixture_parses() {
        let fixture = DataModuleFixture::new("BIKE", "041")
            .with_media(&["ICN-A"])
            .with_refs(&["520"]);
        let doc =
            ContentDocument::parse(fixture.token(), &data_module(&fixture), DEFAULT_MEDIA_ATTRIBUTE)
                .unwrap();

        assert_eq!(doc.media_references()[0].as_str(), "ICN-A");
        let modules: Vec<_> = doc.module_references().iter().map(|m| m.as_str()).collect();
        assert_eq!(modules, vec![dm_token("BIKE", "520")]);
    }

    #[test]
    fn test_package_fixture_writes_files() {
        let tmp = TempDir::new().unwrap();
        let (package, _) = bike_package();
        package.write_to(tmp.path()).unwrap();

        assert!(tmp.path().join("ICN-A.CGM").is_file());
        assert!(tmp
            .path()
            .join(format!("{}_001-00_EN-US.XML", dm_token("BIKE", "041")))
            .is_file());
    }
}
