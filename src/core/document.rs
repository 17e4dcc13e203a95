//! Parsed content documents and the loaders that fetch them.
//!
//! A [`ContentDocument`] keeps only what dependency resolution queries: the
//! media identifiers a module points at and the data modules it refers to.
//! Documents are read-only once parsed, so loaders are free to cache them.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::core::identifier::{DmCode, ResourceId};
use crate::core::resource::Resource;
use crate::util::fs::is_xml_file;
use crate::util::xml;

/// Default attribute naming a referenced media (ICN) file.
pub const DEFAULT_MEDIA_ATTRIBUTE: &str = "infoEntityIdent";

/// Error fetching a document for a resource.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no file backs resource `{0}`")]
    NotFound(ResourceId),

    #[error("failed to read `{identifier}` from {}", .path.display())]
    Io {
        identifier: ResourceId,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse `{identifier}`: {source}")]
    Parse {
        identifier: ResourceId,
        #[source]
        source: roxmltree::Error,
    },
}

/// The queryable view of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    identifier: ResourceId,
    media: Vec<ResourceId>,
    modules: Vec<ResourceId>,
}

impl ContentDocument {
    /// A document with no references (media files, non-module content).
    pub fn empty(identifier: impl Into<ResourceId>) -> Self {
        ContentDocument {
            identifier: identifier.into(),
            media: Vec::new(),
            modules: Vec::new(),
        }
    }

    /// A document with the given references, in order.
    pub fn new(
        identifier: impl Into<ResourceId>,
        media: Vec<ResourceId>,
        modules: Vec<ResourceId>,
    ) -> Self {
        ContentDocument {
            identifier: identifier.into(),
            media,
            modules,
        }
    }

    /// Parse a document and index its references.
    ///
    /// Media references are the values of `media_attribute` anywhere in the
    /// tree. Module references are the `dmRef` elements of the body (the
    /// `content` element, or the whole tree if there is none). Both lists
    /// are deduplicated in document order.
    pub fn parse(
        identifier: impl Into<ResourceId>,
        text: &str,
        media_attribute: &str,
    ) -> Result<Self, roxmltree::Error> {
        let doc = xml::parse(text)?;
        let root = doc.root_element();

        let mut seen = HashSet::new();
        let media = root
            .descendants()
            .filter_map(|n| n.attribute(media_attribute))
            .filter(|value| !value.is_empty() && seen.insert(*value))
            .map(ResourceId::from)
            .collect();

        let body = root
            .descendants()
            .find(|n| n.has_tag_name("content"))
            .unwrap_or(root);

        let mut seen = HashSet::new();
        let modules = body
            .descendants()
            .filter(|n| n.has_tag_name("dmRef"))
            .filter_map(|dm_ref| dm_ref.descendants().find(|n| n.has_tag_name("dmCode")))
            .filter_map(DmCode::from_element)
            .map(|code| code.to_token())
            .filter(|token| seen.insert(token.clone()))
            .map(ResourceId::from)
            .collect();

        Ok(ContentDocument {
            identifier: identifier.into(),
            media,
            modules,
        })
    }

    pub fn identifier(&self) -> &ResourceId {
        &self.identifier
    }

    /// Distinct media identifiers, in document order.
    pub fn media_references(&self) -> &[ResourceId] {
        &self.media
    }

    /// Distinct data module tokens, in document order.
    pub fn module_references(&self) -> &[ResourceId] {
        &self.modules
    }

    /// Module references not yet linked by `unit`.
    ///
    /// Drops references that an existing edge of the unit already names and
    /// references to the unit itself.
    pub fn module_references_for<'a>(
        &'a self,
        unit: &'a Resource,
    ) -> impl Iterator<Item = &'a ResourceId> + 'a {
        self.module_references()
            .iter()
            .filter(move |m| **m != unit.identifier && !unit.links_module(m.as_str()))
    }
}

/// Fetches the document backing a manifest resource.
pub trait DocumentLoader {
    fn load(&mut self, resource: &Resource) -> Result<Rc<ContentDocument>, LoadError>;
}

/// Loads documents from a package directory on disk.
///
/// A resource's `href` (or first `file`) is mapped back to the package by
/// stripping the manifest href prefix.
#[derive(Debug, Clone)]
pub struct FsDocumentLoader {
    package_dir: PathBuf,
    href_prefix: String,
    media_attribute: String,
}

impl FsDocumentLoader {
    pub fn new(package_dir: &Path, href_prefix: &str, media_attribute: &str) -> Self {
        FsDocumentLoader {
            package_dir: package_dir.to_path_buf(),
            href_prefix: href_prefix.to_string(),
            media_attribute: media_attribute.to_string(),
        }
    }

    /// Path of the file backing `resource`, if it has a location.
    pub fn path_for(&self, resource: &Resource) -> Option<PathBuf> {
        let href = resource
            .href
            .as_deref()
            .or_else(|| resource.files.first().map(String::as_str))?;
        let relative = href.strip_prefix(&self.href_prefix).unwrap_or(href);
        Some(self.package_dir.join(relative))
    }
}

impl DocumentLoader for FsDocumentLoader {
    fn load(&mut self, resource: &Resource) -> Result<Rc<ContentDocument>, LoadError> {
        let identifier = &resource.identifier;
        let path = match self.path_for(resource) {
            Some(path) if path.is_file() => path,
            _ => return Err(LoadError::NotFound(identifier.clone())),
        };

        if !is_xml_file(&path) {
            return Ok(Rc::new(ContentDocument::empty(identifier.clone())));
        }

        let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            identifier: identifier.clone(),
            path: path.clone(),
            source,
        })?;

        tracing::debug!("parsing {}", path.display());
        let document = ContentDocument::parse(identifier.clone(), &text, &self.media_attribute)
            .map_err(|source| LoadError::Parse {
                identifier: identifier.clone(),
                source,
            })?;

        Ok(Rc::new(document))
    }
}

/// Load-once cache in front of another loader.
pub struct CachingLoader<L> {
    inner: L,
    cache: HashMap<ResourceId, Rc<ContentDocument>>,
    hits: usize,
}

impl<L: DocumentLoader> CachingLoader<L> {
    pub fn new(inner: L) -> Self {
        CachingLoader {
            inner,
            cache: HashMap::new(),
            hits: 0,
        }
    }

    /// Number of loads served from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

impl<L: DocumentLoader> DocumentLoader for CachingLoader<L> {
    fn load(&mut self, resource: &Resource) -> Result<Rc<ContentDocument>, LoadError> {
        if let Some(document) = self.cache.get(&resource.identifier) {
            self.hits += 1;
            return Ok(Rc::clone(document));
        }

        let document = self.inner.load(resource)?;
        self.cache
            .insert(resource.identifier.clone(), Rc::clone(&document));
        Ok(document)
    }
}
