//! The `imsmanifest.xml` model.
//!
//! The manifest is the single mutable artifact of a conversion: the
//! builder creates it, the annotator adds asset resources and the resolver
//! inserts dependency edges. Resources keep insertion order, which is also
//! the order they are written in.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use roxmltree::Node;
use thiserror::Error;

use crate::core::identifier::ResourceId;
use crate::core::resource::{Dependency, DependencyEdge, Resource, ScormType};
use crate::util::xml;

/// IMS Content Packaging namespace (default namespace of the manifest).
pub const IMSCP_NS: &str = "http://www.imsglobal.org/xsd/imscp_v1p1";

/// ADL content packaging namespace carrying `scormType`.
pub const ADLCP_NS: &str = "http://www.adlnet.org/xsd/adlcp_v1p3";

/// Namespace of the `origin` attribute marking resolver-inserted
/// dependencies.
pub const SCOPACK_NS: &str = "urn:scopack:manifest";

/// Value of `scopack:origin` on a resolved dependency.
pub const RESOLVED_ORIGIN: &str = "resolved";

/// Errors raised while reading or mutating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to parse manifest XML: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("manifest root must be `manifest`, found `{0}`")]
    NotAManifest(String),

    #[error("`resource` element without an `identifier` attribute")]
    MissingIdentifier,

    #[error("duplicate resource identifier `{0}`")]
    DuplicateResource(ResourceId),
}

/// Manifest `metadata` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub schema: String,
    pub schema_version: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            schema: "ADL SCORM".to_string(),
            schema_version: "2004 4th Edition".to_string(),
        }
    }
}

/// An `item` of an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub identifier: String,
    pub identifierref: Option<ResourceId>,
    pub title: String,
    pub children: Vec<Item>,
}

/// An `organization` (table of contents).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub identifier: String,
    pub title: String,
    pub items: Vec<Item>,
}

/// The parsed manifest tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Manifest identifier attribute
    pub identifier: String,

    /// Schema information
    pub metadata: Metadata,

    /// Identifier of the default organization
    pub default_organization: Option<String>,

    /// Organizations in document order
    pub organizations: Vec<Organization>,

    /// Resources in insertion order
    resources: Vec<Resource>,

    /// Identifier -> position in `resources`
    index: HashMap<ResourceId, usize>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new(identifier: impl Into<String>, metadata: Metadata) -> Self {
        Manifest {
            identifier: identifier.into(),
            metadata,
            default_organization: None,
            organizations: Vec::new(),
            resources: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::from_xml(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse a manifest from its XML text.
    ///
    /// Dependencies carrying `scopack:origin="resolved"` are read back as
    /// resolved; every other dependency is declared.
    pub fn from_xml(text: &str) -> Result<Self, ManifestError> {
        let doc = xml::parse(text)?;
        let root = doc.root_element();
        if root.tag_name().name() != "manifest" {
            return Err(ManifestError::NotAManifest(
                root.tag_name().name().to_string(),
            ));
        }

        let metadata = match child(root, "metadata") {
            Some(node) => Metadata {
                schema: child_text(node, "schema").unwrap_or_default(),
                schema_version: child_text(node, "schemaversion").unwrap_or_default(),
            },
            None => Metadata::default(),
        };

        let mut manifest = Manifest::new(root.attribute("identifier").unwrap_or_default(), metadata);

        if let Some(orgs) = child(root, "organizations") {
            manifest.default_organization = orgs.attribute("default").map(str::to_string);
            manifest.organizations = orgs
                .children()
                .filter(|n| n.has_tag_name("organization"))
                .map(|org| Organization {
                    identifier: org.attribute("identifier").unwrap_or_default().to_string(),
                    title: child_text(org, "title").unwrap_or_default(),
                    items: parse_items(org),
                })
                .collect();
        }

        if let Some(resources) = child(root, "resources") {
            for node in resources.children().filter(|n| n.has_tag_name("resource")) {
                manifest.add_resource(parse_resource(node)?)?;
            }
        }

        Ok(manifest)
    }

    /// Add a resource.
    ///
    /// Identifiers are unique within a manifest; a second resource with the
    /// same identifier is rejected.
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), ManifestError> {
        if self.index.contains_key(&resource.identifier) {
            return Err(ManifestError::DuplicateResource(resource.identifier));
        }
        self.index
            .insert(resource.identifier.clone(), self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    /// Look up a resource by identifier.
    pub fn resource(&self, identifier: &str) -> Option<&Resource> {
        self.index.get(identifier).map(|&i| &self.resources[i])
    }

    /// Look up the resource behind a module token.
    ///
    /// Exact identifiers win; otherwise the first resource whose identifier
    /// extends the token with an issue/language suffix is returned.
    pub fn find_module(&self, token: &str) -> Option<&Resource> {
        self.resource(token)
            .or_else(|| self.resources.iter().find(|r| r.identifier.refers_to(token)))
    }

    /// Look up a resource by identifier for mutation.
    pub fn resource_mut(&mut self, identifier: &str) -> Option<&mut Resource> {
        match self.index.get(identifier) {
            Some(&i) => Some(&mut self.resources[i]),
            None => None,
        }
    }

    /// All resources in manifest order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// SCO resources in manifest order.
    pub fn scos(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(|r| r.is_sco())
    }

    /// Every dependency edge in the manifest.
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge<'_>> {
        self.resources.iter().flat_map(|r| r.edges())
    }

    /// Total number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.resources.iter().map(|r| r.dependencies().len()).sum()
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name).map(|n| n.text().unwrap_or_default().trim().to_string())
}

fn parse_items(parent: Node<'_, '_>) -> Vec<Item> {
    parent
        .children()
        .filter(|n| n.has_tag_name("item"))
        .map(|item| Item {
            identifier: item.attribute("identifier").unwrap_or_default().to_string(),
            identifierref: item.attribute("identifierref").map(ResourceId::from),
            title: child_text(item, "title").unwrap_or_default(),
            children: parse_items(item),
        })
        .collect()
}

fn parse_resource(node: Node<'_, '_>) -> Result<Resource, ManifestError> {
    let identifier = node
        .attribute("identifier")
        .ok_or(ManifestError::MissingIdentifier)?;

    let scorm_type = node
        .attribute((ADLCP_NS, "scormType"))
        .or_else(|| {
            node.attributes()
                .find(|a| a.name() == "scormType")
                .map(|a| a.value())
        })
        .and_then(|value| value.parse::<ScormType>().ok())
        .unwrap_or(ScormType::Asset);

    let mut resource = Resource::new(identifier, scorm_type);
    resource.href = node.attribute("href").map(str::to_string);

    for n in node.children().filter(|n| n.is_element()) {
        match n.tag_name().name() {
            "file" => {
                if let Some(href) = n.attribute("href") {
                    resource.files.push(href.to_string());
                }
            }
            "dependency" => match n.attribute("identifierref") {
                Some(idref) if !idref.is_empty() => {
                    let dependency = match n.attribute((SCOPACK_NS, "origin")) {
                        Some(RESOLVED_ORIGIN) => Dependency::resolved(idref),
                        _ => Dependency::declared(idref),
                    };
                    resource.add_dependency(dependency);
                }
                _ => tracing::warn!(
                    "ignoring dependency without identifierref on `{}`",
                    identifier
                ),
            },
            _ => {}
        }
    }

    Ok(resource)
}
