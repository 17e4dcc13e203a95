//! Manifest resources and their dependency edges.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::identifier::ResourceId;

/// SCORM resource type (`adlcp:scormType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScormType {
    /// Shareable content object: a launchable learning unit.
    Sco,
    /// Any other file in the package.
    Asset,
}

impl ScormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScormType::Sco => "sco",
            ScormType::Asset => "asset",
        }
    }
}

impl fmt::Display for ScormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScormType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sco" => Ok(ScormType::Sco),
            "asset" => Ok(ScormType::Asset),
            _ => Err(format!(
                "invalid scormType '{}'; expected 'sco' or 'asset'",
                s
            )),
        }
    }
}

/// Where a dependency edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyOrigin {
    /// Present before resolution (built from the SCPM, or read from disk
    /// without a resolved marker).
    Declared,
    /// Inserted by the dependency resolver.
    Resolved,
}

/// A `dependency` child of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub identifierref: ResourceId,
    pub origin: DependencyOrigin,
}

impl Dependency {
    pub fn declared(identifierref: impl Into<ResourceId>) -> Self {
        Dependency {
            identifierref: identifierref.into(),
            origin: DependencyOrigin::Declared,
        }
    }

    pub fn resolved(identifierref: impl Into<ResourceId>) -> Self {
        Dependency {
            identifierref: identifierref.into(),
            origin: DependencyOrigin::Resolved,
        }
    }
}

/// A borrowed `(from, to)` view of one dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencyEdge<'a> {
    pub from: &'a ResourceId,
    pub to: &'a ResourceId,
}

/// A `resource` entry of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Unique identifier within the manifest
    pub identifier: ResourceId,

    /// SCORM type of the resource
    pub scorm_type: ScormType,

    /// Package-relative location
    pub href: Option<String>,

    /// `file` children
    pub files: Vec<String>,

    /// Dependency edges, in manifest order
    dependencies: Vec<Dependency>,
}

impl Resource {
    /// Create an asset resource backed by a single file.
    pub fn asset(identifier: impl Into<ResourceId>, href: impl Into<String>) -> Self {
        let href = href.into();
        Resource {
            identifier: identifier.into(),
            scorm_type: ScormType::Asset,
            files: vec![href.clone()],
            href: Some(href),
            dependencies: Vec::new(),
        }
    }

    /// Create a resource with no location, files or dependencies.
    pub fn new(identifier: impl Into<ResourceId>, scorm_type: ScormType) -> Self {
        Resource {
            identifier: identifier.into(),
            scorm_type,
            href: None,
            files: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Create a SCO resource without any dependencies.
    pub fn sco(identifier: impl Into<ResourceId>) -> Self {
        Resource::new(identifier, ScormType::Sco)
    }

    pub fn is_sco(&self) -> bool {
        self.scorm_type == ScormType::Sco
    }

    /// Dependency edges in manifest order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Identifiers this resource depends on, declared ones only.
    pub fn declared_dependencies(&self) -> impl Iterator<Item = &ResourceId> {
        self.dependencies
            .iter()
            .filter(|d| d.origin == DependencyOrigin::Declared)
            .map(|d| &d.identifierref)
    }

    /// Check if an edge to `target` already exists.
    pub fn depends_on(&self, target: &str) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.identifierref.as_str() == target)
    }

    /// Check if any existing edge names the module behind `token`.
    pub fn links_module(&self, token: &str) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.identifierref.refers_to(token))
    }

    /// Add a dependency edge.
    ///
    /// Returns `false` (and changes nothing) for duplicates and self-edges.
    pub fn add_dependency(&mut self, dependency: Dependency) -> bool {
        if dependency.identifierref == self.identifier
            || self.depends_on(dependency.identifierref.as_str())
        {
            return false;
        }
        self.dependencies.push(dependency);
        true
    }

    /// Iterate the edges leaving this resource.
    pub fn edges(&self) -> impl Iterator<Item = DependencyEdge<'_>> {
        self.dependencies.iter().map(move |d| DependencyEdge {
            from: &self.identifier,
            to: &d.identifierref,
        })
    }
}
