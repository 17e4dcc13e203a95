//! The URN resource map.

use std::io;

use serde::Serialize;

use crate::core::identifier::ResourceId;
use crate::util::xml::XmlWriter;

/// One URN and the package file it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrnEntry {
    /// Full URN, prefix included
    pub name: String,

    /// Path relative to the package root, `/`-separated
    pub target: String,
}

/// Ordered mapping from URN to package-relative file path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrnMap {
    /// Prefix carried by every URN in the map
    #[serde(skip)]
    prefix: String,

    entries: Vec<UrnEntry>,
}

impl UrnMap {
    pub fn new(prefix: impl Into<String>) -> Self {
        UrnMap {
            prefix: prefix.into(),
            entries: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Append an entry; callers check for conflicts first.
    pub(crate) fn push(&mut self, name: String, target: String) {
        self.entries.push(UrnEntry { name, target });
    }

    /// Entry for `urn`, if mapped.
    pub fn get(&self, urn: &str) -> Option<&UrnEntry> {
        self.entries.iter().find(|e| e.name == urn)
    }

    pub fn entries(&self) -> &[UrnEntry] {
        &self.entries
    }

    /// Resource identifiers and targets, in map order.
    pub fn identifiers(&self) -> impl Iterator<Item = (ResourceId, &str)> {
        self.entries
            .iter()
            .map(|e| (ResourceId::from_urn(&e.name, &self.prefix), e.target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `urn_resource_map.xml`.
    pub fn to_xml(&self) -> io::Result<String> {
        let mut w = XmlWriter::new()?;
        w.start("urn-resource-map", &[])?;
        for entry in &self.entries {
            w.start("urn", &[("name", entry.name.as_str())])?;
            w.start("target", &[("type", "file")])?;
            w.text(&entry.target)?;
            w.end("target")?;
            w.end("urn")?;
        }
        w.end("urn-resource-map")?;
        Ok(w.finish())
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}
