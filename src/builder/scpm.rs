//! Initial manifest from a SCORM content package module (SCPM).
//!
//! Each `scoEntry` becomes an organization item; entries that point at
//! content also become SCO resources declaring the modules they show.

use std::collections::HashSet;

use roxmltree::Node;
use thiserror::Error;

use crate::core::identifier::{DmCode, ScpmCode};
use crate::core::manifest::{Item, ManifestError, Organization};
use crate::core::resource::{Dependency, Resource};
use crate::core::Manifest;
use crate::util::config::Config;
use crate::util::xml;

/// Identifier of the single organization.
pub const ORGANIZATION_ID: &str = "ORG-1";

/// Error building a manifest from an SCPM.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to parse SCORM content package module: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("expected a `scormContentPackage` document, found `{0}`")]
    NotScpm(String),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Build the initial manifest tree from SCPM text.
pub fn build_manifest(scpm_xml: &str, config: &Config) -> Result<Manifest, BuildError> {
    let doc = xml::parse(scpm_xml)?;
    let root = doc.root_element();
    if !root.has_tag_name("scormContentPackage") {
        return Err(BuildError::NotScpm(root.tag_name().name().to_string()));
    }

    let identifier = root
        .descendants()
        .find(|n| n.has_tag_name("scormContentPackageCode"))
        .and_then(ScpmCode::from_element)
        .map(|code| format!("MANIFEST-{}", code.to_token()))
        .unwrap_or_else(|| "MANIFEST-1".to_string());

    let title = root
        .descendants()
        .find(|n| n.has_tag_name("scormContentPackageTitle"))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    let mut manifest = Manifest::new(identifier, config.metadata());

    let body = root
        .children()
        .find(|n| n.has_tag_name("content"))
        .unwrap_or(root);

    let mut builder = EntryBuilder::default();
    let items = builder.items(body);
    tracing::debug!(
        "{} entries, {} with content",
        builder.count,
        builder.scos.len()
    );

    for sco in builder.scos {
        manifest.add_resource(sco)?;
    }

    manifest.default_organization = Some(ORGANIZATION_ID.to_string());
    manifest.organizations.push(Organization {
        identifier: ORGANIZATION_ID.to_string(),
        title,
        items,
    });

    Ok(manifest)
}

#[derive(Default)]
struct EntryBuilder {
    count: usize,
    scos: Vec<Resource>,
}

impl EntryBuilder {
    /// Items for the `scoEntry` elements under `parent`, in document order.
    fn items(&mut self, parent: Node<'_, '_>) -> Vec<Item> {
        let mut items = Vec::new();
        for child in parent.children().filter(|n| n.is_element()) {
            if child.has_tag_name("scoEntry") {
                items.push(self.entry(child));
            } else {
                items.extend(self.items(child));
            }
        }
        items
    }

    fn entry(&mut self, entry: Node<'_, '_>) -> Item {
        self.count += 1;
        let n = self.count;

        let modules = entry_modules(entry);
        let identifierref = if modules.is_empty() {
            None
        } else {
            let mut sco = Resource::sco(format!("SCO-{}", n));
            for token in modules {
                sco.add_dependency(Dependency::declared(token));
            }
            let id = sco.identifier.clone();
            self.scos.push(sco);
            Some(id)
        };

        let children = entry
            .children()
            .filter(|c| c.has_tag_name("scoEntry"))
            .map(|c| self.entry(c))
            .collect();

        Item {
            identifier: format!("ITEM-{}", n),
            identifierref,
            title: entry_title(entry),
            children,
        }
    }
}

/// Title of `entry` itself, ignoring nested entries.
fn entry_title(entry: Node<'_, '_>) -> String {
    entry
        .descendants()
        .filter(|n| n.has_tag_name("scoEntryTitle"))
        .find(|n| n.ancestors().find(|a| a.has_tag_name("scoEntry")) == Some(entry))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Distinct module tokens referenced by the entry's own content.
fn entry_modules(entry: Node<'_, '_>) -> Vec<String> {
    let Some(content) = entry
        .children()
        .find(|n| n.has_tag_name("scoEntryContent"))
    else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    content
        .descendants()
        .filter(|n| n.has_tag_name("dmRef"))
        .filter_map(|r| r.descendants().find(|n| n.has_tag_name("dmCode")))
        .filter_map(DmCode::from_element)
        .map(|code| code.to_token())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
