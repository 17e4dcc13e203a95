//! Per-unit closure bookkeeping.

use std::collections::HashSet;

use crate::core::identifier::ResourceId;
use crate::core::Manifest;

/// Insertion-ordered set of dependency identifiers.
///
/// Iteration order is first-insertion order; it becomes the order edges
/// are written in.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    order: Vec<ResourceId>,
    members: HashSet<ResourceId>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an identifier; returns `false` if it was already present.
    pub fn insert(&mut self, id: ResourceId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceId> {
        self.order.iter()
    }
}

impl IntoIterator for DependencySet {
    type Item = ResourceId;
    type IntoIter = std::vec::IntoIter<ResourceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

/// Declared dependencies of every unit, in manifest order.
///
/// Built once at the start of a pass and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ResolutionMap {
    entries: Vec<(ResourceId, Vec<ResourceId>)>,
}

impl ResolutionMap {
    /// Capture the declared edges of every SCO in the manifest.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let entries = manifest
            .scos()
            .map(|sco| {
                (
                    sco.identifier.clone(),
                    sco.declared_dependencies().cloned().collect(),
                )
            })
            .collect();

        ResolutionMap { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceId, &[ResourceId])> {
        self.entries.iter().map(|(id, seeds)| (id, seeds.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
