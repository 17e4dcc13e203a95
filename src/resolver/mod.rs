//! Dependency resolution.
//!
//! Computes, for every SCO of a manifest, the closure of content it needs
//! and writes it back as dependency edges. A unit's closure holds:
//!
//! - media referenced by each of its declared modules,
//! - data modules those declared modules refer to (one hop, skipping
//!   modules the unit already links),
//! - media referenced by those nested modules.
//!
//! Closures are computed for every unit before any edge is written, so a
//! failed pass leaves the manifest exactly as it was.

pub mod closure;
pub mod errors;
pub mod graph;

pub use closure::{DependencySet, ResolutionMap};
pub use errors::ResolveError;
pub use graph::DependencyGraph;

use std::rc::Rc;

use crate::core::document::{ContentDocument, DocumentLoader};
use crate::core::identifier::ResourceId;
use crate::core::resource::{Dependency, Resource};
use crate::core::Manifest;

/// Edges added to one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub unit: ResourceId,
    pub added: usize,
}

/// Outcome of a resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub units: Vec<UnitReport>,
}

impl ResolveReport {
    /// Total edges added across all units.
    pub fn total_added(&self) -> usize {
        self.units.iter().map(|u| u.added).sum()
    }
}

/// Resolve every unit of `manifest`.
pub fn resolve(
    manifest: &mut Manifest,
    loader: &mut dyn DocumentLoader,
) -> Result<ResolveReport, ResolveError> {
    resolve_with(manifest, loader, |_| {})
}

/// Resolve every unit, calling `on_unit` once each unit's closure is known.
pub fn resolve_with<F>(
    manifest: &mut Manifest,
    loader: &mut dyn DocumentLoader,
    mut on_unit: F,
) -> Result<ResolveReport, ResolveError>
where
    F: FnMut(&ResourceId),
{
    let map = ResolutionMap::from_manifest(manifest);
    tracing::debug!("resolving {} units", map.len());

    let mut closures = Vec::with_capacity(map.len());
    for (unit_id, seeds) in map.iter() {
        let Some(unit) = manifest.resource(unit_id.as_str()) else {
            continue;
        };
        let closure = unit_closure(manifest, unit, seeds, loader)?;
        tracing::debug!("`{}`: {} dependencies found", unit_id, closure.len());
        on_unit(unit_id);
        closures.push((unit_id.clone(), closure));
    }

    let mut report = ResolveReport::default();
    for (unit_id, closure) in closures {
        let Some(unit) = manifest.resource_mut(unit_id.as_str()) else {
            continue;
        };
        let added = closure
            .into_iter()
            .filter(|id| unit.add_dependency(Dependency::resolved(id.clone())))
            .count();
        report.units.push(UnitReport {
            unit: unit_id,
            added,
        });
    }

    Ok(report)
}

/// Compute the closure of one unit from its declared dependencies.
fn unit_closure(
    manifest: &Manifest,
    unit: &Resource,
    seeds: &[ResourceId],
    loader: &mut dyn DocumentLoader,
) -> Result<DependencySet, ResolveError> {
    let mut closure = DependencySet::new();

    for declared in seeds {
        let resource = lookup(manifest, unit, declared)?;
        if resource.is_sco() {
            tracing::debug!("`{}`: `{}` is a unit, not expanded", unit.identifier, declared);
            continue;
        }

        let document = load(loader, unit, resource)?;
        add_media(manifest, &mut closure, &document);

        for nested in document.module_references_for(unit) {
            let nested = lookup(manifest, unit, nested)?;
            if !closure.insert(nested.identifier.clone()) {
                continue;
            }
            let nested_document = load(loader, unit, nested)?;
            add_media(manifest, &mut closure, &nested_document);
        }
    }

    Ok(closure)
}

fn lookup<'m>(
    manifest: &'m Manifest,
    unit: &Resource,
    reference: &ResourceId,
) -> Result<&'m Resource, ResolveError> {
    manifest
        .find_module(reference.as_str())
        .ok_or_else(|| ResolveError::UnresolvedReference {
            unit: unit.identifier.clone(),
            reference: reference.clone(),
        })
}

fn load(
    loader: &mut dyn DocumentLoader,
    unit: &Resource,
    resource: &Resource,
) -> Result<Rc<ContentDocument>, ResolveError> {
    loader
        .load(resource)
        .map_err(|err| ResolveError::from_load(&unit.identifier, &resource.identifier, err))
}

fn add_media(manifest: &Manifest, closure: &mut DependencySet, document: &ContentDocument) {
    for media in document.media_references() {
        if closure.insert(media.clone()) && manifest.resource(media.as_str()).is_none() {
            tracing::warn!(
                "`{}` references media `{}`, which has no resource",
                document.identifier(),
                media
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::Metadata;
    use crate::test_support::MemoryLoader;

    const M1: &str = "DMC-BIKE-AAA-D00-00-00-00AA-041A-A";
    const M2: &str = "DMC-BIKE-AAA-D00-00-00-00AA-520A-A";
    const M3: &str = "DMC-BIKE-AAA-D00-00-00-00AA-042A-A";
    const M4: &str = "DMC-BIKE-AAA-D00-00-00-00AA-043A-A";
    const MISSING: &str = "DMC-BIKE-AAA-D00-00-00-00AA-999A-A";

    /// Manifest with one SCO per `units` entry declaring its listed
    /// modules, plus an asset resource for every identifier in `assets`.
    fn manifest_with(units: &[(&str, &[&str])], assets: &[&str]) -> Manifest {
        let mut manifest = Manifest::new("MANIFEST-1", Metadata::default());
        for (unit, declared) in units {
            let mut sco = Resource::sco(*unit);
            for id in declared.iter() {
                sco.add_dependency(Dependency::declared(*id));
            }
            manifest.add_resource(sco).unwrap();
        }
        for id in assets {
            manifest
                .add_resource(Resource::asset(*id, format!("resources/s1000d/{}.XML", id)))
                .unwrap();
        }
        manifest
    }

    fn edges_of(manifest: &Manifest, unit: &str) -> Vec<String> {
        manifest
            .resource(unit)
            .unwrap()
            .dependencies()
            .iter()
            .map(|d| d.identifierref.to_string())
            .collect()
    }

    #[test]
    fn test_nested_module_media_in_discovery_order() {
        let mut manifest = manifest_with(&[("U1", &[M1])], &[M1, M2, "IMG-A", "IMG-B"]);

        let mut loader = MemoryLoader::new();
        loader.add(M1, &["IMG-A"], &[M2]);
        loader.add(M2, &["IMG-B"], &[]);

        let report = resolve(&mut manifest, &mut loader).unwrap();

        assert_eq!(edges_of(&manifest, "U1"), vec![M1, "IMG-A", M2, "IMG-B"]);
        assert_eq!(report.total_added(), 3);
    }

    #[test]
    fn test_shared_media_added_once() {
        let mut manifest = manifest_with(&[("U2", &[M3, M4])], &[M3, M4, "IMG-C"]);

        let mut loader = MemoryLoader::new();
        loader.add(M3, &["IMG-C"], &[]);
        loader.add(M4, &["IMG-C"], &[]);

        resolve(&mut manifest, &mut loader).unwrap();

        assert_eq!(edges_of(&manifest, "U2"), vec![M3, M4, "IMG-C"]);
    }

    #[test]
    fn test_nested_module_already_declared_is_skipped() {
        let mut manifest = manifest_with(&[("U1", &[M1, M2])], &[M1, M2, "IMG-A", "IMG-B"]);

        let mut loader = MemoryLoader::new();
        loader.add(M1, &["IMG-A"], &[M2]);
        loader.add(M2, &["IMG-B"], &[]);

        resolve(&mut manifest, &mut loader).unwrap();

        // M2's media still arrives through its own declared edge.
        assert_eq!(edges_of(&manifest, "U1"), vec![M1, M2, "IMG-A", "IMG-B"]);
    }

    #[test]
    fn test_expansion_stops_after_one_hop() {
        let mut manifest = manifest_with(&[("U1", &[M1])], &[M1, M2, M3, "IMG-C"]);

        let mut loader = MemoryLoader::new();
        loader.add(M1, &[], &[M2]);
        loader.add(M2, &[], &[M3]);
        loader.add(M3, &["IMG-C"], &[]);

        resolve(&mut manifest, &mut loader).unwrap();

        assert_eq!(edges_of(&manifest, "U1"), vec![M1, M2]);
    }

    #[test]
    fn test_closure_holds_media_of_every_one_hop_document() {
        // (module, media, nested modules)
        let documents: [(&str, &[&str], &[&str]); 4] = [
            (M1, &["IMG-A"], &[M2]),
            (M2, &["IMG-B"], &[M4]),
            (M3, &["IMG-C", "IMG-A"], &[M4]),
            (M4, &["IMG-D"], &[]),
        ];
        let mut manifest = manifest_with(
            &[("U1", &[M1, M3])],
            &[M1, M2, M3, M4, "IMG-A", "IMG-B", "IMG-C", "IMG-D"],
        );
        let mut loader = MemoryLoader::new();
        for (module, media, nested) in documents {
            loader.add(module, media, nested);
        }

        resolve(&mut manifest, &mut loader).unwrap();

        let declared = [M1, M3];
        let reachable: Vec<&str> = documents
            .iter()
            .filter(|(module, _, _)| declared.contains(module))
            .flat_map(|(module, _, nested)| std::iter::once(*module).chain(nested.iter().copied()))
            .collect();
        let unit = manifest.resource("U1").unwrap();
        for (module, media, _) in documents {
            if reachable.contains(&module) {
                assert!(unit.depends_on(module), "missing module {module}");
                for id in media {
                    assert!(unit.depends_on(id), "missing media {id} of {module}");
                }
            }
        }
        assert_eq!(
            edges_of(&manifest, "U1"),
            vec![M1, M3, "IMG-A", M2, "IMG-B", "IMG-C", M4, "IMG-D"]
        );
    }

    #[test]
    fn test_media_without_resource_is_kept_and_not_a_seed() {
        let mut manifest = manifest_with(&[("U1", &[M1])], &[M1, "IMG-A"]);

        let mut loader = MemoryLoader::new();
        loader.add(M1, &["IMG-A", "IMG-GONE"], &[]);

        let report = resolve(&mut manifest, &mut loader).unwrap();
        assert_eq!(report.total_added(), 2);
        assert!(manifest.resource("U1").unwrap().depends_on("IMG-GONE"));

        let report = resolve(&mut manifest, &mut loader).unwrap();
        assert_eq!(report.total_added(), 0);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut manifest = manifest_with(&[("U1", &[M1])], &[M1, M2, "IMG-A", "IMG-B"]);

        let mut loader = MemoryLoader::new();
        loader.add(M1, &["IMG-A"], &[M2]);
        loader.add(M2, &["IMG-B"], &[]);

        resolve(&mut manifest, &mut loader).unwrap();
        let first = manifest.clone();

        let report = resolve(&mut manifest, &mut loader).unwrap();
        assert_eq!(report.total_added(), 0);
        assert_eq!(manifest, first);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let build = || {
            let mut manifest = manifest_with(
                &[("U1", &[M1]), ("U2", &[M2, M1])],
                &[M1, M2, "IMG-A", "IMG-B"],
            );
            let mut loader = MemoryLoader::new();
            loader.add(M1, &["IMG-A", "IMG-B"], &[M2]);
            loader.add(M2, &["IMG-B"], &[M1]);
            resolve(&mut manifest, &mut loader).unwrap();
            manifest
                .edges()
                .map(|e| (e.from.to_string(), e.to.to_string()))
                .collect::<Vec<_>>()
        };

        assert_eq!(build(), build());
    }

    #[test]
    fn test_no_self_or_duplicate_edges() {
        let mut manifest = manifest_with(&[("U1", &[M1])], &[M1, "IMG-A"]);

        let mut loader = MemoryLoader::new();
        // The module refers back to itself and repeats its media.
        loader.add(M1, &["IMG-A", "IMG-A"], &[M1]);

        resolve(&mut manifest, &mut loader).unwrap();

        assert_eq!(edges_of(&manifest, "U1"), vec![M1, "IMG-A"]);
        assert!(manifest.edges().all(|e| e.from != e.to));
    }

    #[test]
    fn test_dangling_reference_is_fatal_and_leaves_manifest_untouched() {
        let mut manifest =
            manifest_with(&[("U1", &[M1]), ("U2", &[MISSING])], &[M1, "IMG-A"]);
        let before = manifest.clone();

        let mut loader = MemoryLoader::new();
        loader.add(M1, &["IMG-A"], &[]);

        let err = resolve(&mut manifest, &mut loader).unwrap_err();
        match err {
            ResolveError::UnresolvedReference { unit, reference } => {
                assert_eq!(unit.as_str(), "U2");
                assert_eq!(reference.as_str(), MISSING);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(manifest, before);
    }

    #[test]
    fn test_dangling_nested_reference_is_fatal() {
        let mut manifest = manifest_with(&[("U1", &[M1])], &[M1]);

        let mut loader = MemoryLoader::new();
        loader.add(M1, &[], &[MISSING]);

        let err = resolve(&mut manifest, &mut loader).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnresolvedReference { ref reference, .. } if reference.as_str() == MISSING
        ));
    }

    #[test]
    fn test_missing_document_is_unresolved_reference() {
        // The resource exists but nothing backs it.
        let mut manifest = manifest_with(&[("U1", &[M1])], &[M1]);
        let mut loader = MemoryLoader::new();

        let err = resolve(&mut manifest, &mut loader).unwrap_err();
        assert!(matches!(err, ResolveError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_broken_document_is_load_failure() {
        let mut manifest = manifest_with(&[("U1", &[M1])], &[M1]);
        let mut loader = MemoryLoader::new();
        loader.add_broken(M1);

        let err = resolve(&mut manifest, &mut loader).unwrap_err();
        assert!(matches!(err, ResolveError::DocumentLoadFailure { .. }));
    }

    #[test]
    fn test_unit_without_dependencies_is_valid() {
        let mut manifest = manifest_with(&[("U1", &[])], &[]);
        let mut loader = MemoryLoader::new();

        let report = resolve(&mut manifest, &mut loader).unwrap();
        assert_eq!(report.units.len(), 1);
        assert_eq!(report.total_added(), 0);
    }

    #[test]
    fn test_suffixed_identifiers_are_matched() {
        let issued = format!("{}_001-00_EN-US", M2);
        let mut manifest = manifest_with(&[("U1", &[M1])], &[M1, &issued, "IMG-B"]);

        let mut loader = MemoryLoader::new();
        loader.add(M1, &[], &[M2]);
        loader.add(&issued, &["IMG-B"], &[]);

        resolve(&mut manifest, &mut loader).unwrap();

        assert_eq!(
            edges_of(&manifest, "U1"),
            vec![M1.to_string(), issued, "IMG-B".to_string()]
        );
    }

    #[test]
    fn test_on_unit_called_in_manifest_order() {
        let mut manifest = manifest_with(&[("U1", &[]), ("U2", &[])], &[]);
        let mut loader = MemoryLoader::new();

        let mut seen = Vec::new();
        resolve_with(&mut manifest, &mut loader, |id| seen.push(id.to_string())).unwrap();
        assert_eq!(seen, vec!["U1", "U2"]);
    }
}
