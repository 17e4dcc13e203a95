//! Dependency resolution against a package directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::write_manifest;
use crate::core::document::{CachingLoader, FsDocumentLoader};
use crate::core::identifier::ResourceId;
use crate::core::Manifest;
use crate::resolver::{self, ResolveError, ResolveReport};
use crate::util::config::Config;
use crate::util::fs::write_string;

/// Options for re-resolving an existing manifest.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Manifest to read
    pub manifest: PathBuf,

    /// Package directory the manifest's hrefs point into
    pub package: PathBuf,

    /// Where to write the result; defaults to the input manifest
    pub output: Option<PathBuf>,
}

/// Progress of a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveEvent<'a> {
    /// A pass over this many units is starting
    Started { units: usize },

    /// The closure of a unit is known
    Unit(&'a ResourceId),
}

/// Result of resolving a manifest file.
#[derive(Debug)]
pub struct ResolveResult {
    pub report: ResolveReport,
    pub output: PathBuf,
}

/// Resolve `manifest` in place, loading documents from `package`.
pub fn resolve_package<F>(
    manifest: &mut Manifest,
    package: &Path,
    config: &Config,
    mut on_event: F,
) -> Result<ResolveReport, ResolveError>
where
    F: FnMut(ResolveEvent<'_>),
{
    on_event(ResolveEvent::Started {
        units: manifest.scos().count(),
    });
    let on_unit = |unit: &ResourceId| on_event(ResolveEvent::Unit(unit));

    let loader = FsDocumentLoader::new(package, config.href_prefix(), config.media_attribute());

    if config.cache_documents() {
        let mut loader = CachingLoader::new(loader);
        let report = resolver::resolve_with(manifest, &mut loader, on_unit)?;
        tracing::debug!("{} document loads served from cache", loader.hits());
        Ok(report)
    } else {
        let mut loader = loader;
        resolver::resolve_with(manifest, &mut loader, on_unit)
    }
}

/// Load a manifest, resolve it and write it back.
pub fn resolve_manifest<F>(
    opts: &ResolveOptions,
    config: &Config,
    on_event: F,
) -> Result<ResolveResult>
where
    F: FnMut(ResolveEvent<'_>),
{
    let mut manifest = Manifest::load(&opts.manifest)?;
    tracing::info!(
        "resolving {} units of {}",
        manifest.scos().count(),
        opts.manifest.display()
    );

    let report = resolve_package(&mut manifest, &opts.package, config, on_event)?;

    let output = opts.output.clone().unwrap_or_else(|| opts.manifest.clone());
    let text = write_manifest(&manifest)
        .with_context(|| format!("failed to serialize manifest {}", manifest.identifier))?;
    write_string(&output, &text)?;

    tracing::info!("added {} dependencies", report.total_added());
    Ok(ResolveResult { report, output })
}
