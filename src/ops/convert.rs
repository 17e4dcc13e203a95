//! The full SCPM to `imsmanifest.xml` pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::{build_manifest, write_manifest};
use crate::core::Manifest;
use crate::ops::annotate::annotate;
use crate::ops::resolve::{resolve_package, ResolveEvent};
use crate::resolver::ResolveReport;
use crate::sources::scan_package;
use crate::util::config::Config;
use crate::util::fs::{read_to_string, write_string};

/// Options for converting a package.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// SCORM content package module describing the course
    pub scpm: PathBuf,

    /// Package directory holding the modules and media
    pub package: PathBuf,

    /// Manifest to write
    pub output: PathBuf,

    /// Also write the URN resource map here
    pub urn_map: Option<PathBuf>,
}

/// Result of a conversion.
#[derive(Debug)]
pub struct ConvertResult {
    pub manifest: Manifest,

    /// Asset resources added from the package
    pub assets: usize,

    pub report: ResolveReport,
}

/// Map the package, build the manifest from the SCPM, add the package's
/// files, resolve every unit and write the result.
///
/// Nothing is written if any stage fails. The URN map is only written once
/// the manifest is on disk.
pub fn convert<F>(opts: &ConvertOptions, config: &Config, on_event: F) -> Result<ConvertResult>
where
    F: FnMut(ResolveEvent<'_>),
{
    let urn_map = scan_package(&opts.package, config)?;
    tracing::info!(
        "mapped {} files in {}",
        urn_map.len(),
        opts.package.display()
    );

    let scpm = read_to_string(&opts.scpm)?;
    let mut manifest = build_manifest(&scpm, config)
        .with_context(|| format!("failed to build manifest from {}", opts.scpm.display()))?;

    let assets = annotate(&mut manifest, &urn_map, config)
        .context("failed to add package files to the manifest")?;

    let report = resolve_package(&mut manifest, &opts.package, config, on_event)?;

    let text = write_manifest(&manifest)
        .with_context(|| format!("failed to serialize manifest {}", manifest.identifier))?;
    let map_text = opts
        .urn_map
        .as_ref()
        .map(|_| urn_map.to_xml())
        .transpose()
        .context("failed to serialize URN resource map")?;

    write_string(&opts.output, &text)?;
    if let (Some(path), Some(map_text)) = (&opts.urn_map, map_text) {
        write_string(path, &map_text)?;
        tracing::debug!("wrote URN resource map to {}", path.display());
    }

    tracing::info!(
        "{}: {} resources, {} dependencies resolved",
        manifest.identifier,
        manifest.resources().len(),
        report.total_added()
    );

    Ok(ConvertResult {
        manifest,
        assets,
        report,
    })
}
