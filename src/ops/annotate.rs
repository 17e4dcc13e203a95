//! Adding package files to a manifest as asset resources.

use crate::core::manifest::ManifestError;
use crate::core::resource::Resource;
use crate::core::Manifest;
use crate::sources::UrnMap;
use crate::util::config::Config;

/// Insert one asset resource per URN map entry, in map order.
///
/// Returns the number of resources added. An identifier already present
/// in the manifest is a `DuplicateResource` error.
pub fn annotate(
    manifest: &mut Manifest,
    urn_map: &UrnMap,
    config: &Config,
) -> Result<usize, ManifestError> {
    let href_prefix = config.href_prefix();
    let mut added = 0;

    for (identifier, target) in urn_map.identifiers() {
        let href = format!("{}{}", href_prefix, target);
        tracing::debug!("asset `{}` at {}", identifier, href);
        manifest.add_resource(Resource::asset(identifier, href))?;
        added += 1;
    }

    Ok(added)
}
