//! `imsmanifest.xml` serialization.

use std::io;

use crate::core::manifest::{Item, ADLCP_NS, IMSCP_NS, RESOLVED_ORIGIN, SCOPACK_NS};
use crate::core::resource::{DependencyOrigin, Resource};
use crate::core::Manifest;
use crate::util::xml::XmlWriter;

const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Serialize a manifest.
///
/// Organizations and resources are written in insertion order, and each
/// resource lists its files before its dependencies. Resolved dependencies
/// carry `scopack:origin="resolved"` so a later pass seeds only from the
/// declared ones.
pub fn write_manifest(manifest: &Manifest) -> io::Result<String> {
    let mut w = XmlWriter::new()?;

    let mut root = vec![
        ("identifier", manifest.identifier.as_str()),
        ("version", "1.0"),
        ("xmlns", IMSCP_NS),
        ("xmlns:adlcp", ADLCP_NS),
        ("xmlns:xsi", XSI_NS),
    ];
    let has_resolved = manifest
        .resources()
        .iter()
        .flat_map(|r| r.dependencies())
        .any(|d| d.origin == DependencyOrigin::Resolved);
    if has_resolved {
        root.push(("xmlns:scopack", SCOPACK_NS));
    }
    w.start("manifest", &root)?;

    w.start("metadata", &[])?;
    w.text_element("schema", &manifest.metadata.schema)?;
    w.text_element("schemaversion", &manifest.metadata.schema_version)?;
    w.end("metadata")?;

    match &manifest.default_organization {
        Some(default) => w.start("organizations", &[("default", default.as_str())])?,
        None => w.start("organizations", &[])?,
    }
    for org in &manifest.organizations {
        w.start("organization", &[("identifier", org.identifier.as_str())])?;
        w.text_element("title", &org.title)?;
        for item in &org.items {
            write_item(&mut w, item)?;
        }
        w.end("organization")?;
    }
    w.end("organizations")?;

    w.start("resources", &[])?;
    for resource in manifest.resources() {
        write_resource(&mut w, resource)?;
    }
    w.end("resources")?;

    w.end("manifest")?;
    Ok(w.finish())
}

fn write_item(w: &mut XmlWriter, item: &Item) -> io::Result<()> {
    match &item.identifierref {
        Some(idref) => w.start(
            "item",
            &[
                ("identifier", item.identifier.as_str()),
                ("identifierref", idref.as_str()),
            ],
        )?,
        None => w.start("item", &[("identifier", item.identifier.as_str())])?,
    }
    w.text_element("title", &item.title)?;
    for child in &item.children {
        write_item(w, child)?;
    }
    w.end("item")
}

fn write_resource(w: &mut XmlWriter, resource: &Resource) -> io::Result<()> {
    let mut attrs = vec![
        ("identifier", resource.identifier.as_str()),
        ("type", "webcontent"),
        ("adlcp:scormType", resource.scorm_type.as_str()),
    ];
    if let Some(href) = &resource.href {
        attrs.push(("href", href.as_str()));
    }

    if resource.files.is_empty() && resource.dependencies().is_empty() {
        return w.empty("resource", &attrs);
    }

    w.start("resource", &attrs)?;
    for file in &resource.files {
        w.empty("file", &[("href", file.as_str())])?;
    }
    for dependency in resource.dependencies() {
        let mut edge = vec![("identifierref", dependency.identifierref.as_str())];
        if dependency.origin == DependencyOrigin::Resolved {
            edge.push(("scopack:origin", RESOLVED_ORIGIN));
        }
        w.empty("dependency", &edge)?;
    }
    w.end("resource")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::scpm::build_manifest;
    use crate::core::manifest::Metadata;
    use crate::core::resource::Dependency;
    use crate::test_support::{bike_package, scpm};
    use crate::util::config::Config;

    #[test]
    fn test_written_manifest_reads_back_equal() {
        let (_, fixture) = bike_package();
        let mut manifest = build_manifest(&scpm(&fixture), &Config::default()).unwrap();
        manifest
            .add_resource(Resource::asset("ICN-A", "resources/s1000d/ICN-A.CGM"))
            .unwrap();

        let text = write_manifest(&manifest).unwrap();
        let read = Manifest::from_xml(&text).unwrap();

        assert_eq!(read, manifest);
    }

    #[test]
    fn test_dependency_origin_survives_round_trip() {
        let mut manifest = Manifest::new("M", Metadata::default());
        let mut sco = Resource::sco("SCO-1");
        sco.add_dependency(Dependency::declared("DMC-A"));
        sco.add_dependency(Dependency::resolved("ICN-A"));
        manifest.add_resource(sco).unwrap();

        let text = write_manifest(&manifest).unwrap();
        assert!(text.contains(r#"xmlns:scopack="urn:scopack:manifest""#));
        assert!(text.contains(r#"<dependency identifierref="DMC-A"/>"#));
        assert!(text.contains(r#"<dependency identifierref="ICN-A" scopack:origin="resolved"/>"#));

        let read = Manifest::from_xml(&text).unwrap();
        assert_eq!(read, manifest);
    }

    #[test]
    fn test_layout() {
        let mut manifest = Manifest::new("MANIFEST-1", Metadata::default());
        let mut sco = Resource::sco("SCO-1");
        sco.add_dependency(Dependency::declared("DMC-A"));
        manifest.add_resource(sco).unwrap();
        manifest
            .add_resource(Resource::asset("DMC-A", "resources/s1000d/DMC-A.XML"))
            .unwrap();

        let text = write_manifest(&manifest).unwrap();

        assert!(text.contains(r#"xmlns="http://www.imsglobal.org/xsd/imscp_v1p1""#));
        assert!(text.contains("\n  <metadata>\n    <schema>ADL SCORM</schema>"));
        assert!(text.contains(
            r#"<resource identifier="SCO-1" type="webcontent" adlcp:scormType="sco">"#
        ));
        assert!(text.contains(r#"      <dependency identifierref="DMC-A"/>"#));
        assert!(text.contains(r#"      <file href="resources/s1000d/DMC-A.XML"/>"#));
    }
}
