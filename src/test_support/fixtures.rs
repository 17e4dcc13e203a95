//! Test fixtures for common test scenarios.
//!
//! Builders for S1000D data modules, SCORM content package modules and
//! whole resource packages written to a temporary directory.

use std::path::{Path, PathBuf};

/// Canonical token of a fixture data module.
pub fn dm_token(model_ident_code: &str, info_code: &str) -> String {
    format!(
        "DMC-{}-AAA-D00-00-00-00AA-{}A-A",
        model_ident_code, info_code
    )
}

/// `dmCode` element matching [`dm_token`].
pub fn dm_code(model_ident_code: &str, info_code: &str) -> String {
    format!(
        r#"<dmCode modelIdentCode="{model_ident_code}" systemDiffCode="AAA" systemCode="D00" subSystemCode="0" subSubSystemCode="0" assyCode="00" disassyCode="00" disassyCodeVariant="AA" infoCode="{info_code}" infoCodeVariant="A" itemLocationCode="A"/>"#
    )
}

fn dm_ref(model_ident_code: &str, info_code: &str) -> String {
    format!(
        "<dmRef><dmRefIdent>{}</dmRefIdent></dmRef>",
        dm_code(model_ident_code, info_code)
    )
}

/// Fixture for a single data module.
#[derive(Debug, Clone)]
pub struct DataModuleFixture {
    pub model_ident_code: String,
    pub info_code: String,
    /// Media identifiers referenced through `infoEntityIdent`.
    pub media: Vec<String>,
    /// Info codes of data modules referenced from the body.
    pub refs: Vec<String>,
}

impl DataModuleFixture {
    pub fn new(model_ident_code: &str, info_code: &str) -> Self {
        DataModuleFixture {
            model_ident_code: model_ident_code.to_string(),
            info_code: info_code.to_string(),
            media: Vec::new(),
            refs: Vec::new(),
        }
    }

    pub fn with_media(mut self, media: &[&str]) -> Self {
        self.media.extend(media.iter().map(|m| m.to_string()));
        self
    }

    /// Reference other modules of the same model by info code.
    pub fn with_refs(mut self, info_codes: &[&str]) -> Self {
        self.refs.extend(info_codes.iter().map(|c| c.to_string()));
        self
    }

    pub fn token(&self) -> String {
        dm_token(&self.model_ident_code, &self.info_code)
    }
}

/// Render a data module.
///
/// The `identAndStatusSection` also carries a `dmRef` (in `applicCrossRefTableRef`
/// style) so callers can check that only body references are followed.
pub fn data_module(fixture: &DataModuleFixture) -> String {
    let mut body = String::new();
    for media in &fixture.media {
        body.push_str(&format!(
            r#"<figure><title>Figure</title><graphic infoEntityIdent="{}"/></figure>"#,
            media
        ));
    }
    for info_code in &fixture.refs {
        body.push_str(&format!(
            "<para>See {}</para>",
            dm_ref(&fixture.model_ident_code, info_code)
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<dmodule>
  <identAndStatusSection>
    <dmAddress><dmIdent>{code}</dmIdent></dmAddress>
    <dmStatus><applicCrossRefTableRef>{header_ref}</applicCrossRefTableRef></dmStatus>
  </identAndStatusSection>
  <content>
    <description>{body}</description>
  </content>
</dmodule>
"#,
        code = dm_code(&fixture.model_ident_code, &fixture.info_code),
        header_ref = dm_ref(&fixture.model_ident_code, "00W"),
        body = body,
    )
}

/// Fixture for one `scoEntry`.
#[derive(Debug, Clone)]
pub struct ScoEntryFixture {
    pub title: String,
    pub modules: Vec<(String, String)>,
    pub children: Vec<ScoEntryFixture>,
}

impl ScoEntryFixture {
    pub fn new(title: &str) -> Self {
        ScoEntryFixture {
            title: title.to_string(),
            modules: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add content references by model and info code.
    pub fn with_refs(mut self, model_ident_code: &str, info_codes: &[&str]) -> Self {
        self.modules.extend(
            info_codes
                .iter()
                .map(|c| (model_ident_code.to_string(), c.to_string())),
        );
        self
    }

    pub fn with_child(mut self, child: ScoEntryFixture) -> Self {
        self.children.push(child);
        self
    }

    fn render(&self, out: &mut String) {
        out.push_str("<scoEntry>");
        out.push_str(&format!(
            "<scoEntryAddress><scoEntryTitle>{}</scoEntryTitle></scoEntryAddress>",
            self.title
        ));
        if !self.modules.is_empty() {
            out.push_str("<scoEntryContent>");
            for (mic, info_code) in &self.modules {
                out.push_str(&dm_ref(mic, info_code));
            }
            out.push_str("</scoEntryContent>");
        }
        for child in &self.children {
            child.render(out);
        }
        out.push_str("</scoEntry>");
    }
}

/// Fixture for a SCORM content package module.
#[derive(Debug, Clone)]
pub struct ScpmFixture {
    pub title: String,
    pub model_ident_code: Option<String>,
    pub entries: Vec<ScoEntryFixture>,
}

impl ScpmFixture {
    pub fn new(title: &str) -> Self {
        ScpmFixture {
            title: title.to_string(),
            model_ident_code: Some("BIKE".to_string()),
            entries: Vec::new(),
        }
    }

    pub fn without_code(mut self) -> Self {
        self.model_ident_code = None;
        self
    }

    pub fn with_entry(mut self, entry: ScoEntryFixture) -> Self {
        self.entries.push(entry);
        self
    }
}

/// Render an SCPM document.
pub fn scpm(fixture: &ScpmFixture) -> String {
    let ident = match &fixture.model_ident_code {
        Some(mic) => format!(
            r#"<identAndStatusSection><scormContentPackageAddress><scormContentPackageIdent><scormContentPackageCode modelIdentCode="{}" scormContentPackageIssuer="C3002" scormContentPackageNumber="00001" scormContentPackageVolume="00"/></scormContentPackageIdent></scormContentPackageAddress></identAndStatusSection>"#,
            mic
        ),
        None => String::new(),
    };

    let mut entries = String::new();
    for entry in &fixture.entries {
        entry.render(&mut entries);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<scormContentPackage>{ident}<content><scormContentPackageTitle>{title}</scormContentPackageTitle>{entries}</content></scormContentPackage>
"#,
        ident = ident,
        title = fixture.title,
        entries = entries,
    )
}

/// Fixture for a resource package directory.
#[derive(Debug, Clone, Default)]
pub struct PackageFixture {
    /// Files (path relative to package root -> content).
    pub files: Vec<(PathBuf, Vec<u8>)>,
}

impl PackageFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a data module, named after its token.
    pub fn with_module(mut self, module: &DataModuleFixture) -> Self {
        self.files.push((
            PathBuf::from(format!("{}_001-00_EN-US.XML", module.token())),
            data_module(module).into_bytes(),
        ));
        self
    }

    /// Add an opaque media file.
    pub fn with_media(mut self, file_name: &str) -> Self {
        self.files
            .push((PathBuf::from(file_name), b"media".to_vec()));
        self
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> Self {
        self.files
            .push((path.as_ref().to_path_buf(), content.into()));
        self
    }

    /// Write the package under `base_path`.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(base_path)?;
        for (rel_path, content) in &self.files {
            let full_path = base_path.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }
        Ok(())
    }
}

/// The bike package used across tests.
///
/// `041` shows `ICN-A` and refers to `520`, which shows `ICN-B`. `042` and
/// `043` share `ICN-C`. The SCPM declares `Brakes -> 041` and
/// `Wheels -> 042, 043`.
pub fn bike_package() -> (PackageFixture, ScpmFixture) {
    let package = PackageFixture::new()
        .with_module(
            &DataModuleFixture::new("BIKE", "041")
                .with_media(&["ICN-A"])
                .with_refs(&["520"]),
        )
        .with_module(&DataModuleFixture::new("BIKE", "520").with_media(&["ICN-B"]))
        .with_module(&DataModuleFixture::new("BIKE", "042").with_media(&["ICN-C"]))
        .with_module(&DataModuleFixture::new("BIKE", "043").with_media(&["ICN-C"]))
        .with_module(&DataModuleFixture::new("BIKE", "00W"))
        .with_media("ICN-A.CGM")
        .with_media("ICN-B.CGM")
        .with_media("ICN-C.CGM");

    let scpm = ScpmFixture::new("Bike maintenance")
        .with_entry(ScoEntryFixture::new("Brakes").with_refs("BIKE", &["041"]))
        .with_entry(ScoEntryFixture::new("Wheels").with_refs("BIKE", &["042", "043"]));

    (package, scpm)
}
