//! Canonical resource identifiers and S1000D code tokens.
//!
//! Every file in a publication package is addressed by a canonical token:
//! data modules by their data module code (`DMC-...`), publication modules
//! by their publication module code (`PMC-...`), SCORM content packages by
//! their SCPM code (`SMC-...`) and media files by their ICN file stem.

use std::borrow::Borrow;
use std::fmt;

use roxmltree::Node;
use serde::{Deserialize, Serialize};

/// Default prefix carried by URNs in the resource map.
pub const DEFAULT_URN_PREFIX: &str = "URN:S1000D:";

/// A canonical resource identifier (no URN namespace qualifier).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Create an identifier from a canonical token.
    pub fn new(id: impl Into<String>) -> Self {
        ResourceId(id.into())
    }

    /// Create an identifier from a URN, stripping the mapping-scheme prefix.
    pub fn from_urn(urn: &str, prefix: &str) -> Self {
        ResourceId::new(urn.strip_prefix(prefix).unwrap_or(urn))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this identifier names the module behind `token`.
    ///
    /// Manifest identifiers may carry an issue/language suffix after the
    /// code (`DMC-..._001-00_EN-US`), so a bare code matches those too.
    pub fn refers_to(&self, token: &str) -> bool {
        match self.0.strip_prefix(token) {
            Some(rest) => rest.is_empty() || rest.starts_with('_'),
            None => false,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ResourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::new(s)
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        ResourceId(s)
    }
}

/// Data module code attributes of a `dmCode` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DmCode {
    pub model_ident_code: String,
    pub system_diff_code: String,
    pub system_code: String,
    pub sub_system_code: String,
    pub sub_sub_system_code: String,
    pub assy_code: String,
    pub disassy_code: String,
    pub disassy_code_variant: String,
    pub info_code: String,
    pub info_code_variant: String,
    pub item_location_code: String,
    pub learn_code: Option<String>,
    pub learn_event_code: Option<String>,
}

impl DmCode {
    /// Read the code from a `dmCode` element.
    ///
    /// Returns `None` when the element carries no `modelIdentCode`.
    pub fn from_element(node: Node<'_, '_>) -> Option<Self> {
        let attr = |name: &str| node.attribute(name).unwrap_or_default().to_string();

        Some(DmCode {
            model_ident_code: node.attribute("modelIdentCode")?.to_string(),
            system_diff_code: attr("systemDiffCode"),
            system_code: attr("systemCode"),
            sub_system_code: attr("subSystemCode"),
            sub_sub_system_code: attr("subSubSystemCode"),
            assy_code: attr("assyCode"),
            disassy_code: attr("disassyCode"),
            disassy_code_variant: attr("disassyCodeVariant"),
            info_code: attr("infoCode"),
            info_code_variant: attr("infoCodeVariant"),
            item_location_code: attr("itemLocationCode"),
            learn_code: node.attribute("learnCode").map(str::to_string),
            learn_event_code: node.attribute("learnEventCode").map(str::to_string),
        })
    }

    /// Render the canonical `DMC-...` token.
    pub fn to_token(&self) -> String {
        let mut token = format!(
            "DMC-{}-{}-{}-{}{}-{}-{}{}-{}{}-{}",
            self.model_ident_code,
            self.system_diff_code,
            self.system_code,
            self.sub_system_code,
            self.sub_sub_system_code,
            self.assy_code,
            self.disassy_code,
            self.disassy_code_variant,
            self.info_code,
            self.info_code_variant,
            self.item_location_code,
        );

        if let Some(learn_code) = &self.learn_code {
            token.push('-');
            token.push_str(learn_code);
            token.push_str(self.learn_event_code.as_deref().unwrap_or_default());
        }

        token
    }
}

/// Publication module code (`pmCode`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmCode {
    pub model_ident_code: String,
    pub pm_issuer: String,
    pub pm_number: String,
    pub pm_volume: String,
}

impl PmCode {
    pub fn from_element(node: Node<'_, '_>) -> Option<Self> {
        Some(PmCode {
            model_ident_code: node.attribute("modelIdentCode")?.to_string(),
            pm_issuer: node.attribute("pmIssuer").unwrap_or_default().to_string(),
            pm_number: node.attribute("pmNumber").unwrap_or_default().to_string(),
            pm_volume: node.attribute("pmVolume").unwrap_or_default().to_string(),
        })
    }

    pub fn to_token(&self) -> String {
        format!(
            "PMC-{}-{}-{}-{}",
            self.model_ident_code, self.pm_issuer, self.pm_number, self.pm_volume
        )
    }
}

/// SCORM content package code (`scormContentPackageCode`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScpmCode {
    pub model_ident_code: String,
    pub issuer: String,
    pub number: String,
    pub volume: String,
}

impl ScpmCode {
    pub fn from_element(node: Node<'_, '_>) -> Option<Self> {
        Some(ScpmCode {
            model_ident_code: node.attribute("modelIdentCode")?.to_string(),
            issuer: node
                .attribute("scormContentPackageIssuer")
                .unwrap_or_default()
                .to_string(),
            number: node
                .attribute("scormContentPackageNumber")
                .unwrap_or_default()
                .to_string(),
            volume: node
                .attribute("scormContentPackageVolume")
                .unwrap_or_default()
                .to_string(),
        })
    }

    pub fn to_token(&self) -> String {
        format!(
            "SMC-{}-{}-{}-{}",
            self.model_ident_code, self.issuer, self.number, self.volume
        )
    }
}

/// Find the identifying code token of an S1000D document.
///
/// Looks at the root element: `dmodule` yields its `dmCode`, `pm` its
/// `pmCode` and `scormContentPackage` its package code, all taken from the
/// `identAndStatusSection`. Other documents have no code.
pub fn document_code(root: Node<'_, '_>) -> Option<String> {
    let ident = root
        .children()
        .find(|n| n.has_tag_name("identAndStatusSection"))?;
    let find = |name: &str| ident.descendants().find(|n| n.has_tag_name(name));

    match root.tag_name().name() {
        "dmodule" => DmCode::from_element(find("dmCode")?).map(|c| c.to_token()),
        "pm" => PmCode::from_element(find("pmCode")?).map(|c| c.to_token()),
        "scormContentPackage" => {
            ScpmCode::from_element(find("scormContentPackageCode")?).map(|c| c.to_token())
        }
        _ => None,
    }
}
