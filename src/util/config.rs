//! Configuration file support for scopack.
//!
//! scopack supports two configuration file locations:
//! - Global: `~/.scopack/config.toml` - User-wide defaults
//! - Project: `.scopack/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::document::DEFAULT_MEDIA_ATTRIBUTE;
use crate::core::identifier::DEFAULT_URN_PREFIX;
use crate::core::manifest::Metadata;

/// Default location of content files inside the SCORM package.
pub const DEFAULT_HREF_PREFIX: &str = "resources/s1000d/";

/// scopack configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resource package settings
    pub package: PackageConfig,

    /// Dependency resolution settings
    pub resolve: ResolveConfig,

    /// Manifest output settings
    pub manifest: ManifestConfig,
}

/// Resource package configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Prefix stripped from URNs to form resource identifiers
    pub urn_prefix: Option<String>,

    /// Prefix prepended to package paths in resource hrefs
    pub href_prefix: Option<String>,

    /// Glob patterns (relative to the package root) to skip while scanning
    pub exclude: Vec<String>,
}

/// Resolution configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Attribute naming a referenced media file
    pub media_attribute: Option<String>,

    /// Parse each document at most once per pass
    pub cache_documents: Option<bool>,
}

/// Manifest metadata configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub schema: Option<String>,
    pub schema_version: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Package settings
        if other.package.urn_prefix.is_some() {
            self.package.urn_prefix = other.package.urn_prefix;
        }
        if other.package.href_prefix.is_some() {
            self.package.href_prefix = other.package.href_prefix;
        }
        if !other.package.exclude.is_empty() {
            self.package.exclude = other.package.exclude;
        }

        // Resolve settings
        if other.resolve.media_attribute.is_some() {
            self.resolve.media_attribute = other.resolve.media_attribute;
        }
        if other.resolve.cache_documents.is_some() {
            self.resolve.cache_documents = other.resolve.cache_documents;
        }

        // Manifest settings
        if other.manifest.schema.is_some() {
            self.manifest.schema = other.manifest.schema;
        }
        if other.manifest.schema_version.is_some() {
            self.manifest.schema_version = other.manifest.schema_version;
        }
    }

    pub fn urn_prefix(&self) -> &str {
        self.package
            .urn_prefix
            .as_deref()
            .unwrap_or(DEFAULT_URN_PREFIX)
    }

    pub fn href_prefix(&self) -> &str {
        self.package
            .href_prefix
            .as_deref()
            .unwrap_or(DEFAULT_HREF_PREFIX)
    }

    /// Exclude globs, relative to the package root.
    pub fn exclude(&self) -> &[String] {
        &self.package.exclude
    }

    pub fn media_attribute(&self) -> &str {
        self.resolve
            .media_attribute
            .as_deref()
            .unwrap_or(DEFAULT_MEDIA_ATTRIBUTE)
    }

    pub fn cache_documents(&self) -> bool {
        self.resolve.cache_documents.unwrap_or(true)
    }

    /// Manifest metadata, falling back to SCORM 2004 4th Edition.
    pub fn metadata(&self) -> Metadata {
        let defaults = Metadata::default();
        Metadata {
            schema: self.manifest.schema.clone().unwrap_or(defaults.schema),
            schema_version: self
                .manifest
                .schema_version
                .clone()
                .unwrap_or(defaults.schema_version),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.scopack/config.toml)
/// 2. Global config (~/.scopack/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global scopack config directory (~/.scopack).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".scopack"))
}

/// Get the project config path (.scopack/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".scopack").join("config.toml")
}
