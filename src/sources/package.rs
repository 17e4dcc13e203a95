//! Identifier mapping for a resource package directory.
//!
//! Every file of the package gets one URN: S1000D documents are named by
//! the code in their identification section, everything else (ICN media,
//! unrecognised XML) by its file stem.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::identifier::document_code;
use crate::sources::urn_map::UrnMap;
use crate::util::config::Config;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::{is_hidden, is_xml_file, relative_path, to_slash};
use crate::util::xml;

/// Error while mapping a package.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum MapError {
    #[error("`{urn}` is claimed by both `{first}` and `{second}`")]
    #[diagnostic(
        code(scopack::map::mapping_conflict),
        help("remove one of the files or exclude it from the package")
    )]
    MappingConflict {
        urn: String,
        first: String,
        second: String,
    },

    #[error("failed to parse {}", .path.display())]
    #[diagnostic(code(scopack::map::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(scopack::map::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid exclude pattern `{pattern}`")]
    #[diagnostic(code(scopack::map::invalid_exclude))]
    InvalidExclude {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("no content files found in {}", .0.display())]
    #[diagnostic(code(scopack::map::empty_package))]
    EmptyPackage(PathBuf),
}

impl MapError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            MapError::MappingConflict { urn, first, second } => {
                Diagnostic::error(format!("two files map to `{}`", urn))
                    .with_context(format!("first: {}", first))
                    .with_context(format!("second: {}", second))
                    .with_suggestion("Remove the duplicate issue of the document")
                    .with_suggestion("Add one of the paths to `package.exclude` in .scopack/config.toml")
            }
            MapError::Parse { path, source } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.to_string()),
            MapError::EmptyPackage(_) => Diagnostic::error(self.to_string())
                .with_suggestion("Check the `--package` directory")
                .with_suggestion(suggestions::LIST_IDENTIFIERS),
            other => Diagnostic::error(other.to_string()),
        }
    }
}

/// Scan `dir` and map every content file to its URN.
///
/// Files are visited in file-name order; hidden files and paths matching
/// `package.exclude` are skipped.
pub fn scan_package(dir: &Path, config: &Config) -> Result<UrnMap, MapError> {
    if !dir.is_dir() {
        return Err(MapError::Io {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "package directory not found"),
        });
    }

    let excludes = config
        .exclude()
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern).map_err(|source| MapError::InvalidExclude {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let prefix = config.urn_prefix();
    let mut map = UrnMap::new(prefix);
    let mut seen: HashMap<String, String> = HashMap::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

    for entry in walker {
        let entry = entry.map_err(|err| MapError::Io {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf()),
            source: err.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let target = to_slash(&relative_path(dir, path));
        if excludes.iter().any(|p| p.matches(&target)) {
            tracing::debug!("excluded {}", target);
            continue;
        }

        let urn = format!("{}{}", prefix, file_token(path)?);
        if let Some(first) = seen.get(&urn) {
            return Err(MapError::MappingConflict {
                urn,
                first: first.clone(),
                second: target,
            });
        }

        tracing::debug!("{} -> {}", urn, target);
        seen.insert(urn.clone(), target.clone());
        map.push(urn, target);
    }

    if map.is_empty() {
        return Err(MapError::EmptyPackage(dir.to_path_buf()));
    }

    Ok(map)
}

/// Token naming one file: its S1000D code, or its stem.
fn file_token(path: &Path) -> Result<String, MapError> {
    let stem = || {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    if !is_xml_file(path) {
        return Ok(stem());
    }

    let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = xml::parse(&text).map_err(|source| MapError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(document_code(doc.root_element()).unwrap_or_else(stem))
}
