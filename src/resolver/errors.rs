//! Resolution error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::document::LoadError;
use crate::core::identifier::ResourceId;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during dependency resolution.
///
/// Both variants abort the whole pass; the manifest is left untouched.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("`{unit}` depends on `{reference}`, which is not in the package")]
    #[diagnostic(
        code(scopack::resolve::unresolved_reference),
        help("check that every referenced data module is present in the resource package")
    )]
    UnresolvedReference {
        unit: ResourceId,
        reference: ResourceId,
    },

    #[error("failed to load `{identifier}` while resolving `{unit}`")]
    #[diagnostic(code(scopack::resolve::document_load_failure))]
    DocumentLoadFailure {
        unit: ResourceId,
        identifier: ResourceId,
        #[source]
        cause: LoadError,
    },
}

impl ResolveError {
    /// Build the error for a failed load, classifying missing files as
    /// unresolved references.
    pub(crate) fn from_load(unit: &ResourceId, reference: &ResourceId, err: LoadError) -> Self {
        match err {
            LoadError::NotFound(_) => ResolveError::UnresolvedReference {
                unit: unit.clone(),
                reference: reference.clone(),
            },
            cause => ResolveError::DocumentLoadFailure {
                unit: unit.clone(),
                identifier: reference.clone(),
                cause,
            },
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::UnresolvedReference { unit, reference } => Diagnostic::error(format!(
                "could not resolve `{}` referenced by `{}`",
                reference, unit
            ))
            .with_context(format!(
                "no file in the resource package maps to `{}`",
                reference
            ))
            .with_suggestion("Add the missing data module to the resource package")
            .with_suggestion(format!(
                "Remove the reference to `{}` from the SCORM content package module",
                reference
            ))
            .with_suggestion(suggestions::LIST_IDENTIFIERS),

            ResolveError::DocumentLoadFailure {
                unit,
                identifier,
                cause,
            } => Diagnostic::error(format!("could not load `{}`", identifier))
                .with_context(format!("required by `{}`", unit))
                .with_context(cause.to_string())
                .with_suggestion(format!("Check that `{}` is well-formed XML", identifier))
                .with_suggestion(suggestions::VERBOSE),
        }
    }
}
