//! Error types for catalog and address operations.

use crate::version::VersionId;
use thiserror::Error;

/// Errors from parsing addresses and fixed-width byte values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The input is not valid hexadecimal.
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),

    /// The input is neither hex nor base58.
    #[error("invalid base58 encoding")]
    InvalidBase58,

    /// The decoded bytes have a length no address shape accepts.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Human readable description of the accepted lengths.
        expected: &'static str,
        /// Length of the decoded input.
        actual: usize,
    },
}

/// Errors from loading or querying a [`crate::Catalog`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No catalog entry has the requested id.
    #[error(
        "predicate version {id} not found; available versions: {}",
        display_ids(.available)
    )]
    PredicateVersionNotFound {
        /// The id that was requested.
        id: VersionId,
        /// Every id the catalog does know about.
        available: Vec<VersionId>,
    },

    /// A version id string could not be parsed.
    #[error("invalid predicate version id {0:?}")]
    InvalidVersionId(String),

    /// Two manifest entries share the same id.
    #[error("duplicate predicate version {0}")]
    DuplicateVersion(VersionId),

    /// A manifest entry's id is not the hash of its bytecode.
    #[error("predicate version {declared} does not match its bytecode hash {computed}")]
    ContentHashMismatch {
        /// The id written in the manifest.
        declared: VersionId,
        /// SHA-256 of the entry's bytecode.
        computed: VersionId,
    },

    /// The manifest document is not valid.
    #[error("invalid predicate manifest: {0}")]
    InvalidManifest(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        CatalogError::InvalidManifest(value.to_string())
    }
}

/// Comma separated list of version ids for diagnostics.
pub fn display_ids(ids: &[VersionId]) -> String {
    if ids.is_empty() {
        return "(none)".into();
    }
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
