//! Error types for vault configuration.

use bako_predicate::{CatalogError, VersionId, WalletOrigin, display_ids};
use thiserror::Error;

/// Errors from parsing, validating or checking a vault configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// The raw configuration is neither a Bako nor a Connector shape.
    #[error("invalid vault configuration: {0}")]
    InvalidConfigShape(String),

    /// A configurable holds a value the predicate cannot accept.
    #[error("invalid value for {key}: {reason}")]
    InvalidConfigValue {
        /// Configurable name, e.g. `SIGNERS`.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A signer's origin is not among the version's declared origins.
    #[error("predicate version {version} does not support {origin} signers")]
    IncompatibleWalletOrigin {
        /// The unsupported origin.
        origin: WalletOrigin,
        /// The version that was checked.
        version: VersionId,
    },

    /// The requested predicate version is not in the catalog.
    #[error(
        "predicate version {version} not found{}; available versions: {}",
        .origin.map(|o| format!(" (needed for {o} signers)")).unwrap_or_default(),
        display_ids(.available)
    )]
    PredicateVersionNotFound {
        /// The id that was requested.
        version: VersionId,
        /// The configured origin the fewest known versions support.
        origin: Option<WalletOrigin>,
        /// Every id the catalog knows about.
        available: Vec<VersionId>,
    },

    /// Any other catalog failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl VaultError {
    pub(crate) fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        VaultError::InvalidConfigValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
