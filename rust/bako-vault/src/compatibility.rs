//! Signer origin compatibility between vault configurations and predicate
//! versions.

use crate::{config::VaultConfig, error::VaultError};
use bako_predicate::{Catalog, CatalogError, PredicateVersion, VersionId, WalletOrigin};

/// Checks vault configurations against the predicate versions in a catalog.
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityService<'a> {
    catalog: &'a Catalog,
}

impl<'a> CompatibilityService<'a> {
    /// A service backed by `catalog`.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Resolve `version`, naming the configuration's least supported origin
    /// when it is missing.
    pub fn resolve(
        &self,
        config: &VaultConfig,
        version: &VersionId,
    ) -> Result<&'a PredicateVersion, VaultError> {
        self.catalog.get(version).map_err(|error| match error {
            CatalogError::PredicateVersionNotFound { id, available } => {
                VaultError::PredicateVersionNotFound {
                    version: id,
                    origin: self.worst_origin(config),
                    available,
                }
            }
            other => other.into(),
        })
    }

    /// Check that `version` can verify every signer in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::PredicateVersionNotFound`] for an unknown
    /// version and [`VaultError::IncompatibleWalletOrigin`] for the first
    /// signer origin the version does not declare.
    pub fn is_compatible(
        &self,
        config: &VaultConfig,
        version: &VersionId,
    ) -> Result<bool, VaultError> {
        let predicate = self.resolve(config, version)?;

        if let Some(origin) = config
            .origins()
            .into_iter()
            .find(|origin| !predicate.supports(*origin))
        {
            tracing::debug!(
                %origin,
                version = %predicate.id(),
                supported = ?predicate.wallet_origins(),
                "incompatible signer origin"
            );
            return Err(VaultError::IncompatibleWalletOrigin {
                origin,
                version: *predicate.id(),
            });
        }

        Ok(true)
    }

    /// [`CompatibilityService::is_compatible`], with every failure reported
    /// as `false`.
    pub fn is_compatible_safe(&self, config: &VaultConfig, version: &VersionId) -> bool {
        self.is_compatible(config, version).unwrap_or(false)
    }

    fn worst_origin(&self, config: &VaultConfig) -> Option<WalletOrigin> {
        config
            .origins()
            .into_iter()
            .min_by_key(|origin| self.catalog.support_count(*origin))
    }
}
