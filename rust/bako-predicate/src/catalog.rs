//! Immutable lookup of predicate versions.

use crate::{
    error::CatalogError,
    origin::WalletOrigin,
    version::{ManifestEntry, NetworkId, PredicateVersion, VersionId},
};
use serde::Deserialize;
use std::collections::HashMap;

/// The version used when a caller names none, and the fallback for networks
/// no catalog entry is deployed on.
pub const DEFAULT_PREDICATE_VERSION: VersionId = VersionId::from_bytes([
    0x9a, 0x4f, 0x23, 0x46, 0x4c, 0x54, 0x2a, 0xa2, //
    0xbd, 0xfb, 0x80, 0xc2, 0xed, 0xdb, 0xd7, 0x0d, //
    0x3c, 0xb9, 0x05, 0xb4, 0x70, 0x3c, 0x3c, 0x45, //
    0xcc, 0xaf, 0xdb, 0xba, 0x84, 0x4f, 0x37, 0x53, //
]);

/// Manifest bundled with the crate.
const BUILTIN_MANIFEST: &str = include_str!("manifest.json");

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    versions: Vec<ManifestEntry>,
}

/// A read-only set of [`PredicateVersion`]s.
///
/// A catalog is built once and then only read; share it by reference (or in
/// an `Arc`) between the components that need it. Iteration order is the
/// order versions were supplied in.
#[derive(Debug, Clone)]
pub struct Catalog {
    versions: Vec<PredicateVersion>,
    index: HashMap<VersionId, usize>,
    default: VersionId,
}

impl Catalog {
    /// Build a catalog from versions, rejecting duplicate ids.
    ///
    /// The fallback version is [`DEFAULT_PREDICATE_VERSION`]; see
    /// [`Catalog::with_default`] to change it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateVersion`] if two versions share an id.
    pub fn new(versions: Vec<PredicateVersion>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(versions.len());
        for (position, version) in versions.iter().enumerate() {
            if index.insert(*version.id(), position).is_some() {
                return Err(CatalogError::DuplicateVersion(*version.id()));
            }
        }

        tracing::debug!(versions = versions.len(), "loaded predicate version catalog");

        Ok(Self {
            versions,
            index,
            default: DEFAULT_PREDICATE_VERSION,
        })
    }

    /// Load a catalog from a JSON manifest, verifying every entry's content
    /// address.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, on an entry whose `id` is not
    /// `SHA256(bytecode)`, and on duplicate ids.
    pub fn from_manifest_json(manifest: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest = serde_json::from_str(manifest)?;
        let versions = manifest
            .versions
            .into_iter()
            .map(PredicateVersion::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(versions)
    }

    /// The catalog bundled with this crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled manifest is corrupt.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_manifest_json(BUILTIN_MANIFEST)
    }

    /// Replace the fallback version id.
    pub fn with_default(mut self, id: VersionId) -> Self {
        self.default = id;
        self
    }

    /// Look up a version by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::PredicateVersionNotFound`] listing every known
    /// id when `id` is absent.
    pub fn get(&self, id: &VersionId) -> Result<&PredicateVersion, CatalogError> {
        self.index
            .get(id)
            .map(|position| &self.versions[*position])
            .ok_or_else(|| CatalogError::PredicateVersionNotFound {
                id: *id,
                available: self.ids(),
            })
    }

    /// Whether `id` is in the catalog.
    pub fn contains(&self, id: &VersionId) -> bool {
        self.index.contains_key(id)
    }

    /// The fallback version.
    ///
    /// # Errors
    ///
    /// Fails if the fallback id is not in this catalog.
    pub fn default_version(&self) -> Result<&PredicateVersion, CatalogError> {
        self.get(&self.default)
    }

    /// The fallback version id.
    pub fn default_id(&self) -> &VersionId {
        &self.default
    }

    /// The most recently released version deployed on `network`.
    ///
    /// When several versions share the maximum timestamp the first one in
    /// iteration order wins; timestamps are expected to be unique so this is
    /// not significant. With no version deployed on `network`, falls back to
    /// the default version.
    ///
    /// # Errors
    ///
    /// Fails only when falling back and the default id is not in the catalog.
    pub fn latest_deployed_on(&self, network: NetworkId) -> Result<&PredicateVersion, CatalogError> {
        let latest = self
            .versions
            .iter()
            .filter(|version| version.is_deployed_on(network))
            .fold(None::<&PredicateVersion>, |best, version| match best {
                Some(best) if best.timestamp() >= version.timestamp() => Some(best),
                _ => Some(version),
            });

        match latest {
            Some(version) => Ok(version),
            None => {
                tracing::warn!(
                    %network,
                    fallback = %self.default,
                    "no predicate version deployed on network, using default"
                );
                self.default_version()
            }
        }
    }

    /// Every version, in iteration order.
    pub fn list_all(&self) -> &[PredicateVersion] {
        &self.versions
    }

    /// Every version id, in iteration order.
    pub fn ids(&self) -> Vec<VersionId> {
        self.versions.iter().map(|version| *version.id()).collect()
    }

    /// Number of versions that can verify `origin`.
    pub fn support_count(&self, origin: WalletOrigin) -> usize {
        self.versions
            .iter()
            .filter(|version| version.supports(origin))
            .count()
    }

    /// Iterate over the versions.
    pub fn iter(&self) -> std::slice::Iter<'_, PredicateVersion> {
        self.versions.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PredicateVersion;
    type IntoIter = std::slice::Iter<'a, PredicateVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
