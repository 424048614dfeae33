//! Predicate versions and their identifiers.

use crate::{
    abi::PredicateAbi,
    bytes::{Bytes32, serde_hex},
    error::CatalogError,
    origin::WalletOrigin,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{collections::BTreeSet, fmt, str::FromStr};

/// Content address of a predicate version: `SHA256(bytecode)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(Bytes32);

impl VersionId {
    /// Wrap a precomputed hash.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(Bytes32::new(bytes))
    }

    /// Compute the id of a bytecode blob.
    pub fn of_bytecode(bytecode: &[u8]) -> Self {
        Self(Bytes32::new(Sha256::digest(bytecode).into()))
    }

    /// Borrow the raw hash.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionId({})", self.0)
    }
}

impl FromStr for VersionId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Bytes32>()
            .map(Self)
            .map_err(|_| CatalogError::InvalidVersionId(s.to_string()))
    }
}

/// Chain id of a network a predicate may be deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub u64);

impl NetworkId {
    /// Public mainnet.
    pub const MAINNET: NetworkId = NetworkId(9889);
    /// Public testnet.
    pub const TESTNET: NetworkId = NetworkId(0);
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Toolchain that produced a predicate's bytecode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolchainMetadata {
    /// Compiler version.
    pub forc_version: String,
    /// Node version the bytecode was tested against.
    pub fuel_core_version: String,
}

/// One immutable predicate revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredicateVersion {
    id: VersionId,
    #[serde(with = "serde_hex")]
    bytecode: Vec<u8>,
    abi: PredicateAbi,
    wallet_origins: BTreeSet<WalletOrigin>,
    deployed_networks: BTreeSet<NetworkId>,
    toolchain: ToolchainMetadata,
    timestamp: u64,
    legacy: bool,
}

impl PredicateVersion {
    /// A new version whose id is the hash of `bytecode`.
    ///
    /// The version supports no origins and is deployed nowhere until the
    /// builder methods say otherwise.
    pub fn new(bytecode: impl Into<Vec<u8>>, abi: PredicateAbi) -> Self {
        let bytecode = bytecode.into();
        Self {
            id: VersionId::of_bytecode(&bytecode),
            bytecode,
            abi,
            wallet_origins: BTreeSet::new(),
            deployed_networks: BTreeSet::new(),
            toolchain: ToolchainMetadata::default(),
            timestamp: 0,
            legacy: false,
        }
    }

    /// Declare the origins this version can verify.
    pub fn with_origins(mut self, origins: impl IntoIterator<Item = WalletOrigin>) -> Self {
        self.wallet_origins.extend(origins);
        self
    }

    /// Declare the networks this version is deployed on.
    pub fn deployed_on(mut self, networks: impl IntoIterator<Item = NetworkId>) -> Self {
        self.deployed_networks.extend(networks);
        self
    }

    /// Set the release timestamp (unix milliseconds).
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Mark as a legacy third-party verifier that expects raw signatures.
    pub fn legacy(mut self) -> Self {
        self.legacy = true;
        self
    }

    /// Record the toolchain metadata.
    pub fn with_toolchain(mut self, toolchain: ToolchainMetadata) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// The id derived from the bytecode.
    pub fn id(&self) -> &VersionId {
        &self.id
    }

    /// The predicate bytecode.
    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    /// The configurables the predicate declares.
    pub fn abi(&self) -> &PredicateAbi {
        &self.abi
    }

    /// Signer origins this version can verify.
    pub fn wallet_origins(&self) -> &BTreeSet<WalletOrigin> {
        &self.wallet_origins
    }

    /// Networks this version is deployed on.
    pub fn deployed_networks(&self) -> &BTreeSet<NetworkId> {
        &self.deployed_networks
    }

    /// Toolchain the bytecode was built with.
    pub fn toolchain(&self) -> &ToolchainMetadata {
        &self.toolchain
    }

    /// Release time in unix milliseconds.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Whether this is a legacy verifier (signatures go on the wire raw).
    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// Whether signers of `origin` can be verified by this version.
    pub fn supports(&self, origin: WalletOrigin) -> bool {
        self.wallet_origins.contains(&origin)
    }

    /// Whether this version is deployed on `network`.
    pub fn is_deployed_on(&self, network: NetworkId) -> bool {
        self.deployed_networks.contains(&network)
    }
}

/// A manifest entry as written on disk, before its id is checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ManifestEntry {
    id: VersionId,
    #[serde(with = "serde_hex")]
    bytecode: Vec<u8>,
    #[serde(default)]
    abi: PredicateAbi,
    wallet_origins: BTreeSet<WalletOrigin>,
    #[serde(default)]
    deployed_networks: BTreeSet<NetworkId>,
    #[serde(default)]
    toolchain: ToolchainMetadata,
    timestamp: u64,
    #[serde(default)]
    legacy: bool,
}

impl TryFrom<ManifestEntry> for PredicateVersion {
    type Error = CatalogError;

    fn try_from(entry: ManifestEntry) -> Result<Self, Self::Error> {
        let computed = VersionId::of_bytecode(&entry.bytecode);
        if computed != entry.id {
            return Err(CatalogError::ContentHashMismatch {
                declared: entry.id,
                computed,
            });
        }

        Ok(PredicateVersion {
            id: entry.id,
            bytecode: entry.bytecode,
            abi: entry.abi,
            wallet_origins: entry.wallet_origins,
            deployed_networks: entry.deployed_networks,
            toolchain: entry.toolchain,
            timestamp: entry.timestamp,
            legacy: entry.legacy,
        })
    }
}
