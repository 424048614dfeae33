//! Vault configurations and their parsing.

use crate::error::VaultError;
use bako_predicate::{Address, Bytes32, ConfigurableValue, WalletOrigin, decode_hex};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Number of signer slots in a Bako predicate.
pub const SIGNER_SLOTS: usize = 10;

/// Configurable holding the signature threshold.
pub const SIGNATURES_COUNT: &str = "SIGNATURES_COUNT";
/// Configurable holding the signer slots.
pub const SIGNERS: &str = "SIGNERS";
/// Configurable holding the address salt.
pub const HASH_PREDICATE: &str = "HASH_PREDICATE";
/// Configurable holding a connector's sole signer.
pub const SIGNER: &str = "SIGNER";

const SIGNATURES_COUNT_KEYS: [&str; 2] = [SIGNATURES_COUNT, "signaturesRequired"];
const SIGNERS_KEYS: [&str; 2] = [SIGNERS, "signers"];
const HASH_PREDICATE_KEYS: [&str; 2] = [HASH_PREDICATE, "hashSalt"];
const SIGNER_KEYS: [&str; 2] = [SIGNER, "signer"];

/// An M-of-N multisig configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BakoConfig {
    signatures_required: u8,
    signers: [Bytes32; SIGNER_SLOTS],
    hash_salt: Bytes32,
}

impl BakoConfig {
    /// Build a configuration, padding `signers` with zero placeholders.
    ///
    /// Only the slot count is checked here; see
    /// [`crate::VaultConfigValidator::validate`] for the rest.
    pub fn new(
        signatures_required: u8,
        signers: impl IntoIterator<Item = Bytes32>,
    ) -> Result<Self, VaultError> {
        let signers: Vec<_> = signers.into_iter().collect();
        if signers.len() > SIGNER_SLOTS {
            return Err(VaultError::invalid_value(
                SIGNERS,
                format!("at most {SIGNER_SLOTS} signers, got {}", signers.len()),
            ));
        }

        let mut slots = [Bytes32::ZERO; SIGNER_SLOTS];
        slots[..signers.len()].copy_from_slice(&signers);

        Ok(Self {
            signatures_required,
            signers: slots,
            hash_salt: Bytes32::ZERO,
        })
    }

    /// Set the salt that distinguishes vaults with equal signer sets.
    pub fn with_salt(mut self, hash_salt: Bytes32) -> Self {
        self.hash_salt = hash_salt;
        self
    }

    /// Signature threshold.
    pub fn signatures_required(&self) -> u8 {
        self.signatures_required
    }

    /// All ten slots, placeholders included.
    pub fn slots(&self) -> &[Bytes32; SIGNER_SLOTS] {
        &self.signers
    }

    /// Signers, without placeholders.
    pub fn signers(&self) -> impl Iterator<Item = &Bytes32> {
        self.signers.iter().filter(|slot| !slot.is_zero())
    }

    /// Address salt.
    pub fn hash_salt(&self) -> &Bytes32 {
        &self.hash_salt
    }
}

/// A single-signer configuration for a third-party wallet connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorConfig {
    signer: Bytes32,
}

impl ConnectorConfig {
    /// Build a connector configuration.
    pub fn new(signer: Bytes32) -> Self {
        Self { signer }
    }

    /// The sole signer.
    pub fn signer(&self) -> &Bytes32 {
        &self.signer
    }
}

/// The configurables a vault's predicate is instantiated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VaultConfig {
    /// Multisig vault.
    Bako(BakoConfig),
    /// Connector vault.
    Connector(ConnectorConfig),
}

impl VaultConfig {
    /// Signers, without placeholders.
    pub fn signers(&self) -> Vec<Bytes32> {
        match self {
            VaultConfig::Bako(config) => config.signers().copied().collect(),
            VaultConfig::Connector(config) => vec![config.signer],
        }
    }

    /// Origins inferred from the signers.
    pub fn origins(&self) -> BTreeSet<WalletOrigin> {
        self.signers()
            .iter()
            .filter(|signer| !signer.is_zero())
            .map(WalletOrigin::of_b256)
            .collect()
    }

    /// The configuration as predicate configurable values.
    pub fn configurables(&self) -> Vec<(&'static str, ConfigurableValue)> {
        match self {
            VaultConfig::Bako(config) => vec![
                (
                    SIGNATURES_COUNT,
                    ConfigurableValue::U64(config.signatures_required.into()),
                ),
                (
                    SIGNERS,
                    ConfigurableValue::Array(
                        config
                            .signers
                            .iter()
                            .copied()
                            .map(ConfigurableValue::B256)
                            .collect(),
                    ),
                ),
                (HASH_PREDICATE, ConfigurableValue::B256(config.hash_salt)),
            ],
            VaultConfig::Connector(config) => {
                vec![(SIGNER, ConfigurableValue::B256(config.signer))]
            }
        }
    }
}

impl From<BakoConfig> for VaultConfig {
    fn from(config: BakoConfig) -> Self {
        VaultConfig::Bako(config)
    }
}

impl From<ConnectorConfig> for VaultConfig {
    fn from(config: ConnectorConfig) -> Self {
        VaultConfig::Connector(config)
    }
}

/// Parse a raw JSON configuration.
///
/// The shape is detected from the keys present: `SIGNATURES_COUNT` or
/// `SIGNERS` make a Bako configuration, `SIGNER` a Connector one. The
/// camelCase aliases `signaturesRequired`, `signers`, `hashSalt` and `signer`
/// are accepted too. Signers are `0x` hex; 20-byte EVM addresses are
/// left-padded to 32 bytes.
///
/// # Errors
///
/// Returns [`VaultError::InvalidConfigShape`] when the shape is ambiguous or
/// incomplete and [`VaultError::InvalidConfigValue`] when a value cannot be
/// decoded.
pub fn parse_config(raw: &Value) -> Result<VaultConfig, VaultError> {
    let fields = raw
        .as_object()
        .ok_or_else(|| VaultError::InvalidConfigShape("expected a JSON object".into()))?;

    let count = lookup(fields, &SIGNATURES_COUNT_KEYS)?;
    let signers = lookup(fields, &SIGNERS_KEYS)?;
    let salt = lookup(fields, &HASH_PREDICATE_KEYS)?;
    let signer = lookup(fields, &SIGNER_KEYS)?;

    let config = match (count, signers, signer) {
        (None, None, Some(signer)) => {
            if salt.is_some() {
                return Err(VaultError::InvalidConfigShape(format!(
                    "{HASH_PREDICATE} is not a connector configurable"
                )));
            }
            VaultConfig::Connector(ConnectorConfig::new(parse_signer(SIGNER, signer)?))
        }
        (Some(count), Some(signers), None) => {
            let signers = signers
                .as_array()
                .ok_or_else(|| VaultError::invalid_value(SIGNERS, "expected an array"))?
                .iter()
                .map(|signer| parse_signer(SIGNERS, signer))
                .collect::<Result<Vec<_>, _>>()?;
            let hash_salt = match salt {
                Some(salt) => parse_b256(HASH_PREDICATE, salt)?,
                None => Bytes32::ZERO,
            };
            VaultConfig::Bako(
                BakoConfig::new(parse_count(count)?, signers)?.with_salt(hash_salt),
            )
        }
        (None, None, None) => {
            return Err(VaultError::InvalidConfigShape(format!(
                "expected {SIGNATURES_COUNT} and {SIGNERS}, or {SIGNER}"
            )));
        }
        (_, _, Some(_)) => {
            return Err(VaultError::InvalidConfigShape(format!(
                "{SIGNER} cannot be combined with {SIGNATURES_COUNT} or {SIGNERS}"
            )));
        }
        (None, Some(_), None) => {
            return Err(VaultError::InvalidConfigShape(format!(
                "missing {SIGNATURES_COUNT}"
            )));
        }
        (Some(_), None, None) => {
            return Err(VaultError::InvalidConfigShape(format!("missing {SIGNERS}")));
        }
    };

    tracing::debug!(config = ?config, "parsed vault configuration");

    Ok(config)
}

impl TryFrom<&Value> for VaultConfig {
    type Error = VaultError;

    fn try_from(raw: &Value) -> Result<Self, Self::Error> {
        parse_config(raw)
    }
}

fn lookup<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Result<Option<&'a Value>, VaultError> {
    let mut found = keys.iter().filter_map(|key| fields.get(*key));
    let value = found.next();
    if found.next().is_some() {
        return Err(VaultError::InvalidConfigShape(format!(
            "both {} given",
            keys.join(" and ")
        )));
    }
    Ok(value)
}

fn parse_count(value: &Value) -> Result<u8, VaultError> {
    let count = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.parse::<u64>().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        VaultError::invalid_value(SIGNATURES_COUNT, "expected a non-negative integer")
    })?;

    u8::try_from(count)
        .map_err(|_| VaultError::invalid_value(SIGNATURES_COUNT, format!("{count} is too large")))
}

fn parse_signer(key: &str, value: &Value) -> Result<Bytes32, VaultError> {
    let text = value
        .as_str()
        .ok_or_else(|| VaultError::invalid_value(key, "expected a hex string"))?;
    let bytes = decode_hex(text).map_err(|e| VaultError::invalid_value(key, e.to_string()))?;
    let address =
        Address::from_slice(&bytes).map_err(|e| VaultError::invalid_value(key, e.to_string()))?;
    Ok(address.to_b256())
}

fn parse_b256(key: &str, value: &Value) -> Result<Bytes32, VaultError> {
    value
        .as_str()
        .ok_or_else(|| VaultError::invalid_value(key, "expected a hex string"))?
        .parse::<Bytes32>()
        .map_err(|e| VaultError::invalid_value(key, e.to_string()))
}
