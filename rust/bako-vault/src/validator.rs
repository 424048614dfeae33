//! Vault configuration validation.

use crate::{
    compatibility::CompatibilityService,
    config::{BakoConfig, ConnectorConfig, SIGNATURES_COUNT, SIGNER, SIGNERS, VaultConfig, parse_config},
    error::VaultError,
};
use bako_predicate::{Catalog, PredicateAbi, VersionId};
use serde_json::Value;
use std::collections::HashSet;

/// Parses, validates and compatibility-checks vault configurations.
#[derive(Debug, Clone, Copy)]
pub struct VaultConfigValidator<'a> {
    compatibility: CompatibilityService<'a>,
}

impl<'a> VaultConfigValidator<'a> {
    /// A validator backed by `catalog`.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            compatibility: CompatibilityService::new(catalog),
        }
    }

    /// The compatibility checks this validator runs.
    pub fn compatibility(&self) -> &CompatibilityService<'a> {
        &self.compatibility
    }

    /// See [`crate::parse_config`].
    pub fn parse_config(&self, raw: &Value) -> Result<VaultConfig, VaultError> {
        parse_config(raw)
    }

    /// Check the configuration's invariants and, for Bako configurations,
    /// the type of every configurable `version` declares.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfigValue`] naming the first offending
    /// configurable, or [`VaultError::PredicateVersionNotFound`].
    pub fn validate(&self, config: &VaultConfig, version: &VersionId) -> Result<(), VaultError> {
        let predicate = self.compatibility.resolve(config, version)?;

        match config {
            VaultConfig::Bako(bako) => {
                check_threshold(bako)?;
                check_abi(config, predicate.abi())?;
            }
            VaultConfig::Connector(connector) => check_connector(connector)?,
        }

        tracing::debug!(version = %predicate.id(), "vault configuration is valid");

        Ok(())
    }

    /// Parse, validate and check compatibility in one go.
    pub fn prepare(&self, raw: &Value, version: &VersionId) -> Result<VaultConfig, VaultError> {
        let config = self.parse_config(raw)?;
        self.validate(&config, version)?;
        self.compatibility.is_compatible(&config, version)?;
        Ok(config)
    }
}

fn check_threshold(config: &BakoConfig) -> Result<(), VaultError> {
    let required = config.signatures_required();
    if required == 0 {
        return Err(VaultError::invalid_value(SIGNATURES_COUNT, "must be at least 1"));
    }

    let mut seen = HashSet::new();
    for signer in config.signers() {
        if !seen.insert(signer) {
            return Err(VaultError::invalid_value(
                SIGNERS,
                format!("duplicate signer {signer}"),
            ));
        }
    }

    if seen.is_empty() {
        return Err(VaultError::invalid_value(SIGNERS, "no signers"));
    }
    if usize::from(required) > seen.len() {
        return Err(VaultError::invalid_value(
            SIGNATURES_COUNT,
            format!("requires {required} signatures but only {} signers", seen.len()),
        ));
    }

    Ok(())
}

fn check_connector(config: &ConnectorConfig) -> Result<(), VaultError> {
    if config.signer().is_zero() {
        return Err(VaultError::invalid_value(SIGNER, "must not be zero"));
    }
    Ok(())
}

fn check_abi(config: &VaultConfig, abi: &PredicateAbi) -> Result<(), VaultError> {
    let values = config.configurables();

    for declared in &abi.configurables {
        let value = values
            .iter()
            .find(|(name, _)| *name == declared.name)
            .map(|(_, value)| value)
            .ok_or_else(|| VaultError::invalid_value(&declared.name, "missing"))?;

        if !declared.ty.accepts(value) {
            return Err(VaultError::invalid_value(
                &declared.name,
                format!("expected {}, found {}", declared.ty, value.kind()),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bako_predicate::{AbiType, Bytes32};

    fn signer(byte: u8) -> Bytes32 {
        Bytes32::new([byte; 32])
    }

    fn key(result: Result<(), VaultError>) -> String {
        match result {
            Err(VaultError::InvalidConfigValue { key, .. }) => key,
            other => panic!("expected InvalidConfigValue, got {other:?}"),
        }
    }

    #[test]
    fn threshold_must_be_positive_and_reachable() {
        let zero = BakoConfig::new(0, [signer(1)]).unwrap();
        assert_eq!(key(check_threshold(&zero)), SIGNATURES_COUNT);

        let empty = BakoConfig::new(1, []).unwrap();
        assert_eq!(key(check_threshold(&empty)), SIGNERS);

        let unreachable = BakoConfig::new(3, [signer(1), signer(2)]).unwrap();
        assert_eq!(key(check_threshold(&unreachable)), SIGNATURES_COUNT);

        let duplicated = BakoConfig::new(1, [signer(1), signer(1)]).unwrap();
        assert_eq!(key(check_threshold(&duplicated)), SIGNERS);

        let fine = BakoConfig::new(2, [signer(1), signer(2)]).unwrap();
        assert!(check_threshold(&fine).is_ok());
    }

    #[test]
    fn placeholders_do_not_count_as_signers() {
        let padded = BakoConfig::new(2, [signer(1), Bytes32::ZERO, Bytes32::ZERO]).unwrap();
        assert_eq!(key(check_threshold(&padded)), SIGNATURES_COUNT);
    }

    #[test]
    fn connector_signer_must_be_set() {
        assert_eq!(
            key(check_connector(&ConnectorConfig::new(Bytes32::ZERO))),
            SIGNER
        );
        assert!(check_connector(&ConnectorConfig::new(signer(1))).is_ok());
    }

    #[test]
    fn abi_types_are_enforced() {
        let config: VaultConfig = BakoConfig::new(1, [signer(1)]).unwrap().into();

        let matching = PredicateAbi::new([
            (SIGNATURES_COUNT, AbiType::U64),
            (SIGNERS, AbiType::array(AbiType::B256, 10)),
        ]);
        assert!(check_abi(&config, &matching).is_ok());

        let short = PredicateAbi::new([(SIGNERS, AbiType::array(AbiType::B256, 5))]);
        assert_eq!(key(check_abi(&config, &short)), SIGNERS);

        let boolean = PredicateAbi::new([(SIGNATURES_COUNT, AbiType::Bool)]);
        assert_eq!(key(check_abi(&config, &boolean)), SIGNATURES_COUNT);

        let unknown = PredicateAbi::new([("OWNER", AbiType::B256)]);
        assert_eq!(key(check_abi(&config, &unknown)), "OWNER");
    }
}
