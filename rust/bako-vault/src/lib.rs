//! Vault configuration for Bako predicates.
//!
//! A vault is a predicate instantiated with configurables: a signature
//! threshold and up to ten signers for a Bako multisig, or a single signer
//! for a connector vault. Before a vault is used its configuration is
//! parsed, checked against its invariants and the target predicate's ABI,
//! and checked for signer origins the predicate version cannot verify.
//!
//! ```rust
//! use bako_predicate::{Catalog, DEFAULT_PREDICATE_VERSION};
//! use bako_vault::VaultConfigValidator;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let validator = VaultConfigValidator::new(&catalog);
//! let config = validator
//!     .prepare(
//!         &serde_json::json!({
//!             "SIGNATURES_COUNT": 1,
//!             "SIGNERS": ["0x1111111111111111111111111111111111111111111111111111111111111111"],
//!         }),
//!         &DEFAULT_PREDICATE_VERSION,
//!     )
//!     .unwrap();
//! assert_eq!(config.signers().len(), 1);
//! ```

mod compatibility;
mod config;
mod error;
mod validator;

pub use compatibility::CompatibilityService;
pub use config::{
    BakoConfig, ConnectorConfig, HASH_PREDICATE, SIGNATURES_COUNT, SIGNER, SIGNER_SLOTS, SIGNERS,
    VaultConfig, parse_config,
};
pub use error::VaultError;
pub use validator::VaultConfigValidator;
