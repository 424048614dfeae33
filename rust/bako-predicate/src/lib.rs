//! Predicate version catalog for Bako vaults.
//!
//! A vault is controlled by an on-chain predicate. Every deployed revision of
//! that predicate is identified by the SHA-256 of its bytecode and declares
//! which kinds of signers ([`WalletOrigin`]s) it knows how to verify. This
//! crate ships an immutable, content-addressed [`Catalog`] of those
//! revisions, along with the address and ABI types the other Bako crates use
//! to reason about signers.
//!
//! ```rust
//! use bako_predicate::{Catalog, NetworkId, WalletOrigin};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let version = catalog.latest_deployed_on(NetworkId::MAINNET).unwrap();
//! assert!(version.supports(WalletOrigin::Fuel));
//! ```

pub mod abi;
pub mod address;
pub mod bytes;
pub mod catalog;
pub mod error;
pub mod origin;
pub mod version;

pub use abi::*;
pub use address::*;
pub use bytes::*;
pub use catalog::*;
pub use error::*;
pub use origin::*;
pub use version::*;
