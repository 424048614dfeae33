//! Wallet origins: the signing scheme behind a signer address.

use crate::{
    address::{Address, EVM_PADDING_LEN},
    bytes::Bytes32,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a signer by the scheme/curve its signatures use.
///
/// Only [`WalletOrigin::Fuel`], [`WalletOrigin::Evm`] and
/// [`WalletOrigin::Svm`] can be inferred from an address. `WebAuthn` and
/// `Bako` signers are indistinguishable from native addresses by shape and
/// appear here as capabilities a predicate version declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletOrigin {
    /// Native secp256k1 key.
    Fuel,
    /// EVM-style secp256k1 key.
    Evm,
    /// Passkey (WebAuthn P-256) key.
    WebAuthn,
    /// SVM ed25519 key.
    Svm,
    /// Another Bako vault.
    Bako,
}

impl WalletOrigin {
    /// Every origin, in declaration order.
    pub const ALL: [WalletOrigin; 5] = [
        WalletOrigin::Fuel,
        WalletOrigin::Evm,
        WalletOrigin::WebAuthn,
        WalletOrigin::Svm,
        WalletOrigin::Bako,
    ];

    /// Infer the origin of a wallet address from its shape.
    pub fn of_address(address: &Address) -> Self {
        match address {
            Address::Evm(_) => WalletOrigin::Evm,
            Address::Svm(_) => WalletOrigin::Svm,
            Address::B256(slot) => Self::of_b256(slot),
        }
    }

    /// Infer the origin of a value stored in a predicate `b256` slot.
    ///
    /// A slot whose first 12 bytes are zero holds a left-padded EVM address.
    /// Callers must filter out the all-zero placeholder first.
    pub fn of_b256(slot: &Bytes32) -> Self {
        if slot.as_bytes()[..EVM_PADDING_LEN].iter().all(|byte| *byte == 0) {
            WalletOrigin::Evm
        } else {
            WalletOrigin::Fuel
        }
    }

    /// Lowercase name used in manifests and messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            WalletOrigin::Fuel => "fuel",
            WalletOrigin::Evm => "evm",
            WalletOrigin::WebAuthn => "webauthn",
            WalletOrigin::Svm => "svm",
            WalletOrigin::Bako => "bako",
        }
    }
}

impl fmt::Display for WalletOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
