//! Signer and wallet addresses.

use crate::{
    bytes::{B256_LEN, Bytes32, decode_hex, encode_hex},
    error::AddressError,
    origin::WalletOrigin,
};
use base58::{FromBase58, ToBase58};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Size of an EVM-style address in bytes.
pub const EVM_ADDRESS_LEN: usize = 20;

/// Number of zero bytes an EVM address is left-padded with to fill a `b256`.
pub const EVM_PADDING_LEN: usize = B256_LEN - EVM_ADDRESS_LEN;

/// An address in one of the shapes a vault signer or wallet may take.
///
/// Hex input of 32 bytes is kept as [`Address::B256`]; hex input of 20 bytes
/// is an [`Address::Evm`]; 32 bytes of base58 is an [`Address::Svm`] key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// A native 32-byte address. May hold a left-padded EVM address.
    B256(Bytes32),
    /// A 20-byte EVM-style address.
    Evm([u8; EVM_ADDRESS_LEN]),
    /// A 32-byte SVM public key (base58 on the wire).
    Svm(Bytes32),
}

impl Address {
    /// Build an address from raw bytes (20 or 32 long).
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidLength`] for any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        match bytes.len() {
            EVM_ADDRESS_LEN => {
                let mut evm = [0u8; EVM_ADDRESS_LEN];
                evm.copy_from_slice(bytes);
                Ok(Address::Evm(evm))
            }
            B256_LEN => Ok(Address::B256(Bytes32::try_from(bytes)?)),
            actual => Err(AddressError::InvalidLength {
                expected: "20 or 32",
                actual,
            }),
        }
    }

    /// The address as it is stored in a predicate `b256` slot.
    pub fn to_b256(&self) -> Bytes32 {
        match self {
            Address::B256(bytes) | Address::Svm(bytes) => *bytes,
            Address::Evm(evm) => {
                let mut slot = [0u8; B256_LEN];
                slot[EVM_PADDING_LEN..].copy_from_slice(evm);
                Bytes32::new(slot)
            }
        }
    }

    /// The raw bytes as given.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Address::B256(bytes) | Address::Svm(bytes) => bytes.as_bytes(),
            Address::Evm(evm) => evm,
        }
    }

    /// The wallet origin implied by this address' shape.
    pub fn origin(&self) -> WalletOrigin {
        WalletOrigin::of_address(self)
    }
}

impl From<Bytes32> for Address {
    fn from(value: Bytes32) -> Self {
        Address::B256(value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::B256(bytes) => write!(f, "{bytes}"),
            Address::Evm(evm) => f.write_str(&encode_hex(evm)),
            Address::Svm(bytes) => f.write_str(&bytes.as_bytes().to_base58()),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if looks_like_hex(s) {
            return Self::from_slice(&decode_hex(s)?);
        }

        let bytes = s.from_base58().map_err(|_| AddressError::InvalidBase58)?;
        Ok(Address::Svm(Bytes32::try_from(bytes.as_slice())?))
    }
}

fn looks_like_hex(s: &str) -> bool {
    if s.starts_with("0x") || s.starts_with("0X") {
        return true;
    }
    (s.len() == 2 * EVM_ADDRESS_LEN || s.len() == 2 * B256_LEN)
        && s.bytes().all(|byte| byte.is_ascii_hexdigit())
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
