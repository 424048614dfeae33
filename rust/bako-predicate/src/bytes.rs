//! Fixed-width byte values and `0x`-prefixed hex helpers.

use crate::error::AddressError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Size of a native chain word (`b256`) in bytes.
pub const B256_LEN: usize = 32;

/// A 32-byte value: a native address, a predicate slot or a salt.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes32([u8; B256_LEN]);

impl Bytes32 {
    /// The all-zero value, used as the empty signer placeholder.
    pub const ZERO: Self = Self([0u8; B256_LEN]);

    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; B256_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; B256_LEN] {
        &self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|byte| *byte == 0)
    }
}

impl From<[u8; B256_LEN]> for Bytes32 {
    fn from(value: [u8; B256_LEN]) -> Self {
        Self(value)
    }
}

impl From<Bytes32> for [u8; B256_LEN] {
    fn from(value: Bytes32) -> Self {
        value.0
    }
}

impl TryFrom<&[u8]> for Bytes32 {
    type Error = AddressError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes = <[u8; B256_LEN]>::try_from(value).map_err(|_| AddressError::InvalidLength {
            expected: "32",
            actual: value.len(),
        })?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Bytes32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_hex(&self.0))
    }
}

impl fmt::Debug for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes32({self})")
    }
}

impl FromStr for Bytes32 {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(decode_hex(s)?.as_slice())
    }
}

impl Serialize for Bytes32 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Bytes32 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Decode hex with or without a leading `0x`.
///
/// # Errors
///
/// Returns [`AddressError::InvalidHex`] for odd-length or non-hex input.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, AddressError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))
}

/// Encode bytes as lowercase `0x`-prefixed hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Serde adapter for `Vec<u8>` fields carried as `0x` hex strings.
///
/// Use with `#[serde(with = "bako_predicate::serde_hex")]`.
pub mod serde_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as a `0x` hex string.
    pub fn serialize<S, T>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&super::encode_hex(bytes.as_ref()))
    }

    /// Deserialize bytes from a hex string, `0x` prefix optional.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::decode_hex(&s).map_err(serde::de::Error::custom)
    }
}
