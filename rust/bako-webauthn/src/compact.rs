//! Compact recovery encoding.
//!
//! A low-S signature never has the top bit of S set, so that bit is free to
//! carry the recovery bit. The layout is `r (32) || s (32)` with bit 7 of
//! byte 32 holding the parity of the recovered point's y coordinate.

use crate::error::WebAuthnError;

/// Length of a raw or compact `r || s` signature.
pub const COMPACT_SIGNATURE_LEN: usize = 64;

const S_FIRST_BYTE: usize = 32;
const RECOVERY_MASK: u8 = 0x80;

/// The parity bit needed to recover a public key from an ECDSA signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryBit {
    /// Even y coordinate.
    Zero,
    /// Odd y coordinate.
    One,
}

impl RecoveryBit {
    /// Both candidates, in the order they are tried.
    pub const CANDIDATES: [RecoveryBit; 2] = [RecoveryBit::Zero, RecoveryBit::One];

    /// `0` or `1`.
    pub const fn as_u8(self) -> u8 {
        match self {
            RecoveryBit::Zero => 0,
            RecoveryBit::One => 1,
        }
    }

    /// Whether the recovered point has an odd y coordinate.
    pub const fn is_y_odd(self) -> bool {
        matches!(self, RecoveryBit::One)
    }
}

impl TryFrom<u8> for RecoveryBit {
    type Error = WebAuthnError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RecoveryBit::Zero),
            1 => Ok(RecoveryBit::One),
            other => Err(WebAuthnError::InvalidRecoveryBit(other)),
        }
    }
}

impl From<RecoveryBit> for ecdsa::RecoveryId {
    fn from(bit: RecoveryBit) -> Self {
        ecdsa::RecoveryId::new(bit.is_y_odd(), false)
    }
}

/// Pack `bit` into the top bit of S.
///
/// # Errors
///
/// Returns [`WebAuthnError::NonNormalizedSignature`] if that bit is already
/// set, which only happens for a high-S signature.
pub fn encode_compact_recovery(
    raw: &[u8; COMPACT_SIGNATURE_LEN],
    bit: RecoveryBit,
) -> Result<[u8; COMPACT_SIGNATURE_LEN], WebAuthnError> {
    if raw[S_FIRST_BYTE] & RECOVERY_MASK != 0 {
        return Err(WebAuthnError::NonNormalizedSignature);
    }

    let mut encoded = *raw;
    if bit.is_y_odd() {
        encoded[S_FIRST_BYTE] |= RECOVERY_MASK;
    }
    Ok(encoded)
}

/// Split a compact signature back into the raw signature and its bit.
pub fn decode_compact_recovery(
    encoded: &[u8; COMPACT_SIGNATURE_LEN],
) -> ([u8; COMPACT_SIGNATURE_LEN], RecoveryBit) {
    let mut raw = *encoded;
    let bit = if raw[S_FIRST_BYTE] & RECOVERY_MASK == 0 {
        RecoveryBit::Zero
    } else {
        RecoveryBit::One
    };
    raw[S_FIRST_BYTE] &= !RECOVERY_MASK;
    (raw, bit)
}

/// Borrow a slice as a 64-byte signature.
///
/// # Errors
///
/// Returns [`WebAuthnError::InvalidCompactLength`] for any other length.
pub fn compact_from_slice(bytes: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_LEN], WebAuthnError> {
    <[u8; COMPACT_SIGNATURE_LEN]>::try_from(bytes)
        .map_err(|_| WebAuthnError::InvalidCompactLength(bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn low_s() -> impl Strategy<Value = [u8; COMPACT_SIGNATURE_LEN]> {
        proptest::collection::vec(any::<u8>(), COMPACT_SIGNATURE_LEN).prop_map(|bytes| {
            let mut raw = [0u8; COMPACT_SIGNATURE_LEN];
            raw.copy_from_slice(&bytes);
            raw[S_FIRST_BYTE] &= !RECOVERY_MASK;
            raw
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(raw in low_s(), odd in any::<bool>()) {
            let bit = if odd { RecoveryBit::One } else { RecoveryBit::Zero };
            let encoded = encode_compact_recovery(&raw, bit).unwrap();

            prop_assert_eq!(decode_compact_recovery(&encoded), (raw, bit));
        }

        #[test]
        fn encoding_only_touches_the_top_bit_of_s(raw in low_s()) {
            let encoded = encode_compact_recovery(&raw, RecoveryBit::One).unwrap();
            for (index, (a, b)) in raw.iter().zip(encoded.iter()).enumerate() {
                if index == S_FIRST_BYTE {
                    prop_assert_eq!(*a | RECOVERY_MASK, *b);
                } else {
                    prop_assert_eq!(a, b);
                }
            }
        }
    }

    #[test]
    fn it_refuses_high_s() {
        let mut raw = [0u8; COMPACT_SIGNATURE_LEN];
        raw[S_FIRST_BYTE] = 0x80;

        assert_eq!(
            encode_compact_recovery(&raw, RecoveryBit::Zero),
            Err(WebAuthnError::NonNormalizedSignature)
        );
    }

    #[test]
    fn it_validates_bits_and_lengths() {
        assert_eq!(RecoveryBit::try_from(1), Ok(RecoveryBit::One));
        assert_eq!(
            RecoveryBit::try_from(2),
            Err(WebAuthnError::InvalidRecoveryBit(2))
        );
        assert_eq!(
            compact_from_slice(&[0u8; 65]),
            Err(WebAuthnError::InvalidCompactLength(65))
        );
    }
}
