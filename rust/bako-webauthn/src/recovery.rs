//! Low-S normalization and public key recovery over P-256.

use crate::{
    compact::{COMPACT_SIGNATURE_LEN, RecoveryBit},
    error::WebAuthnError,
};
use p256::ecdsa::{Signature, VerifyingKey};

/// Length of an uncompressed SEC1 point without its `0x04` tag.
const UNTAGGED_POINT_LEN: usize = 64;

/// Replace S with `n - S` when S is above half the curve order.
///
/// Both `(r, s)` and `(r, n - s)` verify, so only the low representative is
/// ever put on the wire.
///
/// # Errors
///
/// Returns [`WebAuthnError::MalformedSignature`] if either component is zero
/// or not below the curve order.
pub fn normalize(
    raw: &[u8; COMPACT_SIGNATURE_LEN],
) -> Result<[u8; COMPACT_SIGNATURE_LEN], WebAuthnError> {
    let signature = Signature::from_slice(raw).map_err(|_| WebAuthnError::MalformedSignature)?;
    let normalized = signature.normalize_s().unwrap_or(signature);

    let mut out = [0u8; COMPACT_SIGNATURE_LEN];
    out.copy_from_slice(&normalized.to_bytes());
    Ok(out)
}

/// Recover the public key that produced `signature` over `digest`, assuming
/// the given recovery bit.
///
/// # Errors
///
/// Returns [`WebAuthnError::MalformedSignature`] for an invalid signature and
/// [`WebAuthnError::RecoveryMismatch`] when no point exists for this bit.
pub fn recover(
    signature: &[u8; COMPACT_SIGNATURE_LEN],
    digest: &[u8; 32],
    bit: RecoveryBit,
) -> Result<VerifyingKey, WebAuthnError> {
    let signature =
        Signature::from_slice(signature).map_err(|_| WebAuthnError::MalformedSignature)?;
    VerifyingKey::recover_from_prehash(digest, &signature, bit.into())
        .map_err(|_| WebAuthnError::RecoveryMismatch)
}

/// Find the recovery bit under which `signature` recovers `expected`.
///
/// Both candidates are recovered and compared; a bit is never assumed just
/// because the other one failed.
///
/// # Errors
///
/// Returns [`WebAuthnError::RecoveryMismatch`] when neither bit reproduces
/// `expected`.
pub fn find_recovery_bit(
    signature: &[u8; COMPACT_SIGNATURE_LEN],
    digest: &[u8; 32],
    expected: &VerifyingKey,
) -> Result<RecoveryBit, WebAuthnError> {
    for bit in RecoveryBit::CANDIDATES {
        match recover(signature, digest, bit) {
            Ok(candidate) if candidate == *expected => {
                tracing::debug!(bit = bit.as_u8(), "recovered WebAuthn public key");
                return Ok(bit);
            }
            Ok(_) => {}
            Err(WebAuthnError::RecoveryMismatch) => {}
            Err(error) => return Err(error),
        }
    }

    tracing::debug!("no recovery bit reproduces the expected public key");
    Err(WebAuthnError::RecoveryMismatch)
}

/// Parse a P-256 public key.
///
/// Accepts SEC1 compressed (33 bytes) or uncompressed (65 bytes) points, as
/// well as the 64-byte `x || y` form some authenticator libraries return.
///
/// # Errors
///
/// Returns [`WebAuthnError::InvalidPublicKey`] if the bytes are not a point
/// on the curve.
pub fn public_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey, WebAuthnError> {
    let result = if bytes.len() == UNTAGGED_POINT_LEN {
        let mut tagged = Vec::with_capacity(UNTAGGED_POINT_LEN + 1);
        tagged.push(0x04);
        tagged.extend_from_slice(bytes);
        VerifyingKey::from_sec1_bytes(&tagged)
    } else {
        VerifyingKey::from_sec1_bytes(bytes)
    };

    result.map_err(|e| WebAuthnError::InvalidPublicKey(e.to_string()))
}
