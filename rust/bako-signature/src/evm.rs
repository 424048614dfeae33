//! EVM signature normalization.
//!
//! EVM wallets return `r || s || v`. The predicate reads 64-byte compact
//! signatures with low S and the recovery parity in the top bit of S.

use crate::{error::SignatureError, evidence::SignatureKind};
use bako_webauthn::{COMPACT_SIGNATURE_LEN, RecoveryBit, encode_compact_recovery};
use k256::ecdsa::Signature;

/// Length of an `r || s || v` signature.
pub const RSV_SIGNATURE_LEN: usize = 65;

/// Convert an `r || s || v` signature into the predicate's compact form.
///
/// `v` may be `0`/`1` or `27`/`28`. A high S is replaced by `n - S`, which
/// flips the recovery parity.
///
/// # Errors
///
/// Fails for the wrong length, an unknown `v`, or out-of-range scalars.
pub fn compact_signature(rsv: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_LEN], SignatureError> {
    if rsv.len() != RSV_SIGNATURE_LEN {
        return Err(SignatureError::InvalidSignatureLength {
            kind: SignatureKind::Evm,
            expected: RSV_SIGNATURE_LEN,
            actual: rsv.len(),
        });
    }

    let (rs, v) = rsv.split_at(COMPACT_SIGNATURE_LEN);
    let mut bit = match v[0] {
        0 | 27 => RecoveryBit::Zero,
        1 | 28 => RecoveryBit::One,
        other => return Err(SignatureError::InvalidRecoveryByte(other)),
    };

    let mut signature =
        Signature::from_slice(rs).map_err(|_| SignatureError::MalformedSignature)?;
    if let Some(normalized) = signature.normalize_s() {
        signature = normalized;
        bit = match bit {
            RecoveryBit::Zero => RecoveryBit::One,
            RecoveryBit::One => RecoveryBit::Zero,
        };
    }

    let mut raw = [0u8; COMPACT_SIGNATURE_LEN];
    raw.copy_from_slice(&signature.to_bytes());
    Ok(encode_compact_recovery(&raw, bit)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bako_webauthn::decode_compact_recovery;
    use k256::ecdsa::{RecoveryId, SigningKey, VerifyingKey};

    fn sign(seed: u8, digest: &[u8; 32]) -> (VerifyingKey, Signature, RecoveryId) {
        let key = SigningKey::from_bytes(&[seed; 32].into()).unwrap();
        let (signature, recovery_id) = key.sign_prehash_recoverable(digest).unwrap();
        (*key.verifying_key(), signature, recovery_id)
    }

    fn rsv(signature: &Signature, v: u8) -> Vec<u8> {
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(v);
        bytes
    }

    fn recovers(compact: &[u8; 64], digest: &[u8; 32], expected: &VerifyingKey) -> bool {
        let (raw, bit) = decode_compact_recovery(compact);
        let signature = Signature::from_slice(&raw).unwrap();
        let id = RecoveryId::new(bit.is_y_odd(), false);
        matches!(
            VerifyingKey::recover_from_prehash(digest, &signature, id),
            Ok(key) if key == *expected
        )
    }

    #[test]
    fn low_s_signatures_keep_their_parity() {
        let digest = [0x5a; 32];
        for seed in 1..=8u8 {
            let (key, signature, id) = sign(seed, &digest);
            for v in [id.to_byte(), id.to_byte() + 27] {
                let compact = compact_signature(&rsv(&signature, v)).unwrap();
                assert!(recovers(&compact, &digest, &key));
            }
        }
    }

    #[test]
    fn high_s_signatures_are_normalized_and_flipped() {
        let digest = [0xa5; 32];
        for seed in 1..=8u8 {
            let (key, signature, id) = sign(seed, &digest);
            let high = Signature::from_scalars(signature.r(), -signature.s()).unwrap();
            assert!(high.normalize_s().is_some());

            let flipped = id.to_byte() ^ 1;
            let compact = compact_signature(&rsv(&high, flipped)).unwrap();

            assert!(recovers(&compact, &digest, &key));
            assert_eq!(&compact[..32], &signature.to_bytes()[..32]);
        }
    }

    #[test]
    fn bad_input_is_rejected() {
        let digest = [1; 32];
        let (_, signature, _) = sign(1, &digest);

        assert_eq!(
            compact_signature(&[0; 64]),
            Err(SignatureError::InvalidSignatureLength {
                kind: SignatureKind::Evm,
                expected: 65,
                actual: 64,
            })
        );
        assert_eq!(
            compact_signature(&rsv(&signature, 29)),
            Err(SignatureError::InvalidRecoveryByte(29))
        );
        assert_eq!(
            compact_signature(&[0; 65]),
            Err(SignatureError::MalformedSignature)
        );
    }
}
