//! DER to raw signature conversion.

use crate::{compact::COMPACT_SIGNATURE_LEN, error::WebAuthnError};
use p256::ecdsa::Signature;

/// Convert a DER `SEQUENCE { INTEGER r, INTEGER s }` into `r || s`.
///
/// Each integer loses its sign-padding zero byte and is left-padded to 32
/// bytes.
///
/// # Errors
///
/// Returns [`WebAuthnError::MalformedDer`] if the input is not strict DER or
/// a component is zero or does not fit in 32 bytes.
pub fn der_decode(der: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_LEN], WebAuthnError> {
    let signature =
        Signature::from_der(der).map_err(|e| WebAuthnError::MalformedDer(e.to_string()))?;

    let mut raw = [0u8; COMPACT_SIGNATURE_LEN];
    raw.copy_from_slice(&signature.to_bytes());
    Ok(raw)
}
