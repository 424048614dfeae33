//! The message digest a passkey signs.

use sha2::{Digest, Sha256};

/// `SHA256(authenticatorData || SHA256(clientDataJSON))`.
///
/// This is the prehash the authenticator signs, and the value the predicate
/// recomputes on-chain from the witness.
pub fn digest(authenticator_data: &[u8], client_data_json: &[u8]) -> [u8; 32] {
    let client_data_hash = Sha256::digest(client_data_json);

    let mut hasher = Sha256::new();
    hasher.update(authenticator_data);
    hasher.update(client_data_hash);
    hasher.finalize().into()
}
