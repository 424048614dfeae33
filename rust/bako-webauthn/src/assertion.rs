//! End-to-end preparation of a WebAuthn assertion.

use crate::{
    client_data::{ClientData, split_client_data},
    compact::{COMPACT_SIGNATURE_LEN, RecoveryBit, decode_compact_recovery, encode_compact_recovery},
    der::der_decode,
    digest::digest,
    error::WebAuthnError,
    recovery::{find_recovery_bit, normalize, recover},
};
use p256::ecdsa::VerifyingKey;

/// A raw assertion as returned by `navigator.credentials.get()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    /// `response.authenticatorData`.
    pub authenticator_data: Vec<u8>,
    /// `response.clientDataJSON`.
    pub client_data_json: Vec<u8>,
    /// `response.signature`, DER encoded.
    pub signature: Vec<u8>,
}

/// An assertion reduced to what the predicate reads from the witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedAssertion {
    /// Low-S `r || s` with the recovery bit packed into S.
    pub signature: [u8; COMPACT_SIGNATURE_LEN],
    /// The bit packed into `signature`.
    pub recovery_bit: RecoveryBit,
    /// The digest the authenticator signed.
    pub digest: [u8; 32],
    /// `clientDataJSON` up to the challenge.
    pub prefix: Vec<u8>,
    /// `clientDataJSON` after the challenge.
    pub suffix: Vec<u8>,
    /// `authenticatorData`, verbatim.
    pub authenticator_data: Vec<u8>,
}

impl Assertion {
    /// Build an assertion from its three parts.
    pub fn new(authenticator_data: Vec<u8>, client_data_json: Vec<u8>, signature: Vec<u8>) -> Self {
        Self {
            authenticator_data,
            client_data_json,
            signature,
        }
    }

    /// Reduce this assertion to predicate evidence.
    ///
    /// `challenge` is the challenge exactly as it appears in
    /// `clientDataJSON` (see [`crate::encode_challenge`]); `public_key` is
    /// the passkey's registered key.
    ///
    /// # Errors
    ///
    /// Fails on malformed DER or client data, when the challenge is absent,
    /// and when no recovery bit reproduces `public_key`.
    pub fn prepare(
        &self,
        challenge: &[u8],
        public_key: &VerifyingKey,
    ) -> Result<PreparedAssertion, WebAuthnError> {
        ClientData::parse(&self.client_data_json)?;

        let raw = der_decode(&self.signature)?;
        let normalized = normalize(&raw)?;
        let digest = digest(&self.authenticator_data, &self.client_data_json);
        let recovery_bit = find_recovery_bit(&normalized, &digest, public_key)?;
        let signature = encode_compact_recovery(&normalized, recovery_bit)?;
        let (prefix, suffix) = split_client_data(&self.client_data_json, challenge)?;

        tracing::debug!(
            recovery_bit = recovery_bit.as_u8(),
            prefix_len = prefix.len(),
            suffix_len = suffix.len(),
            authenticator_data_len = self.authenticator_data.len(),
            "prepared WebAuthn assertion"
        );

        Ok(PreparedAssertion {
            signature,
            recovery_bit,
            digest,
            prefix: prefix.to_vec(),
            suffix: suffix.to_vec(),
            authenticator_data: self.authenticator_data.clone(),
        })
    }
}

impl PreparedAssertion {
    /// Rebuild `clientDataJSON` by splicing `challenge` between the prefix
    /// and suffix.
    pub fn client_data_json(&self, challenge: &[u8]) -> Vec<u8> {
        let mut json = Vec::with_capacity(self.prefix.len() + challenge.len() + self.suffix.len());
        json.extend_from_slice(&self.prefix);
        json.extend_from_slice(challenge);
        json.extend_from_slice(&self.suffix);
        json
    }

    /// Check the evidence the way the predicate does: rebuild the client
    /// data, recompute the digest, unpack the bit and recover the signer.
    ///
    /// # Errors
    ///
    /// Returns [`WebAuthnError::RecoveryMismatch`] if the recovered key is
    /// not `expected`.
    pub fn verify(&self, challenge: &[u8], expected: &VerifyingKey) -> Result<(), WebAuthnError> {
        let client_data_json = self.client_data_json(challenge);
        let digest = digest(&self.authenticator_data, &client_data_json);
        let (raw, bit) = decode_compact_recovery(&self.signature);

        if recover(&raw, &digest, bit)? == *expected {
            Ok(())
        } else {
            Err(WebAuthnError::RecoveryMismatch)
        }
    }
}
