//! WebAuthn evidence preparation for Bako predicates.
//!
//! Passkeys sign `authenticatorData || SHA-256(clientDataJSON)` with ECDSA
//! P-256 and hand back a DER signature, but never the recovery bit a
//! predicate needs to recover the signer's key on-chain. This crate turns a
//! raw assertion into the compact form the predicate consumes:
//!
//! 1. [`der_decode`] the signature into 64 raw bytes
//! 2. [`normalize`] it to low-S
//! 3. compute the signed [`digest`]
//! 4. [`find_recovery_bit`] by recovering both candidate keys and comparing
//!    against the known public key
//! 5. pack the bit with [`encode_compact_recovery`]
//! 6. [`split_client_data`] around the challenge so the predicate can rebuild
//!    `clientDataJSON` from the transaction id
//!
//! [`Assertion::prepare`] runs the whole pipeline.
//!
//! Every failure here is deterministic: retrying with the same bytes fails
//! the same way, so callers should collect a fresh assertion instead.

mod assertion;
mod client_data;
mod compact;
mod der;
mod digest;
mod error;
mod recovery;

pub use assertion::{Assertion, PreparedAssertion};
pub use client_data::{ClientData, encode_challenge, split_client_data};
pub use compact::{
    COMPACT_SIGNATURE_LEN, RecoveryBit, compact_from_slice, decode_compact_recovery,
    encode_compact_recovery,
};
pub use der::der_decode;
pub use digest::digest;
pub use error::WebAuthnError;
pub use recovery::{find_recovery_bit, normalize, public_key_from_bytes, recover};
