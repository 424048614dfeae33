//! Error types for WebAuthn evidence preparation.

use thiserror::Error;

/// Errors from preparing WebAuthn evidence.
///
/// None of these are transient. The same input always fails the same way,
/// so the remedy is a new assertion, not a retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebAuthnError {
    /// The signature is not a DER `SEQUENCE { INTEGER r, INTEGER s }` with
    /// components that fit the curve.
    #[error("malformed DER signature: {0}")]
    MalformedDer(String),

    /// The raw 64-byte signature has a zero or out-of-range component.
    #[error("malformed ECDSA signature")]
    MalformedSignature,

    /// The public key bytes are not a P-256 point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// `clientDataJSON` could not be parsed or is not an assertion.
    #[error("invalid clientDataJSON: {0}")]
    InvalidClientData(String),

    /// The challenge does not appear in `clientDataJSON`.
    #[error("challenge not found in clientDataJSON")]
    ChallengeNotFound,

    /// Neither recovery bit reproduces the expected public key.
    #[error("no recovery bit reproduces the expected public key")]
    RecoveryMismatch,

    /// The top bit of S is set, so the recovery bit cannot be packed into it.
    #[error("signature is not low-S normalized")]
    NonNormalizedSignature,

    /// A recovery bit outside `{0, 1}`.
    #[error("invalid recovery bit {0}")]
    InvalidRecoveryBit(u8),

    /// A compact signature of the wrong length.
    #[error("expected a 64-byte compact signature, got {0} bytes")]
    InvalidCompactLength(usize),
}
