//! Error types for witness encoding and classification.

use crate::evidence::SignatureKind;
use bako_predicate::{Address, AddressError, CatalogError, WalletOrigin};
use bako_webauthn::WebAuthnError;
use thiserror::Error;

/// Errors from encoding, decoding or classifying signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The codec has no encoder registered for this kind.
    #[error("no encoder registered for {0} signatures")]
    EncoderNotFound(SignatureKind),

    /// An encoder was handed evidence of a different kind.
    #[error("{expected} encoder cannot encode {found} evidence")]
    EvidenceMismatch {
        /// The kind the encoder handles.
        expected: SignatureKind,
        /// The kind it was given.
        found: SignatureKind,
    },

    /// The wallet's origin has no witness encoding.
    #[error("wallet {address} has origin {origin}, which has no signature encoding")]
    UnsupportedOrigin {
        /// The origin inferred from the address.
        origin: WalletOrigin,
        /// The signing wallet.
        address: Address,
    },

    /// A signature of the wrong length for its kind.
    #[error("{kind} signature must be {expected} bytes, got {actual}")]
    InvalidSignatureLength {
        /// Kind being encoded.
        kind: SignatureKind,
        /// Required length.
        expected: usize,
        /// Length given.
        actual: usize,
    },

    /// An `r || s || v` signature whose `v` byte is not 0, 1, 27 or 28.
    #[error("invalid recovery byte {0}")]
    InvalidRecoveryByte(u8),

    /// A secp256k1 signature with a zero or out-of-range component.
    #[error("malformed secp256k1 signature")]
    MalformedSignature,

    /// Witness bytes that do not follow the envelope layout.
    #[error("malformed witness: {0}")]
    MalformedWitness(String),

    /// Predicate version lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// WebAuthn evidence could not be prepared.
    #[error(transparent)]
    WebAuthn(#[from] WebAuthnError),

    /// The wallet address could not be parsed.
    #[error(transparent)]
    Address(#[from] AddressError),
}
