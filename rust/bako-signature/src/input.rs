//! The shapes a caller may hand a signature in.

use bako_predicate::serde_hex;
use bako_webauthn::PreparedAssertion;
use serde::{Deserialize, Serialize};

/// A prepared WebAuthn assertion, as wallets submit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebAuthnBundle {
    /// Compact signature with the recovery bit packed in.
    #[serde(with = "serde_hex")]
    pub signature: Vec<u8>,
    /// `clientDataJSON` before the challenge.
    #[serde(with = "serde_hex")]
    pub prefix: Vec<u8>,
    /// `clientDataJSON` after the challenge.
    #[serde(with = "serde_hex")]
    pub suffix: Vec<u8>,
    /// `authenticatorData`.
    #[serde(rename = "authData", with = "serde_hex")]
    pub authenticator_data: Vec<u8>,
}

/// A signature wrapped in an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WrappedSignature {
    /// Signature bytes.
    #[serde(with = "serde_hex")]
    pub signature: Vec<u8>,
}

/// A signature before classification.
///
/// Deserializes from any of
///
/// ```json
/// "0x1234..."
/// { "signature": "0x1234..." }
/// { "signature": "0x...", "prefix": "0x...", "suffix": "0x...", "authData": "0x..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignatureInput {
    /// Full WebAuthn context.
    WebAuthn(WebAuthnBundle),
    /// Object with only a signature.
    Wrapped(WrappedSignature),
    /// Bare hex string.
    Raw(#[serde(with = "serde_hex")] Vec<u8>),
}

impl SignatureInput {
    /// The signature bytes, whatever the shape.
    pub fn signature(&self) -> &[u8] {
        match self {
            SignatureInput::WebAuthn(bundle) => &bundle.signature,
            SignatureInput::Wrapped(wrapped) => &wrapped.signature,
            SignatureInput::Raw(signature) => signature,
        }
    }

    /// Take the signature bytes, dropping any WebAuthn context.
    pub fn into_signature(self) -> Vec<u8> {
        match self {
            SignatureInput::WebAuthn(bundle) => bundle.signature,
            SignatureInput::Wrapped(wrapped) => wrapped.signature,
            SignatureInput::Raw(signature) => signature,
        }
    }

    /// Whether this input carries WebAuthn context.
    pub fn is_webauthn(&self) -> bool {
        matches!(self, SignatureInput::WebAuthn(_))
    }
}

impl From<Vec<u8>> for SignatureInput {
    fn from(signature: Vec<u8>) -> Self {
        SignatureInput::Raw(signature)
    }
}

impl From<&[u8]> for SignatureInput {
    fn from(signature: &[u8]) -> Self {
        SignatureInput::Raw(signature.to_vec())
    }
}

impl From<PreparedAssertion> for SignatureInput {
    fn from(prepared: PreparedAssertion) -> Self {
        SignatureInput::WebAuthn(WebAuthnBundle {
            signature: prepared.signature.to_vec(),
            prefix: prepared.prefix,
            suffix: prepared.suffix,
            authenticator_data: prepared.authenticator_data,
        })
    }
}
