//! Signature evidence: one signature, tagged with its scheme.

use bako_webauthn::PreparedAssertion;
use std::fmt;

/// The schemes a witness can carry.
///
/// Each kind has a fixed tag the predicate dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignatureKind {
    /// Passkey (P-256) signature with client data context.
    WebAuthn,
    /// Native secp256k1 signature.
    Fuel,
    /// EVM-style secp256k1 signature.
    Evm,
    /// Bare signature for legacy verifiers; never wrapped in the envelope.
    RawNoPrefix,
}

impl SignatureKind {
    /// Every kind.
    pub const ALL: [SignatureKind; 4] = [
        SignatureKind::WebAuthn,
        SignatureKind::Fuel,
        SignatureKind::Evm,
        SignatureKind::RawNoPrefix,
    ];

    /// The tag written after the magic prefix.
    pub const fn tag(self) -> u64 {
        match self {
            SignatureKind::WebAuthn => 0,
            SignatureKind::Fuel => 1,
            SignatureKind::Evm => 2,
            SignatureKind::RawNoPrefix => 9,
        }
    }

    /// Inverse of [`SignatureKind::tag`].
    pub const fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            0 => Some(SignatureKind::WebAuthn),
            1 => Some(SignatureKind::Fuel),
            2 => Some(SignatureKind::Evm),
            9 => Some(SignatureKind::RawNoPrefix),
            _ => None,
        }
    }

    /// Whether witnesses of this kind start with the `BAKO` envelope.
    pub const fn is_enveloped(self) -> bool {
        !matches!(self, SignatureKind::RawNoPrefix)
    }
}

impl fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignatureKind::WebAuthn => "webauthn",
            SignatureKind::Fuel => "fuel",
            SignatureKind::Evm => "evm",
            SignatureKind::RawNoPrefix => "raw",
        })
    }
}

/// The parts of a WebAuthn assertion the predicate needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAuthnEvidence {
    /// 64-byte compact signature with the recovery bit packed into S.
    pub signature: Vec<u8>,
    /// `clientDataJSON` before the challenge.
    pub prefix: Vec<u8>,
    /// `clientDataJSON` after the challenge.
    pub suffix: Vec<u8>,
    /// `authenticatorData`.
    pub authenticator_data: Vec<u8>,
}

impl From<PreparedAssertion> for WebAuthnEvidence {
    fn from(prepared: PreparedAssertion) -> Self {
        Self {
            signature: prepared.signature.to_vec(),
            prefix: prepared.prefix,
            suffix: prepared.suffix,
            authenticator_data: prepared.authenticator_data,
        }
    }
}

/// A signature ready to be serialized into a witness.
///
/// Evidence is built for one signing operation, encoded, and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureEvidence {
    /// Passkey signature.
    WebAuthn(WebAuthnEvidence),
    /// Native signature.
    Fuel {
        /// Compact `r || s` signature.
        signature: Vec<u8>,
    },
    /// EVM-style signature.
    Evm {
        /// Compact `r || s` signature.
        signature: Vec<u8>,
    },
    /// Signature for a legacy verifier, written verbatim.
    RawNoPrefix {
        /// Signature bytes.
        signature: Vec<u8>,
    },
}

impl SignatureEvidence {
    /// The kind of this evidence.
    pub fn kind(&self) -> SignatureKind {
        match self {
            SignatureEvidence::WebAuthn(_) => SignatureKind::WebAuthn,
            SignatureEvidence::Fuel { .. } => SignatureKind::Fuel,
            SignatureEvidence::Evm { .. } => SignatureKind::Evm,
            SignatureEvidence::RawNoPrefix { .. } => SignatureKind::RawNoPrefix,
        }
    }

    /// The signature bytes, whatever the kind.
    pub fn signature(&self) -> &[u8] {
        match self {
            SignatureEvidence::WebAuthn(evidence) => &evidence.signature,
            SignatureEvidence::Fuel { signature }
            | SignatureEvidence::Evm { signature }
            | SignatureEvidence::RawNoPrefix { signature } => signature,
        }
    }
}

impl From<PreparedAssertion> for SignatureEvidence {
    fn from(prepared: PreparedAssertion) -> Self {
        SignatureEvidence::WebAuthn(prepared.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in SignatureKind::ALL {
            assert_eq!(SignatureKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(SignatureKind::from_tag(3), None);
    }

    #[test]
    fn only_raw_skips_the_envelope() {
        let enveloped: Vec<_> = SignatureKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_enveloped())
            .collect();
        assert_eq!(enveloped, vec![SignatureKind::RawNoPrefix]);
    }
}
