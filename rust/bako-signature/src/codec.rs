//! Witness encoding.

use crate::{
    error::SignatureError,
    evidence::{SignatureEvidence, SignatureKind, WebAuthnEvidence},
};
use bako_webauthn::COMPACT_SIGNATURE_LEN;
use std::collections::BTreeMap;

/// The four bytes every enveloped witness starts with (`"BAKO"`).
pub const BAKO_MAGIC: [u8; 4] = 0x4241_4B4F_u32.to_be_bytes();

const TAG_LEN: usize = 8;
const LENGTH_FIELD_LEN: usize = 8;
const HEADER_LEN: usize = BAKO_MAGIC.len() + TAG_LEN;

/// Serializes one kind of evidence into a complete witness.
pub type Encoder = fn(&SignatureEvidence) -> Result<Vec<u8>, SignatureError>;

const DEFAULT_ENCODERS: [(SignatureKind, Encoder); 4] = [
    (SignatureKind::WebAuthn, encode_webauthn),
    (SignatureKind::Fuel, encode_fuel),
    (SignatureKind::Evm, encode_evm),
    (SignatureKind::RawNoPrefix, encode_raw),
];

/// A table of encoders keyed by [`SignatureKind`].
///
/// [`SignatureCodec::new`] knows every kind. New schemes can be added with
/// [`SignatureCodec::register`] without touching the classifier.
#[derive(Debug, Clone)]
pub struct SignatureCodec {
    encoders: BTreeMap<SignatureKind, Encoder>,
}

impl Default for SignatureCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureCodec {
    /// A codec with the default encoder for every kind.
    pub fn new() -> Self {
        Self {
            encoders: DEFAULT_ENCODERS.into_iter().collect(),
        }
    }

    /// A codec with no encoders.
    pub fn empty() -> Self {
        Self {
            encoders: BTreeMap::new(),
        }
    }

    /// Install `encoder` for `kind`, returning the one it replaces.
    pub fn register(&mut self, kind: SignatureKind, encoder: Encoder) -> Option<Encoder> {
        self.encoders.insert(kind, encoder)
    }

    /// Whether an encoder is installed for `kind`.
    pub fn supports(&self, kind: SignatureKind) -> bool {
        self.encoders.contains_key(&kind)
    }

    /// Serialize `evidence` into witness bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::EncoderNotFound`] when the kind has no
    /// encoder, or whatever the encoder rejects.
    pub fn encode(&self, evidence: &SignatureEvidence) -> Result<Vec<u8>, SignatureError> {
        let kind = evidence.kind();
        let encoder = self
            .encoders
            .get(&kind)
            .ok_or(SignatureError::EncoderNotFound(kind))?;
        let witness = encoder(evidence)?;

        tracing::debug!(%kind, len = witness.len(), "encoded witness");

        Ok(witness)
    }

    /// Serialize a batch of evidence, one witness each, in order.
    ///
    /// Stops at the first failure.
    pub fn encode_all<'a>(
        &self,
        evidence: impl IntoIterator<Item = &'a SignatureEvidence>,
    ) -> Result<Vec<Vec<u8>>, SignatureError> {
        evidence.into_iter().map(|e| self.encode(e)).collect()
    }
}

fn envelope(kind: SignatureKind, payload_len: usize) -> Vec<u8> {
    let mut witness = Vec::with_capacity(HEADER_LEN + payload_len);
    witness.extend_from_slice(&BAKO_MAGIC);
    witness.extend_from_slice(&kind.tag().to_be_bytes());
    witness
}

fn encode_raw(evidence: &SignatureEvidence) -> Result<Vec<u8>, SignatureError> {
    match evidence {
        SignatureEvidence::RawNoPrefix { signature } => Ok(signature.clone()),
        other => Err(SignatureError::EvidenceMismatch {
            expected: SignatureKind::RawNoPrefix,
            found: other.kind(),
        }),
    }
}

fn encode_fuel(evidence: &SignatureEvidence) -> Result<Vec<u8>, SignatureError> {
    match evidence {
        SignatureEvidence::Fuel { signature } => encode_compact(SignatureKind::Fuel, signature),
        other => Err(SignatureError::EvidenceMismatch {
            expected: SignatureKind::Fuel,
            found: other.kind(),
        }),
    }
}

fn encode_evm(evidence: &SignatureEvidence) -> Result<Vec<u8>, SignatureError> {
    match evidence {
        SignatureEvidence::Evm { signature } => encode_compact(SignatureKind::Evm, signature),
        other => Err(SignatureError::EvidenceMismatch {
            expected: SignatureKind::Evm,
            found: other.kind(),
        }),
    }
}

fn check_compact(kind: SignatureKind, signature: &[u8]) -> Result<(), SignatureError> {
    if signature.len() != COMPACT_SIGNATURE_LEN {
        return Err(SignatureError::InvalidSignatureLength {
            kind,
            expected: COMPACT_SIGNATURE_LEN,
            actual: signature.len(),
        });
    }
    Ok(())
}

fn encode_compact(kind: SignatureKind, signature: &[u8]) -> Result<Vec<u8>, SignatureError> {
    check_compact(kind, signature)?;
    let mut witness = envelope(kind, COMPACT_SIGNATURE_LEN);
    witness.extend_from_slice(signature);
    Ok(witness)
}

fn encode_webauthn(evidence: &SignatureEvidence) -> Result<Vec<u8>, SignatureError> {
    let SignatureEvidence::WebAuthn(WebAuthnEvidence {
        signature,
        prefix,
        suffix,
        authenticator_data,
    }) = evidence
    else {
        return Err(SignatureError::EvidenceMismatch {
            expected: SignatureKind::WebAuthn,
            found: evidence.kind(),
        });
    };

    check_compact(SignatureKind::WebAuthn, signature)?;

    let payload_len = COMPACT_SIGNATURE_LEN
        + 3 * LENGTH_FIELD_LEN
        + prefix.len()
        + suffix.len()
        + authenticator_data.len();
    let mut witness = envelope(SignatureKind::WebAuthn, payload_len);
    witness.extend_from_slice(signature);
    for part in [prefix, suffix, authenticator_data] {
        witness.extend_from_slice(&(part.len() as u64).to_be_bytes());
    }
    for part in [prefix, suffix, authenticator_data] {
        witness.extend_from_slice(part);
    }

    Ok(witness)
}

/// Parse witness bytes back into evidence.
///
/// Bytes that do not start with [`BAKO_MAGIC`] are taken to be a raw
/// signature.
///
/// # Errors
///
/// Returns [`SignatureError::MalformedWitness`] for a truncated envelope, an
/// unknown tag, or length fields that disagree with the payload.
pub fn decode_witness(witness: &[u8]) -> Result<SignatureEvidence, SignatureError> {
    if !witness.starts_with(&BAKO_MAGIC) {
        return Ok(SignatureEvidence::RawNoPrefix {
            signature: witness.to_vec(),
        });
    }

    let mut reader = Reader::new(&witness[BAKO_MAGIC.len()..]);
    let tag = reader.read_u64()?;
    let evidence = match SignatureKind::from_tag(tag) {
        Some(SignatureKind::WebAuthn) => {
            let signature = reader.take(COMPACT_SIGNATURE_LEN)?.to_vec();
            let prefix_len = reader.read_len()?;
            let suffix_len = reader.read_len()?;
            let authenticator_data_len = reader.read_len()?;
            SignatureEvidence::WebAuthn(WebAuthnEvidence {
                signature,
                prefix: reader.take(prefix_len)?.to_vec(),
                suffix: reader.take(suffix_len)?.to_vec(),
                authenticator_data: reader.take(authenticator_data_len)?.to_vec(),
            })
        }
        Some(SignatureKind::Fuel) => SignatureEvidence::Fuel {
            signature: reader.take(COMPACT_SIGNATURE_LEN)?.to_vec(),
        },
        Some(SignatureKind::Evm) => SignatureEvidence::Evm {
            signature: reader.take(COMPACT_SIGNATURE_LEN)?.to_vec(),
        },
        // Raw signatures never carry the envelope.
        Some(SignatureKind::RawNoPrefix) | None => {
            return Err(SignatureError::MalformedWitness(format!(
                "unknown tag {tag}"
            )));
        }
    };

    if !reader.is_empty() {
        return Err(SignatureError::MalformedWitness(format!(
            "{} trailing bytes",
            reader.remaining()
        )));
    }

    Ok(evidence)
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], SignatureError> {
        if self.bytes.len() < len {
            return Err(SignatureError::MalformedWitness(format!(
                "needed {len} bytes, {} left",
                self.bytes.len()
            )));
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn read_u64(&mut self) -> Result<u64, SignatureError> {
        let mut word = [0u8; 8];
        word.copy_from_slice(self.take(8)?);
        Ok(u64::from_be_bytes(word))
    }

    fn read_len(&mut self) -> Result<usize, SignatureError> {
        let len = self.read_u64()?;
        usize::try_from(len)
            .map_err(|_| SignatureError::MalformedWitness(format!("length {len} out of range")))
    }

    fn remaining(&self) -> usize {
        self.bytes.len()
    }

    fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
