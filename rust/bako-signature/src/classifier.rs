//! Decide which witness encoding a signature needs.

use crate::{
    codec::SignatureCodec,
    error::SignatureError,
    evm::{RSV_SIGNATURE_LEN, compact_signature},
    evidence::{SignatureEvidence, WebAuthnEvidence},
    input::SignatureInput,
};
use bako_predicate::{Address, Catalog, DEFAULT_PREDICATE_VERSION, VersionId, WalletOrigin};

/// Turns caller-supplied signatures into evidence the target predicate
/// version can read.
///
/// The decision depends on three things, checked in order:
///
/// 1. a legacy predicate version reads bare signatures only
/// 2. a signature with WebAuthn context is WebAuthn evidence
/// 3. otherwise the signing wallet's address decides between Fuel and Evm
#[derive(Debug, Clone)]
pub struct SignatureClassifier<'a> {
    catalog: &'a Catalog,
    codec: &'a SignatureCodec,
    default_version: VersionId,
}

impl<'a> SignatureClassifier<'a> {
    /// A classifier over `catalog` that encodes with `codec`.
    ///
    /// Signatures with no explicit version target
    /// [`DEFAULT_PREDICATE_VERSION`].
    pub fn new(catalog: &'a Catalog, codec: &'a SignatureCodec) -> Self {
        Self {
            catalog,
            codec,
            default_version: DEFAULT_PREDICATE_VERSION,
        }
    }

    /// Target `version` when none is given.
    pub fn with_default_version(mut self, version: VersionId) -> Self {
        self.default_version = version;
        self
    }

    /// Classify one signature made by `wallet`.
    ///
    /// # Errors
    ///
    /// Fails when the version is not in the catalog, when the wallet's
    /// origin has no encoding and the input carries no WebAuthn context, or
    /// when an `r || s || v` signature from an EVM wallet cannot be
    /// compacted.
    pub fn classify(
        &self,
        wallet: &Address,
        input: SignatureInput,
        version: Option<&VersionId>,
    ) -> Result<SignatureEvidence, SignatureError> {
        let version = self
            .catalog
            .get(version.unwrap_or(&self.default_version))?;

        if version.is_legacy() {
            tracing::debug!(version = %version.id(), %wallet, "legacy predicate, raw witness");
            return Ok(SignatureEvidence::RawNoPrefix {
                signature: input.into_signature(),
            });
        }

        let evidence = match input {
            SignatureInput::WebAuthn(bundle) => SignatureEvidence::WebAuthn(WebAuthnEvidence {
                signature: bundle.signature,
                prefix: bundle.prefix,
                suffix: bundle.suffix,
                authenticator_data: bundle.authenticator_data,
            }),
            other => match wallet.origin() {
                WalletOrigin::Fuel => SignatureEvidence::Fuel {
                    signature: other.into_signature(),
                },
                WalletOrigin::Evm => SignatureEvidence::Evm {
                    signature: evm_signature(other.into_signature())?,
                },
                origin => {
                    return Err(SignatureError::UnsupportedOrigin {
                        origin,
                        address: *wallet,
                    });
                }
            },
        };

        tracing::debug!(
            version = %version.id(),
            %wallet,
            kind = %evidence.kind(),
            "classified signature"
        );

        Ok(evidence)
    }

    /// Classify and encode one signature.
    pub fn encode(
        &self,
        wallet: &Address,
        input: SignatureInput,
        version: Option<&VersionId>,
    ) -> Result<Vec<u8>, SignatureError> {
        let evidence = self.classify(wallet, input, version)?;
        self.codec.encode(&evidence)
    }

    /// Classify and encode a batch of signatures against one version,
    /// preserving order.
    ///
    /// Stops at the first failure.
    pub fn encode_all(
        &self,
        signatures: impl IntoIterator<Item = (Address, SignatureInput)>,
        version: Option<&VersionId>,
    ) -> Result<Vec<Vec<u8>>, SignatureError> {
        signatures
            .into_iter()
            .map(|(wallet, input)| self.encode(&wallet, input, version))
            .collect()
    }
}

/// EVM wallets hand back `r || s || v`; the predicate reads the compact form.
fn evm_signature(signature: Vec<u8>) -> Result<Vec<u8>, SignatureError> {
    if signature.len() == RSV_SIGNATURE_LEN {
        return Ok(compact_signature(&signature)?.to_vec());
    }
    Ok(signature)
}
