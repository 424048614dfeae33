//! Classification and witness encoding against the bundled catalog.

use bako_predicate::{
    Address, Bytes32, Catalog, CatalogError, PredicateAbi, PredicateVersion, VersionId,
    WalletOrigin,
};
use bako_signature::{
    BAKO_MAGIC, SignatureClassifier, SignatureCodec, SignatureError, SignatureEvidence,
    SignatureInput, SignatureKind, WebAuthnBundle, WebAuthnEvidence, decode_witness,
};
use bako_signature::evm::compact_signature;
use bako_webauthn::{Assertion, encode_challenge};
use k256::ecdsa::SigningKey as EvmSigningKey;
use p256::ecdsa::{DerSignature, SigningKey, signature::Signer as _};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sha2::{Digest, Sha256};
use testresult::TestResult;

const CONNECTOR_EVM: &str = "0xc44aee8c9b60729f0ed18b08eb9bf086a47eb365da641b2f703a80b428695a7a";

fn native_wallet() -> Address {
    Address::B256(Bytes32::new([0x11; 32]))
}

fn evm_wallet() -> Address {
    Address::Evm([0x22; 20])
}

fn svm_wallet() -> Address {
    Address::Svm(Bytes32::new([0x33; 32]))
}

fn bundle() -> SignatureInput {
    SignatureInput::WebAuthn(WebAuthnBundle {
        signature: vec![0x44; 64],
        prefix: b"{\"challenge\":\"".to_vec(),
        suffix: b"\"}".to_vec(),
        authenticator_data: vec![0x55; 37],
    })
}

#[test]
fn scenario_a_fuel_witness_bytes() -> TestResult {
    let codec = SignatureCodec::new();
    let witness = codec.encode(&SignatureEvidence::Fuel {
        signature: vec![0; 64],
    })?;

    let encoded = hex::encode(&witness);
    assert_eq!(encoded.len(), 152);
    assert_eq!(
        encoded,
        format!("42414b4f{}{}", "0000000000000001", "00".repeat(64))
    );

    Ok(())
}

#[test]
fn scenario_b_raw_witness_is_verbatim() -> TestResult {
    let codec = SignatureCodec::new();
    let witness = codec.encode(&SignatureEvidence::RawNoPrefix {
        signature: vec![0xde, 0xad, 0xbe, 0xef],
    })?;

    assert_eq!(witness, vec![0xde, 0xad, 0xbe, 0xef]);

    Ok(())
}

#[test_log::test]
fn wallet_shape_picks_the_kind() -> TestResult {
    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec);
    let signature = SignatureInput::from(vec![9u8; 64]);

    assert_eq!(
        classifier.classify(&native_wallet(), signature.clone(), None)?,
        SignatureEvidence::Fuel {
            signature: vec![9; 64]
        }
    );
    assert_eq!(
        classifier.classify(&evm_wallet(), signature.clone(), None)?,
        SignatureEvidence::Evm {
            signature: vec![9; 64]
        }
    );
    assert_eq!(
        classifier.classify(&svm_wallet(), signature, None),
        Err(SignatureError::UnsupportedOrigin {
            origin: WalletOrigin::Svm,
            address: svm_wallet(),
        })
    );

    Ok(())
}

#[test_log::test]
fn padded_evm_addresses_are_evm() -> TestResult {
    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec);

    let mut padded = [0u8; 32];
    padded[12..].copy_from_slice(&[0x22; 20]);
    let wallet = Address::B256(Bytes32::new(padded));

    let evidence = classifier.classify(&wallet, vec![1u8; 64].into(), None)?;
    assert_eq!(evidence.kind(), SignatureKind::Evm);

    Ok(())
}

#[test_log::test]
fn evm_wallet_signatures_are_compacted() -> TestResult {
    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec);

    let key = EvmSigningKey::from_bytes(&[3u8; 32].into())?;
    let (signature, recovery_id) = key.sign_prehash_recoverable(&[0x42; 32])?;
    let mut rsv = signature.to_bytes().to_vec();
    rsv.push(recovery_id.to_byte() + 27);

    let witness = classifier.encode(&evm_wallet(), rsv.clone().into(), None)?;
    assert_eq!(witness.len(), 12 + 64);
    assert_eq!(
        decode_witness(&witness)?,
        SignatureEvidence::Evm {
            signature: compact_signature(&rsv)?.to_vec()
        }
    );

    assert_eq!(
        classifier.encode(&evm_wallet(), vec![7u8; 65].into(), None),
        Err(SignatureError::InvalidRecoveryByte(7))
    );

    Ok(())
}

#[test_log::test]
fn enveloped_witnesses_need_compact_signatures() -> TestResult {
    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec);

    assert_eq!(
        classifier.encode(&native_wallet(), vec![7u8; 65].into(), None),
        Err(SignatureError::InvalidSignatureLength {
            kind: SignatureKind::Fuel,
            expected: 64,
            actual: 65,
        })
    );
    assert_eq!(
        classifier.encode(&evm_wallet(), vec![7u8; 63].into(), None),
        Err(SignatureError::InvalidSignatureLength {
            kind: SignatureKind::Evm,
            expected: 64,
            actual: 63,
        })
    );
    assert_eq!(
        codec.encode(&SignatureEvidence::Fuel {
            signature: vec![1, 2, 3]
        }),
        Err(SignatureError::InvalidSignatureLength {
            kind: SignatureKind::Fuel,
            expected: 64,
            actual: 3,
        })
    );

    Ok(())
}

#[test_log::test]
fn webauthn_bundles_win_over_wallet_shape() -> TestResult {
    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec);

    for wallet in [native_wallet(), evm_wallet(), svm_wallet()] {
        let evidence = classifier.classify(&wallet, bundle(), None)?;
        assert_eq!(
            evidence,
            SignatureEvidence::WebAuthn(WebAuthnEvidence {
                signature: vec![0x44; 64],
                prefix: b"{\"challenge\":\"".to_vec(),
                suffix: b"\"}".to_vec(),
                authenticator_data: vec![0x55; 37],
            })
        );
    }

    Ok(())
}

#[test_log::test]
fn legacy_versions_always_get_raw_witnesses() -> TestResult {
    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec);
    let legacy: VersionId = CONNECTOR_EVM.parse()?;

    let from_bundle = classifier.encode(&svm_wallet(), bundle(), Some(&legacy))?;
    assert_eq!(from_bundle, vec![0x44; 64]);

    let from_evm = classifier.encode(&evm_wallet(), vec![7u8; 65].into(), Some(&legacy))?;
    assert_eq!(from_evm, vec![7; 65]);

    let defaulted = SignatureClassifier::new(&catalog, &codec).with_default_version(legacy);
    assert_eq!(
        defaulted.classify(&native_wallet(), vec![1u8, 2].into(), None)?,
        SignatureEvidence::RawNoPrefix {
            signature: vec![1, 2]
        }
    );

    Ok(())
}

#[test_log::test]
fn unknown_versions_list_what_is_available() -> TestResult {
    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec);
    let unknown = VersionId::of_bytecode(b"never deployed");

    let error = classifier
        .classify(&native_wallet(), vec![0u8; 64].into(), Some(&unknown))
        .unwrap_err();

    assert!(matches!(
        &error,
        SignatureError::Catalog(CatalogError::PredicateVersionNotFound { id, available })
            if *id == unknown && available.len() == 5
    ));
    let message = error.to_string();
    assert!(message.contains(&unknown.to_string()));
    assert!(message.contains(CONNECTOR_EVM));

    Ok(())
}

#[test_log::test]
fn missing_encoders_surface_through_the_classifier() -> TestResult {
    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::empty();
    let classifier = SignatureClassifier::new(&catalog, &codec);

    assert_eq!(
        classifier.encode(&native_wallet(), vec![0u8; 64].into(), None),
        Err(SignatureError::EncoderNotFound(SignatureKind::Fuel))
    );

    Ok(())
}

#[test_log::test]
fn scenario_a_through_a_fuel_only_catalog() -> TestResult {
    let v1 = PredicateVersion::new(b"v1".to_vec(), PredicateAbi::default())
        .with_origins([WalletOrigin::Fuel]);
    let id = *v1.id();
    let catalog = Catalog::new(vec![v1])?.with_default(id);
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec).with_default_version(id);

    let witness = classifier.encode(&native_wallet(), vec![0u8; 64].into(), None)?;

    let mut expected = BAKO_MAGIC.to_vec();
    expected.extend_from_slice(&1u64.to_be_bytes());
    expected.extend_from_slice(&[0; 64]);
    assert_eq!(witness, expected);

    Ok(())
}

#[test_log::test]
fn batches_keep_their_order() -> TestResult {
    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec);

    let witnesses = classifier.encode_all(
        [
            (evm_wallet(), SignatureInput::from(vec![2u8; 64])),
            (native_wallet(), SignatureInput::from(vec![1u8; 64])),
            (svm_wallet(), bundle()),
        ],
        None,
    )?;

    let kinds: Vec<_> = witnesses
        .iter()
        .map(|w| decode_witness(w).map(|e| e.kind()))
        .collect::<Result<_, _>>()?;
    assert_eq!(
        kinds,
        vec![SignatureKind::Evm, SignatureKind::Fuel, SignatureKind::WebAuthn]
    );

    Ok(())
}

#[test]
fn loose_json_inputs_deserialize_to_the_right_shape() -> TestResult {
    let raw: SignatureInput = serde_json::from_str(r#""0xdeadbeef""#)?;
    assert_eq!(raw, SignatureInput::Raw(vec![0xde, 0xad, 0xbe, 0xef]));

    let wrapped: SignatureInput = serde_json::from_str(r#"{"signature":"0xdeadbeef"}"#)?;
    assert_eq!(wrapped.signature(), &[0xde, 0xad, 0xbe, 0xef]);
    assert!(!wrapped.is_webauthn());

    let webauthn: SignatureInput = serde_json::from_str(
        r#"{"signature":"0x01","prefix":"0x02","suffix":"0x03","authData":"0x04"}"#,
    )?;
    assert_eq!(
        webauthn,
        SignatureInput::WebAuthn(WebAuthnBundle {
            signature: vec![1],
            prefix: vec![2],
            suffix: vec![3],
            authenticator_data: vec![4],
        })
    );

    let partial = serde_json::from_str::<SignatureInput>(r#"{"signature":"0x01","prefix":"0x02"}"#);
    assert!(partial.is_err());

    Ok(())
}

#[test_log::test]
fn passkey_assertions_become_verifiable_witnesses() -> TestResult {
    let key = SigningKey::from_bytes(&[7u8; 32].into())?;
    let tx_id = [0xab; 32];
    let challenge = encode_challenge(&tx_id);
    let client_data_json = serde_json::to_vec(&serde_json::json!({
        "type": "webauthn.get",
        "challenge": challenge,
        "origin": "https://safe.bako.global",
    }))?;
    let mut authenticator_data = Sha256::digest(b"safe.bako.global").to_vec();
    authenticator_data.extend_from_slice(&[0x05, 0, 0, 0, 1]);

    let mut signed = authenticator_data.clone();
    signed.extend_from_slice(&Sha256::digest(&client_data_json));
    let der: DerSignature = key.sign(&signed);

    let prepared = Assertion::new(authenticator_data, client_data_json, der.to_bytes().to_vec())
        .prepare(challenge.as_bytes(), key.verifying_key())?;

    let catalog = Catalog::builtin()?;
    let codec = SignatureCodec::new();
    let classifier = SignatureClassifier::new(&catalog, &codec);
    let witness = classifier.encode(&native_wallet(), prepared.clone().into(), None)?;

    let SignatureEvidence::WebAuthn(evidence) = decode_witness(&witness)? else {
        panic!("expected a WebAuthn witness");
    };
    assert_eq!(evidence.signature, prepared.signature.to_vec());
    assert_eq!(evidence.prefix, prepared.prefix);
    assert_eq!(evidence.suffix, prepared.suffix);
    prepared.verify(challenge.as_bytes(), key.verifying_key())?;

    Ok(())
}

fn compact() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 64)
}

fn any_evidence() -> impl Strategy<Value = SignatureEvidence> {
    let bytes = |max: usize| proptest::collection::vec(any::<u8>(), 0..max);
    prop_oneof![
        (
            compact(),
            bytes(128),
            bytes(128),
            bytes(128)
        )
            .prop_map(|(signature, prefix, suffix, authenticator_data)| {
                SignatureEvidence::WebAuthn(WebAuthnEvidence {
                    signature,
                    prefix,
                    suffix,
                    authenticator_data,
                })
            }),
        compact().prop_map(|signature| SignatureEvidence::Fuel { signature }),
        compact().prop_map(|signature| SignatureEvidence::Evm { signature }),
        bytes(96).prop_map(|signature| SignatureEvidence::RawNoPrefix { signature }),
    ]
}

fn any_wallet() -> impl Strategy<Value = Address> {
    prop_oneof![
        any::<[u8; 32]>().prop_map(|bytes| Address::B256(Bytes32::new(bytes))),
        any::<[u8; 20]>().prop_map(Address::Evm),
    ]
}

fn any_input() -> impl Strategy<Value = SignatureInput> {
    let bytes = |max: usize| proptest::collection::vec(any::<u8>(), 0..max);
    prop_oneof![
        compact().prop_map(SignatureInput::from),
        (compact(), bytes(64), bytes(64), bytes(64)).prop_map(
            |(signature, prefix, suffix, authenticator_data)| {
                SignatureInput::WebAuthn(WebAuthnBundle {
                    signature,
                    prefix,
                    suffix,
                    authenticator_data,
                })
            }
        ),
    ]
}

proptest! {
    #[test]
    fn encoding_is_deterministic(evidence in any_evidence()) {
        let codec = SignatureCodec::new();
        prop_assert_eq!(codec.encode(&evidence).unwrap(), codec.encode(&evidence).unwrap());
    }

    #[test]
    fn classifying_and_encoding_is_deterministic(wallet in any_wallet(), input in any_input()) {
        let catalog = Catalog::builtin().unwrap();
        let codec = SignatureCodec::new();
        let classifier = SignatureClassifier::new(&catalog, &codec);

        let first = classifier.encode(&wallet, input.clone(), None).unwrap();
        let second = classifier.encode(&wallet, input.clone(), None).unwrap();
        prop_assert_eq!(&first, &second);
        let decoded = decode_witness(&first).unwrap();
        prop_assert_eq!(decoded.signature(), input.signature());
    }

    #[test]
    fn enveloped_witnesses_start_with_magic_and_tag(evidence in any_evidence()) {
        let witness = SignatureCodec::new().encode(&evidence).unwrap();
        let kind = evidence.kind();

        if kind == SignatureKind::RawNoPrefix {
            prop_assert_eq!(witness.as_slice(), evidence.signature());
        } else {
            prop_assert_eq!(&witness[..4], &BAKO_MAGIC[..]);
            prop_assert_eq!(&witness[4..12], &kind.tag().to_be_bytes()[..]);
        }
    }

    #[test]
    fn webauthn_length_fields_match_the_data(evidence in any_evidence()) {
        let SignatureEvidence::WebAuthn(inner) = &evidence else {
            return Ok(());
        };
        let witness = SignatureCodec::new().encode(&evidence).unwrap();

        let field = |at: usize| {
            let mut word = [0u8; 8];
            word.copy_from_slice(&witness[at..at + 8]);
            u64::from_be_bytes(word) as usize
        };
        prop_assert_eq!(field(76), inner.prefix.len());
        prop_assert_eq!(field(84), inner.suffix.len());
        prop_assert_eq!(field(92), inner.authenticator_data.len());
        prop_assert_eq!(witness.len(), 100 + inner.prefix.len() + inner.suffix.len() + inner.authenticator_data.len());
    }
}
