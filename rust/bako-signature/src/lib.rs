//! Witness encoding for Bako predicates.
//!
//! A predicate reads its signatures from transaction witnesses and parses
//! them positionally, so every signature scheme it supports needs one exact
//! byte layout. This crate owns those layouts:
//!
//! - [`SignatureCodec`] turns a [`SignatureEvidence`] into witness bytes
//! - [`SignatureClassifier`] decides which kind of evidence a signature is,
//!   given the signing wallet and the predicate version that will verify it
//!
//! # Witness format
//!
//! ```text
//! RawNoPrefix: signature
//! otherwise:   "BAKO" || be_u64(tag) || payload
//!
//! WebAuthn payload: signature (64)
//!                   || be_u64(len prefix) || be_u64(len suffix) || be_u64(len auth data)
//!                   || prefix || suffix || auth data
//! Fuel/Evm payload: signature
//! ```

mod classifier;
mod codec;
mod error;
pub mod evm;
mod evidence;
mod input;

pub use classifier::SignatureClassifier;
pub use codec::{BAKO_MAGIC, Encoder, SignatureCodec, decode_witness};
pub use error::SignatureError;
pub use evidence::{SignatureEvidence, SignatureKind, WebAuthnEvidence};
pub use input::{SignatureInput, WebAuthnBundle, WrappedSignature};
