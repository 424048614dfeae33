//! The slice of a predicate's ABI this crate cares about: its configurables.
//!
//! Predicates are specialized per vault by overwriting "configurable"
//! constants in their bytecode. Each version declares the name and primitive
//! type of every configurable it reads, which lets a vault configuration be
//! checked against the exact layout the predicate expects.

use crate::bytes::Bytes32;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive types a predicate configurable may have.
///
/// In a manifest these are written as `"u64"`, `"bool"`, `"b256"` or
/// `{"array": {"element": ..., "length": n}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiType {
    /// 64-bit unsigned integer.
    U64,
    /// Boolean.
    Bool,
    /// 32-byte word.
    B256,
    /// Fixed-length array.
    Array {
        /// Type of every element.
        element: Box<AbiType>,
        /// Exact number of elements.
        length: usize,
    },
}

impl AbiType {
    /// Fixed-length array of `element`.
    pub fn array(element: AbiType, length: usize) -> Self {
        AbiType::Array {
            element: Box::new(element),
            length,
        }
    }

    /// Whether `value` is a valid instance of this type.
    pub fn accepts(&self, value: &ConfigurableValue) -> bool {
        match (self, value) {
            (AbiType::U64, ConfigurableValue::U64(_))
            | (AbiType::Bool, ConfigurableValue::Bool(_))
            | (AbiType::B256, ConfigurableValue::B256(_)) => true,
            (AbiType::Array { element, length }, ConfigurableValue::Array(values)) => {
                values.len() == *length && values.iter().all(|value| element.accepts(value))
            }
            _ => false,
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::U64 => f.write_str("u64"),
            AbiType::Bool => f.write_str("bool"),
            AbiType::B256 => f.write_str("b256"),
            AbiType::Array { element, length } => write!(f, "[{element}; {length}]"),
        }
    }
}

/// A concrete configurable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurableValue {
    /// 64-bit unsigned integer.
    U64(u64),
    /// Boolean.
    Bool(bool),
    /// 32-byte word.
    B256(Bytes32),
    /// Array of values.
    Array(Vec<ConfigurableValue>),
}

impl ConfigurableValue {
    /// Short description of the value's shape, for error messages.
    pub fn kind(&self) -> String {
        match self {
            ConfigurableValue::U64(_) => "u64".into(),
            ConfigurableValue::Bool(_) => "bool".into(),
            ConfigurableValue::B256(_) => "b256".into(),
            ConfigurableValue::Array(values) => match values.first() {
                Some(first) => format!("[{}; {}]", first.kind(), values.len()),
                None => "[]".into(),
            },
        }
    }
}

/// A single named configurable declared by a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configurable {
    /// Constant name, e.g. `SIGNERS`.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: AbiType,
}

/// The configurable section of a predicate ABI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateAbi {
    /// Declared configurables, in ABI order.
    #[serde(default)]
    pub configurables: Vec<Configurable>,
}

impl PredicateAbi {
    /// Build an ABI from `(name, type)` pairs.
    pub fn new<N: Into<String>>(configurables: impl IntoIterator<Item = (N, AbiType)>) -> Self {
        Self {
            configurables: configurables
                .into_iter()
                .map(|(name, ty)| Configurable {
                    name: name.into(),
                    ty,
                })
                .collect(),
        }
    }

    /// Look up the declared type of a configurable.
    pub fn get(&self, name: &str) -> Option<&AbiType> {
        self.configurables
            .iter()
            .find(|configurable| configurable.name == name)
            .map(|configurable| &configurable.ty)
    }
}
