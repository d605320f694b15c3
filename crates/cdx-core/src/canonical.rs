//! # Canonical Serialization — JCS Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in signing and digest computation across the Chaindox Stack.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()` (or `from_value()`), which
//! rejects floats before applying RFC 8785 (JSON Canonicalization Scheme)
//! serialization.
//!
//! Token identifiers are derived by hashing a signed credential, and the same
//! credential must hash to the same `uint256` on every node that computes it.
//! Any function that signs or digests must therefore accept `&CanonicalBytes`,
//! and the only way to produce one is through this pipeline. A second, subtly
//! different serialization path cannot exist.
//!
//! ## Float Rejection
//!
//! JSON floats have serialization edge cases that differ between language
//! runtimes (exponent thresholds, shortest-representation rules). Monetary
//! amounts and indexes in credentials must be strings or integers; a float
//! anywhere in the value tree is a hard error, not a lossy coercion.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by RFC 8785 canonicalization with float
/// rejection.
///
/// # Invariants
///
/// - The only constructors are [`CanonicalBytes::new()`] and
///   [`CanonicalBytes::from_value()`].
/// - All numeric values are integers, never floats.
/// - Object keys are sorted, separators are compact, output is UTF-8.
///
/// The inner `Vec<u8>` is private, so downstream code cannot inject bytes
/// that skipped canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// All signing and digest computation in the stack flows through this
    /// constructor (or [`from_value`](Self::from_value) for values that are
    /// already JSON trees).
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains
    /// float numbers. Returns `CanonicalizationError::SerializationFailed`
    /// if JCS serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Construct canonical bytes from a JSON value tree.
    ///
    /// Used by callers that manipulate the tree before canonicalization,
    /// e.g. detaching a credential's `proof` member to recompute its
    /// signing input.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        let checked = reject_floats(value)?;
        let s = serde_jcs::to_string(&checked)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for signing or digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively walk a JSON value and reject floats.
///
/// - `null`, `bool`, `string`, `integer` — pass through unchanged.
/// - `float` (not representable as i64/u64) — rejected with `FloatRejected`.
/// - `object` / `array` — members recursed.
///
/// Keys are already strings in `serde_json::Map`, and Rust tuples serialize
/// as JSON arrays, so no further coercion is needed on this side. Datetime
/// normalization happens at the `Serialize` boundary via the `Timestamp`
/// type in this crate.
fn reject_floats(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut checked = serde_json::Map::new();
            for (k, v) in map {
                checked.insert(k, reject_floats(v)?);
            }
            Ok(Value::Object(checked))
        }
        Value::Array(arr) => {
            let checked: Result<Vec<_>, _> = arr.into_iter().map(reject_floats).collect();
            Ok(Value::Array(checked?))
        }
    }
}
