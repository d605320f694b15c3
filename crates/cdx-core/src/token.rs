//! # Token Identifier — On-Chain Credential Handle
//!
//! A `TokenId` is the 32-byte value under which a signed credential is
//! minted on the EVM token registry (`uint256` on chain, `0x`-prefixed hex
//! off chain).
//!
//! The value itself is produced by hashing the signed credential's canonical
//! bytes; that derivation lives with the credential model. This module only
//! defines the identifier type and its wire format.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::CdxError;
use crate::hex;

/// A 32-byte on-chain token identifier.
///
/// Serializes as `0x`-prefixed lowercase hex (66 chars), the form chain
/// tooling and registry contracts expect.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId([u8; 32]);

impl TokenId {
    /// Wrap raw digest bytes as a token identifier.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from hex, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless the input decodes to exactly
    /// 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, CdxError> {
        let bytes = hex::hex_to_bytes(s)
            .map_err(|e| CdxError::Validation(format!("invalid token id hex: {e}")))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            CdxError::Validation(format!("token id must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::bytes_to_hex_prefixed(&self.0)
    }

    /// Access the raw 32 bytes (big-endian `uint256`).
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenId({})", self.to_hex())
    }
}

impl Serialize for TokenId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
