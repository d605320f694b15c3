//! # EVM Addresses — Validated Account and Contract Identifiers
//!
//! `EvmAddress` wraps the 20-byte account form used for registry contracts
//! and minting wallets. Construction validates shape (`0x` + 40 hex chars);
//! malformed addresses are rejected before any transaction is composed, not
//! when the chain bounces it back.

use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

use crate::hex;

/// Error parsing an EVM address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The `0x` prefix is required on address inputs.
    #[error("address must start with 0x: {0:?}")]
    MissingPrefix(String),

    /// Addresses are exactly 20 bytes (40 hex chars after the prefix).
    #[error("address must be 40 hex chars after 0x, got {got}")]
    InvalidLength {
        /// Number of hex chars found after the prefix.
        got: usize,
    },

    /// A non-hex character was found.
    #[error("address contains non-hex characters: {0:?}")]
    InvalidHex(String),
}

/// A validated 20-byte EVM address.
///
/// Serializes as `0x`-prefixed lowercase hex. Checksum casing (EIP-55) is
/// accepted on input and normalized to lowercase.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvmAddress([u8; 20]);

impl EvmAddress {
    /// Parse and validate an address string.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        if !s.starts_with("0x") && !s.starts_with("0X") {
            return Err(AddressError::MissingPrefix(s.to_string()));
        }
        let digits = &s[2..];
        if digits.len() != 40 {
            return Err(AddressError::InvalidLength { got: digits.len() });
        }
        let bytes = hex::hex_to_bytes(digits)
            .map_err(|_| AddressError::InvalidHex(s.to_string()))?;
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::bytes_to_hex_prefixed(&self.0)
    }

    /// Access the raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for EvmAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for EvmAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EvmAddress({})", self.to_hex())
    }
}

impl Serialize for EvmAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EvmAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
