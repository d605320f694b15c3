//! # Content Digests — SHA-256 and Keccak-256
//!
//! Defines `ContentDigest` and `DigestAlgorithm` for content-addressed
//! identifiers in the Chaindox Stack.
//!
//! ## Security Invariant
//!
//! A `ContentDigest` can only be computed from `CanonicalBytes`, so every
//! content digest in the system is produced through the canonicalization
//! pipeline. This is enforced by the signatures of [`sha256_digest()`] and
//! [`keccak256_digest()`].
//!
//! Keccak-256 exists because the token registry is an EVM contract: the
//! on-chain token identifier is the chain-native hash of the signed
//! credential. SHA-256 covers everything off-chain (remarks key derivation,
//! audit fingerprints).
//!
//! [`keccak256_bytes()`] is the one raw-byte escape hatch, reserved for EVM
//! ABI material (function selectors are hashes of signature strings, not of
//! canonical JSON). It returns a bare array, not a `ContentDigest`, so it
//! cannot masquerade as a content identifier.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::canonical::CanonicalBytes;

/// The hash algorithm used to produce a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256 — off-chain content addressing and key derivation.
    Sha256,
    /// Keccak-256 — EVM-native hashing for on-chain token identifiers.
    Keccak256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Keccak256 => "keccak256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content-addressed digest with its algorithm tag.
///
/// Produced exclusively from `CanonicalBytes` via [`sha256_digest()`] or
/// [`keccak256_digest()`]. The 32-byte digest and algorithm tag together
/// form a self-describing content identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a content digest from raw bytes and algorithm.
    ///
    /// Prefer [`sha256_digest()`] / [`keccak256_digest()`] which enforce the
    /// canonical-bytes construction path.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string (no prefix).
    pub fn to_hex(&self) -> String {
        crate::hex::bytes_to_hex(&self.bytes)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// Accepts only `&CanonicalBytes`, not raw `&[u8]`. This compile-time
/// constraint prevents any code path from digesting non-canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute a SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Compute a Keccak-256 content digest from canonical bytes.
///
/// This is the token identifier path: the EVM registry stores tokens under
/// the Keccak-256 hash of the signed credential's canonical bytes, read as
/// a `uint256`.
pub fn keccak256_digest(data: &CanonicalBytes) -> ContentDigest {
    ContentDigest::new(DigestAlgorithm::Keccak256, keccak256_bytes(data.as_bytes()))
}

/// Compute Keccak-256 over raw bytes.
///
/// For EVM ABI material only (function selectors hash signature strings such
/// as `"ownerOf(uint256)"`). Content digests must go through
/// [`keccak256_digest()`] instead.
pub fn keccak256_bytes(data: &[u8]) -> [u8; 32] {
    let hash = Keccak256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    bytes
}
