//! # Bitstring status list codec
//!
//! A fixed-length bitstring where each issued credential owns one bit. Bit
//! value 0 means active; 1 means revoked or suspended, depending on the
//! list's purpose.
//!
//! ## Bit Ordering
//!
//! Index 0 is the leftmost bit: the most significant bit of byte 0. This is
//! the W3C Bitstring Status List ordering and is compatibility-critical —
//! verifiers in other stacks read the same encoded lists.
//!
//! ## Encoded Form
//!
//! Raw bitstring bytes, GZIP-compressed, Base64Url-encoded without padding,
//! prefixed with the multibase `u` marker. Decoding accepts the bare form
//! too: GZIP output begins `0x1f 0x8b`, which encodes as `H4sI`, so a
//! leading `u` is always the multibase prefix and never payload.

use std::io::{Read, Write};

use base64ct::{Base64UrlUnpadded, Encoding};
use bitvec::prelude::{BitVec, Msb0};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deployment default list length in bits (16 KiB of raw bitstring).
pub const DEFAULT_LIST_LENGTH: usize = 131_072;

/// Errors from status list operations.
#[derive(Debug, Error)]
pub enum StatusListError {
    /// List lengths must be positive multiples of 8.
    #[error("status list length must be a positive multiple of 8, got {got}")]
    InvalidLength { got: usize },

    /// The index does not fall within the list.
    #[error("status index {index} out of bounds for a {length}-bit list")]
    OutOfBounds { index: usize, length: usize },

    /// GZIP compression or decompression failed.
    #[error("gzip failed: {0}")]
    Gzip(#[from] std::io::Error),

    /// The encoded form is not valid unpadded base64url.
    #[error("invalid base64url payload: {0}")]
    Base64(String),

    /// The decoded list contains no bits.
    #[error("decoded status list is empty")]
    Empty,

    /// The status list credential's subject is missing or unreadable.
    #[error("malformed status list credential: {0}")]
    MalformedListCredential(String),
}

/// What a set bit means for credentials referencing this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPurpose {
    Revocation,
    Suspension,
}

impl StatusPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPurpose::Revocation => "revocation",
            StatusPurpose::Suspension => "suspension",
        }
    }
}

impl std::fmt::Display for StatusPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "revocation" => Ok(StatusPurpose::Revocation),
            "suspension" => Ok(StatusPurpose::Suspension),
            other => Err(format!("unknown status purpose: {other}")),
        }
    }
}

/// A fixed-length bitstring status list.
///
/// Lists are immutable snapshots in deployment: an admin edit produces a
/// new encoded list republished as a freshly signed credential. This type
/// is the in-memory working copy those snapshots are produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusList {
    bits: BitVec<u8, Msb0>,
}

impl StatusList {
    /// Create an all-zero list of the given bit length.
    pub fn new(length: usize) -> Result<Self, StatusListError> {
        if length == 0 || length % 8 != 0 {
            return Err(StatusListError::InvalidLength { got: length });
        }
        Ok(Self {
            bits: BitVec::repeat(false, length),
        })
    }

    /// Create an all-zero list at the deployment default length.
    pub fn with_default_length() -> Self {
        Self {
            bits: BitVec::repeat(false, DEFAULT_LIST_LENGTH),
        }
    }

    /// Length in bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Read the bit at `index`.
    pub fn get(&self, index: usize) -> Result<bool, StatusListError> {
        self.bits
            .get(index)
            .map(|b| *b)
            .ok_or(StatusListError::OutOfBounds {
                index,
                length: self.bits.len(),
            })
    }

    /// Write the bit at `index`.
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), StatusListError> {
        if index >= self.bits.len() {
            return Err(StatusListError::OutOfBounds {
                index,
                length: self.bits.len(),
            });
        }
        self.bits.set(index, value);
        Ok(())
    }

    /// Encode to the multibase form: `u` + base64url(gzip(raw bytes)).
    ///
    /// Deterministic: the same bits always produce the same string, so
    /// republished snapshots are reproducible for audit.
    pub fn encode(&self) -> Result<String, StatusListError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(self.bits.as_raw_slice())?;
        let compressed = encoder.finish()?;
        Ok(format!("u{}", Base64UrlUnpadded::encode_string(&compressed)))
    }

    /// Decode from the multibase form; the bare (unprefixed) form is also
    /// accepted.
    pub fn decode(encoded: &str) -> Result<Self, StatusListError> {
        let bare = encoded.strip_prefix('u').unwrap_or(encoded);
        let compressed = Base64UrlUnpadded::decode_vec(bare)
            .map_err(|e| StatusListError::Base64(e.to_string()))?;

        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut raw = Vec::new();
        decoder.read_to_end(&mut raw)?;

        if raw.is_empty() {
            return Err(StatusListError::Empty);
        }
        Ok(Self {
            bits: BitVec::from_vec(raw),
        })
    }
}
