//! Hex encoding helpers shared across the stack (no external hex crate
//! dependency).
//!
//! Chain-facing values travel as `0x`-prefixed lowercase hex: token
//! identifiers, registry addresses, calldata, encrypted remarks. The helpers
//! here are the single implementation all crates use.

use thiserror::Error;

/// Error decoding a hex string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// Hex strings must contain an even number of digits.
    #[error("hex string must have even length, got {0} chars")]
    OddLength(usize),

    /// A character outside `[0-9a-fA-F]` was encountered.
    #[error("invalid hex digit at position {position}")]
    InvalidDigit {
        /// Byte offset of the offending character.
        position: usize,
    },
}

/// Encode bytes as lowercase hex without a prefix.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string (with or without a `0x` prefix) into bytes.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, HexError> {
    let hex = strip_0x(hex);
    if hex.len() % 2 != 0 {
        return Err(HexError::OddLength(hex.len()));
    }
    let digits = hex.as_bytes();
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            std::str::from_utf8(&digits[i..i + 2])
                .ok()
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or(HexError::InvalidDigit { position: i })
        })
        .collect()
}

/// Strip a single leading `0x` or `0X` prefix, if present.
///
/// Composing prefixed values from already-prefixed fragments is a recurring
/// defect (a leading `0x0x…` is not parseable by chain tooling), so every
/// prefix-adding site strips first.
pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Encode bytes as `0x`-prefixed lowercase hex.
pub fn bytes_to_hex_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", bytes_to_hex(bytes))
}
