//! # Multibase Verification Keys
//!
//! DID documents publish Ed25519 public keys as `publicKeyMultibase`
//! strings: the multicodec prefix `0xed 0x01` followed by the 32 key
//! bytes, base58btc-encoded, with a leading `z` base marker (the W3C
//! Multikey form).
//!
//! Encoding is used when emitting the issuer's DID document; decoding is
//! the verifier's path from a resolved verification method back to a
//! usable key.

use cdx_core::error::CryptoError;

use crate::ed25519::Ed25519PublicKey;

/// Multicodec prefix identifying an Ed25519 public key.
pub const ED25519_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// Encode an Ed25519 public key as a `publicKeyMultibase` string.
pub fn encode_multibase(key: &Ed25519PublicKey) -> String {
    let mut bytes = Vec::with_capacity(2 + 32);
    bytes.extend_from_slice(&ED25519_MULTICODEC);
    bytes.extend_from_slice(key.as_bytes());
    format!("z{}", bs58::encode(bytes).into_string())
}

/// Decode a `publicKeyMultibase` string into an Ed25519 public key.
///
/// # Errors
///
/// Rejects inputs without the `z` base58btc marker, with a multicodec
/// prefix other than Ed25519, or whose payload is not exactly 32 bytes.
pub fn decode_multibase(s: &str) -> Result<Ed25519PublicKey, CryptoError> {
    let encoded = s
        .strip_prefix('z')
        .ok_or_else(|| CryptoError::KeyError(format!("unsupported multibase prefix: {s:?}")))?;

    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| CryptoError::KeyError(format!("invalid base58btc: {e}")))?;

    if bytes.len() < 2 || bytes[0..2] != ED25519_MULTICODEC {
        return Err(CryptoError::KeyError(
            "multicodec prefix is not Ed25519 (0xed01)".to_string(),
        ));
    }
    if bytes.len() - 2 != 32 {
        return Err(CryptoError::KeyError(format!(
            "Ed25519 key payload must be 32 bytes, got {}",
            bytes.len() - 2
        )));
    }

    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes[2..]);
    Ok(Ed25519PublicKey::from_bytes(arr))
}
