//! # Remarks Cipher — Confidential Annotations on Minted Tokens
//!
//! Free-text remarks accompany a mint transaction on the public chain, so
//! they are encrypted before submission. The symmetric key is derived from
//! the credential identifier (SHA-256 of the id string): any holder of the
//! credential document can decrypt the remarks, nobody else can correlate
//! them across tokens.
//!
//! ## Wire Format
//!
//! `0x` + hex(nonce ‖ ciphertext), with a fresh random 12-byte AES-256-GCM
//! nonce per encryption. The GCM tag rides at the end of the ciphertext.
//!
//! Absent or empty remarks map to the canonical marker [`EMPTY_REMARKS_MARKER`]
//! (`"0x00"`) — a single explicit zero byte, never an empty string. Chain
//! tooling treats `""` and `"0x"` inconsistently as calldata; the marker is
//! unambiguous in both directions. Decryption accepts the legacy bare `"0x"`
//! for records minted before the marker was introduced.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

use cdx_core::hex;

/// Canonical encoding of empty remarks: one explicit zero byte.
pub const EMPTY_REMARKS_MARKER: &str = "0x00";

const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

/// Error in remarks encryption or decryption.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemarksError {
    /// AES-256-GCM encryption failed.
    #[error("remarks encryption failed")]
    EncryptionFailed,

    /// Authentication failed: wrong credential id or tampered ciphertext.
    #[error("remarks decryption failed (wrong credential id or tampered ciphertext)")]
    DecryptionFailed,

    /// The encoded string is not valid `0x`-prefixed hex of sufficient length.
    #[error("invalid remarks encoding: {0}")]
    InvalidEncoding(String),

    /// Decrypted bytes were not valid UTF-8.
    #[error("decrypted remarks are not valid UTF-8")]
    InvalidUtf8,
}

/// Derive the AES-256 key for a credential's remarks.
///
/// SHA-256 over the credential id string. The id is a `urn:uuid:` value
/// unique per credential, so keys never repeat across documents.
fn derive_key(credential_id: &str) -> Zeroizing<[u8; 32]> {
    let digest = Sha256::digest(credential_id.as_bytes());
    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&digest);
    key
}

/// Encrypt remarks under a key derived from the credential id.
///
/// Empty input returns [`EMPTY_REMARKS_MARKER`] without touching the
/// cipher. Non-empty input produces `0x` + hex(nonce ‖ ciphertext) with a
/// fresh random nonce, so the same remarks encrypt differently each call.
pub fn encrypt_remarks(plaintext: &str, credential_id: &str) -> Result<String, RemarksError> {
    if plaintext.is_empty() {
        return Ok(EMPTY_REMARKS_MARKER.to_string());
    }

    let key = derive_key(credential_id);
    let cipher =
        Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| RemarksError::EncryptionFailed)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| RemarksError::EncryptionFailed)?;

    // Compose from raw bytes: a pre-prefixed fragment can never sneak in
    // and produce "0x0x…".
    let mut payload = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    payload.extend_from_slice(&nonce_bytes);
    payload.extend_from_slice(&ciphertext);
    Ok(hex::bytes_to_hex_prefixed(&payload))
}

/// Decrypt remarks previously produced by [`encrypt_remarks`].
///
/// The empty markers (`"0x00"`, legacy `"0x"`, or an empty string) decode
/// to the empty string.
pub fn decrypt_remarks(encoded: &str, credential_id: &str) -> Result<String, RemarksError> {
    let encoded = encoded.trim();
    if encoded.is_empty() || encoded == "0x" || encoded == EMPTY_REMARKS_MARKER {
        return Ok(String::new());
    }

    let bytes = hex::hex_to_bytes(encoded)
        .map_err(|e| RemarksError::InvalidEncoding(e.to_string()))?;
    if bytes.len() < NONCE_SIZE + TAG_SIZE {
        return Err(RemarksError::InvalidEncoding(format!(
            "payload too short: {} bytes",
            bytes.len()
        )));
    }

    let key = derive_key(credential_id);
    let cipher =
        Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| RemarksError::DecryptionFailed)?;

    let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_SIZE);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| RemarksError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| RemarksError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREDENTIAL_ID: &str = "urn:uuid:0f1a2b3c-4d5e-6f70-8192-a3b4c5d6e7f8";

    #[test]
    fn test_roundtrip() {
        let encrypted = encrypt_remarks("Shipped via Rotterdam", CREDENTIAL_ID).unwrap();
        assert!(encrypted.starts_with("0x"));
        let decrypted = decrypt_remarks(&encrypted, CREDENTIAL_ID).unwrap();
        assert_eq!(decrypted, "Shipped via Rotterdam");
    }

    #[test]
    fn test_empty_remarks_canonical_marker() {
        let encrypted = encrypt_remarks("", CREDENTIAL_ID).unwrap();
        assert_eq!(encrypted, "0x00");
        assert_ne!(encrypted, "");
    }

    #[test]
    fn test_marker_decrypts_to_empty() {
        assert_eq!(decrypt_remarks("0x00", CREDENTIAL_ID).unwrap(), "");
    }

    #[test]
    fn test_legacy_bare_prefix_decrypts_to_empty() {
        assert_eq!(decrypt_remarks("0x", CREDENTIAL_ID).unwrap(), "");
        assert_eq!(decrypt_remarks("", CREDENTIAL_ID).unwrap(), "");
    }

    #[test]
    fn test_wrong_credential_id_fails() {
        let encrypted = encrypt_remarks("confidential", CREDENTIAL_ID).unwrap();
        let result = decrypt_remarks(&encrypted, "urn:uuid:another-credential");
        assert_eq!(result, Err(RemarksError::DecryptionFailed));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let encrypted = encrypt_remarks("confidential", CREDENTIAL_ID).unwrap();
        let mut bytes = cdx_core::hex::hex_to_bytes(&encrypted).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = cdx_core::hex::bytes_to_hex_prefixed(&bytes);
        assert_eq!(
            decrypt_remarks(&tampered, CREDENTIAL_ID),
            Err(RemarksError::DecryptionFailed)
        );
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let a = encrypt_remarks("same text", CREDENTIAL_ID).unwrap();
        let b = encrypt_remarks("same text", CREDENTIAL_ID).unwrap();
        assert_ne!(a, b);
        // Both still decrypt to the same plaintext.
        assert_eq!(decrypt_remarks(&a, CREDENTIAL_ID).unwrap(), "same text");
        assert_eq!(decrypt_remarks(&b, CREDENTIAL_ID).unwrap(), "same text");
    }

    #[test]
    fn test_never_double_prefixed() {
        let encrypted = encrypt_remarks("payload", CREDENTIAL_ID).unwrap();
        assert!(encrypted.starts_with("0x"));
        assert!(!encrypted[2..].starts_with("0x"));
    }

    #[test]
    fn test_unicode_remarks() {
        let text = "取引条件: FOB 上海 — très confidentiel";
        let encrypted = encrypt_remarks(text, CREDENTIAL_ID).unwrap();
        assert_eq!(decrypt_remarks(&encrypted, CREDENTIAL_ID).unwrap(), text);
    }

    #[test]
    fn test_truncated_payload_rejected() {
        assert!(matches!(
            decrypt_remarks("0xdeadbeef", CREDENTIAL_ID),
            Err(RemarksError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_non_hex_rejected() {
        assert!(matches!(
            decrypt_remarks("0xnothex", CREDENTIAL_ID),
            Err(RemarksError::InvalidEncoding(_))
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Round-trips for arbitrary plaintexts and credential ids.
        #[test]
        fn roundtrip(plaintext in ".{1,200}", id in "[a-z0-9:-]{1,60}") {
            let encrypted = encrypt_remarks(&plaintext, &id).unwrap();
            prop_assert!(encrypted.starts_with("0x"));
            let decrypted = decrypt_remarks(&encrypted, &id).unwrap();
            prop_assert_eq!(decrypted, plaintext);
        }

        /// A different credential id never decrypts successfully.
        #[test]
        fn wrong_id_rejected(plaintext in ".{1,80}", id in "[a-z]{4,20}") {
            let encrypted = encrypt_remarks(&plaintext, &id).unwrap();
            let other = format!("{id}-other");
            prop_assert!(decrypt_remarks(&encrypted, &other).is_err());
        }
    }
}
