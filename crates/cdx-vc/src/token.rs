//! # Token identifier derivation
//!
//! Maps a signed credential to its ERC-721 token id.
//!
//! ## Security Invariant
//!
//! The token id is Keccak-256 over the JCS canonical bytes of the COMPLETE
//! signed credential, proof included. This differs from the signing input
//! (proof detached) on purpose: the id commits to the signature itself, so
//! re-signing the same document produces a different token. The mapping is
//! a compatibility-critical boundary with deployed registry contracts —
//! any change strands minted tokens.

use thiserror::Error;

use cdx_core::{keccak256_digest, CanonicalBytes, CanonicalizationError, TokenId};

use crate::credential::VerifiableCredential;

/// Errors from token id derivation.
#[derive(Debug, Error)]
pub enum TokenIdError {
    /// The credential carries no usable proof.
    #[error("cannot derive a token id from an unsigned credential")]
    UnsignedCredential,

    /// The signed credential could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Derive the token id for a signed credential.
///
/// Deterministic: the same signed bytes always map to the same id.
pub fn derive_token_id(credential: &VerifiableCredential) -> Result<TokenId, TokenIdError> {
    if !credential.is_signed() {
        return Err(TokenIdError::UnsignedCredential);
    }

    let canonical = CanonicalBytes::new(credential)
        .map_err(TokenIdError::Canonicalization)?;
    let digest = keccak256_digest(&canonical);
    Ok(TokenId::from_bytes(digest.bytes))
}
