//! # cdx-crypto — Cryptographic Operations for the Chaindox Stack
//!
//! Ed25519 proof signing and verification, multibase verification-key
//! encoding for DID documents, and the AES-256-GCM remarks cipher.
//!
//! ## Design
//!
//! - All signing input is `&CanonicalBytes` from `cdx-core` — raw-byte
//!   signing does not exist in this crate's public API.
//! - The [`ProofSigner`] trait is the seam between the issuance pipeline
//!   and key custody. Production deployments inject key material via
//!   [`EnvSigner`]; tests use [`LocalSigner`].
//! - Key material zeroizes on drop and never implements `Serialize`.

pub mod ed25519;
pub mod multibase;
pub mod remarks;
pub mod signer;

pub use ed25519::{
    verify, verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature,
};
pub use multibase::{decode_multibase, encode_multibase, ED25519_MULTICODEC};
pub use remarks::{decrypt_remarks, encrypt_remarks, RemarksError, EMPTY_REMARKS_MARKER};
pub use signer::{EnvSigner, LocalSigner, ProofSigner};
