//! # Proof Signer Abstraction
//!
//! Abstracts Ed25519 key storage and proof signing behind a trait, so the
//! issuance pipeline never touches key material directly:
//!
//! - [`LocalSigner`]: in-memory key for development and testing.
//! - [`EnvSigner`]: loads key material from an environment variable
//!   (hex-encoded 32-byte Ed25519 seed). Suitable for container deployments
//!   where secrets are injected via environment.
//!
//! A signer also knows its verification method — the DID URL
//! (`did:web:example.com#keys-1`) that verifiers resolve to find the public
//! key. Binding the two here keeps "signed with key X, advertised as key Y"
//! mistakes out of issued credentials.
//!
//! ## Security Invariants
//!
//! - Signing input is `&CanonicalBytes` (never raw bytes).
//! - `ProofSigner` is `Send + Sync` for use across async tasks.
//! - Key material is zeroized on drop (`ed25519_dalek::SigningKey`).

use cdx_core::error::CryptoError;
use cdx_core::{hex, CanonicalBytes};

use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Trait for proof signing backends.
///
/// Implementations must be `Send + Sync` for use in multi-threaded async
/// runtimes. Signing input must be `&CanonicalBytes` to prevent signature
/// splits from non-canonical serialization.
pub trait ProofSigner: Send + Sync {
    /// Sign canonicalized data with the managed Ed25519 key.
    fn sign(&self, data: &CanonicalBytes) -> Result<Ed25519Signature, CryptoError>;

    /// Return the Ed25519 public key matching the signing key.
    fn public_key(&self) -> Result<Ed25519PublicKey, CryptoError>;

    /// The DID URL verifiers resolve to obtain the public key.
    fn verification_method(&self) -> &str;

    /// Human-readable name for this signer (for diagnostics/logging).
    fn signer_name(&self) -> &str;
}

// ─── LocalSigner ─────────────────────────────────────────────────────────

/// In-memory Ed25519 signer for development and testing.
///
/// Key material lives in process memory and is zeroized on drop.
pub struct LocalSigner {
    keypair: Ed25519KeyPair,
    verification_method: String,
}

impl LocalSigner {
    /// Create from an existing key pair.
    pub fn new(keypair: Ed25519KeyPair, verification_method: impl Into<String>) -> Self {
        Self {
            keypair,
            verification_method: verification_method.into(),
        }
    }

    /// Generate a new random key using the OS CSPRNG.
    pub fn generate(verification_method: impl Into<String>) -> Self {
        Self::new(Ed25519KeyPair::generate(), verification_method)
    }

    /// Create from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32], verification_method: impl Into<String>) -> Self {
        Self::new(Ed25519KeyPair::from_seed(seed), verification_method)
    }
}

impl ProofSigner for LocalSigner {
    fn sign(&self, data: &CanonicalBytes) -> Result<Ed25519Signature, CryptoError> {
        Ok(self.keypair.sign(data))
    }

    fn public_key(&self) -> Result<Ed25519PublicKey, CryptoError> {
        Ok(self.keypair.public_key())
    }

    fn verification_method(&self) -> &str {
        &self.verification_method
    }

    fn signer_name(&self) -> &str {
        "LocalSigner"
    }
}

// ─── EnvSigner ───────────────────────────────────────────────────────────

/// Loads an Ed25519 signing key from an environment variable.
///
/// The variable must contain a 64-character hex string encoding the
/// 32-byte Ed25519 seed. The key is loaded once at construction and held
/// in memory (zeroized on drop).
///
/// ## Example
///
/// ```bash
/// export CDX_SIGNING_KEY="deadbeef..."  # 64 hex chars
/// ```
pub struct EnvSigner {
    keypair: Ed25519KeyPair,
    verification_method: String,
    var_name: String,
}

impl EnvSigner {
    /// Load the signing key from the named environment variable.
    pub fn from_env(
        var_name: &str,
        verification_method: impl Into<String>,
    ) -> Result<Self, CryptoError> {
        let raw = std::env::var(var_name).map_err(|_| {
            CryptoError::KeyError(format!("environment variable {var_name} not set"))
        })?;

        let bytes = hex::hex_to_bytes(raw.trim())
            .map_err(|e| CryptoError::KeyError(format!("invalid hex in {var_name}: {e}")))?;
        let seed: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            CryptoError::KeyError(format!(
                "expected 32 bytes (64 hex chars) in {var_name}, got {} bytes",
                v.len()
            ))
        })?;

        Ok(Self {
            keypair: Ed25519KeyPair::from_seed(&seed),
            verification_method: verification_method.into(),
            var_name: var_name.to_string(),
        })
    }

    /// The environment variable name this signer was loaded from.
    pub fn var_name(&self) -> &str {
        &self.var_name
    }
}

impl ProofSigner for EnvSigner {
    fn sign(&self, data: &CanonicalBytes) -> Result<Ed25519Signature, CryptoError> {
        Ok(self.keypair.sign(data))
    }

    fn public_key(&self) -> Result<Ed25519PublicKey, CryptoError> {
        Ok(self.keypair.public_key())
    }

    fn verification_method(&self) -> &str {
        &self.verification_method
    }

    fn signer_name(&self) -> &str {
        "EnvSigner"
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────
