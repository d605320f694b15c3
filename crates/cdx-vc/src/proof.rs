//! # Proof types for Verifiable Credentials
//!
//! Defines the cryptographic proof structure attached to credentials. The
//! proof object has rigid structure to prevent injection of unexpected
//! fields.
//!
//! ## Supported Proof Types
//!
//! - **Ed25519Signature2020** — the default suite. Ed25519 signatures over
//!   JCS-canonicalized credential bodies.
//! - **ecdsa-sd-2023** — recognized on parse (status list credentials from
//!   earlier deployments carry it) but not verifiable by the built-in
//!   suite; verification reports it as unsupported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cdx_core::Timestamp;

/// The type of cryptographic proof attached to a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    /// Ed25519 digital signature per W3C VC Data Integrity.
    Ed25519Signature2020,

    /// ECDSA selective-disclosure suite used by earlier status list
    /// deployments. Parsed but not verified here.
    #[serde(rename = "ecdsa-sd-2023")]
    EcdsaSd2023,
}

impl ProofType {
    /// Returns `true` if this is an Ed25519-based proof type.
    pub fn is_ed25519(&self) -> bool {
        matches!(self, ProofType::Ed25519Signature2020)
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofType::Ed25519Signature2020 => write!(f, "Ed25519Signature2020"),
            ProofType::EcdsaSd2023 => write!(f, "ecdsa-sd-2023"),
        }
    }
}

/// The purpose of a cryptographic proof.
///
/// Follows the W3C VC Data Integrity proof purpose vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the credential claims are true.
    AssertionMethod,
    /// Authentication of the credential holder.
    Authentication,
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofPurpose::AssertionMethod => write!(f, "assertionMethod"),
            ProofPurpose::Authentication => write!(f, "authentication"),
        }
    }
}

/// A cryptographic proof on a Verifiable Credential.
///
/// ## Security Invariant
///
/// The `proof_value` contains hex-encoded signature bytes computed over the
/// JCS-canonicalized credential body with the `proof` member excluded. The
/// canonicalization MUST use [`CanonicalBytes`](cdx_core::CanonicalBytes) —
/// never raw `serde_json::to_vec()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    /// The proof type.
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// When the proof was created (UTC, truncated to seconds).
    pub created: DateTime<Utc>,

    /// The verification method — a DID URL identifying the signing key.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    /// The purpose of this proof.
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: ProofPurpose,

    /// The proof value — hex-encoded signature bytes.
    ///
    /// For Ed25519: 64 bytes → 128 hex characters.
    #[serde(rename = "proofValue")]
    pub proof_value: String,
}

impl Proof {
    /// Create a new Ed25519Signature2020 proof.
    ///
    /// # Arguments
    ///
    /// * `verification_method` — DID URL of the signing key
    /// * `proof_value` — hex-encoded Ed25519 signature (128 hex chars)
    /// * `created` — optional creation timestamp; defaults to current UTC time
    pub fn new_ed25519(
        verification_method: String,
        proof_value: String,
        created: Option<Timestamp>,
    ) -> Self {
        let ts = created.unwrap_or_else(Timestamp::now);
        Self {
            proof_type: ProofType::Ed25519Signature2020,
            created: *ts.as_datetime(),
            verification_method,
            proof_purpose: ProofPurpose::AssertionMethod,
            proof_value,
        }
    }
}
