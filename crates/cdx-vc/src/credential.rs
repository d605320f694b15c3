//! # W3C Verifiable Credential envelope
//!
//! The credential model for trade documents: W3C VC Data Model v1.1 shape
//! with the TradeTrust extensions this stack relies on — `credentialStatus`
//! binding the document to a token registry, and `renderMethod` pointing at
//! a display template.
//!
//! ## Security Invariant
//!
//! All signing and verification paths canonicalize through
//! [`CanonicalBytes`](cdx_core::CanonicalBytes) (JCS, RFC 8785). The
//! signing input is the credential serialized WITHOUT its `proof` member;
//! the token identifier is derived WITH it. Two different byte strings, one
//! canonicalization rule.
//!
//! ## Design
//!
//! The envelope uses `deny_unknown_fields`: a credential carrying members
//! outside the modeled set fails to parse. Verification of external input
//! treats a parse failure as a fully-failed report rather than an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cdx_core::{CanonicalBytes, CanonicalizationError, EvmAddress};
use cdx_crypto::{verify_with_public_key, Ed25519PublicKey, Ed25519Signature, ProofSigner};

use crate::proof::{Proof, ProofType};

/// Errors from credential operations.
#[derive(Debug, Error)]
pub enum VcError {
    /// The credential body could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Signing failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Signature verification failed.
    #[error("verification failed: {0}")]
    VerificationFailed(String),

    /// The proof type is not supported by the built-in suite.
    #[error("unsupported proof type: {0}")]
    UnsupportedProofType(String),

    /// The credential has no proof attached.
    #[error("credential has no proof")]
    NoProof,

    /// The credential already carries a proof.
    #[error("credential already carries a proof")]
    ProofAlreadyAttached,

    /// The proof value is not valid hex-encoded signature bytes.
    #[error("invalid proof value: {0}")]
    InvalidProofValue(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of verifying a single proof.
#[derive(Debug, Clone, Serialize)]
pub struct ProofResult {
    /// The verification method the proof names.
    pub verification_method: String,
    /// Whether the signature checked out.
    pub ok: bool,
    /// Human-readable failure reason when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The `@context` member: a single URI or an ordered array of URIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Single(String),
    Array(Vec<String>),
}

impl ContextValue {
    /// All context URIs in declaration order.
    pub fn as_uris(&self) -> Vec<&str> {
        match self {
            ContextValue::Single(uri) => vec![uri.as_str()],
            ContextValue::Array(uris) => uris.iter().map(String::as_str).collect(),
        }
    }
}

/// The `type` member: a single type name or an array of type names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialTypeValue {
    Single(String),
    Array(Vec<String>),
}

impl CredentialTypeValue {
    /// Returns `true` if `VerifiableCredential` appears among the types.
    pub fn contains_vc_type(&self) -> bool {
        match self {
            CredentialTypeValue::Single(t) => t == "VerifiableCredential",
            CredentialTypeValue::Array(ts) => ts.iter().any(|t| t == "VerifiableCredential"),
        }
    }
}

/// The `credentialStatus` member, discriminated by its `type` field.
///
/// `TransferableRecords` binds the document to an on-chain token registry;
/// `BitstringStatusListEntry` points at an off-chain revocation bitstring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CredentialStatus {
    /// Token-registry binding for transferable documents.
    TransferableRecords {
        /// Currency / network label, e.g. `"XDC"` or `"MATIC"`.
        chain: String,
        /// EVM chain identifier.
        #[serde(rename = "chainId")]
        chain_id: u64,
        /// Address of the deployed token registry contract.
        #[serde(rename = "tokenRegistry")]
        token_registry: EvmAddress,
        /// JSON-RPC endpoint verifiers should use to reach the chain.
        #[serde(rename = "rpcProviderUrl")]
        rpc_provider_url: String,
    },

    /// Entry in a bitstring status list credential.
    BitstringStatusListEntry {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// What a set bit means, e.g. `"revocation"`.
        #[serde(rename = "statusPurpose")]
        status_purpose: String,
        /// Zero-based bit position within the list, as a decimal string.
        #[serde(rename = "statusListIndex")]
        status_list_index: String,
        /// URL of the status list credential.
        #[serde(rename = "statusListCredential")]
        status_list_credential: String,
    },
}

/// Host serving the generic document display templates.
pub const EMBEDDED_RENDERER_HOST: &str = "https://generic-templates.tradetrust.io";

/// Renderer type for template-driven display.
pub const EMBEDDED_RENDERER: &str = "EMBEDDED_RENDERER";

/// The `renderMethod` member: how the document should be displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderMethod {
    /// URL of the renderer host.
    pub id: String,

    #[serde(rename = "type")]
    pub render_type: String,

    /// Name of the template within the renderer.
    #[serde(rename = "templateName")]
    pub template_name: String,
}

impl RenderMethod {
    /// An embedded-renderer method for the named template, served from the
    /// generic templates host.
    pub fn embedded(template_name: impl Into<String>) -> Self {
        Self {
            id: EMBEDDED_RENDERER_HOST.to_string(),
            render_type: EMBEDDED_RENDERER.to_string(),
            template_name: template_name.into(),
        }
    }
}

/// A W3C Verifiable Credential carrying a trade document.
///
/// The envelope is rigid: unknown members are rejected at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifiableCredential {
    /// JSON-LD contexts.
    #[serde(rename = "@context")]
    pub context: ContextValue,

    /// Credential identifier, typically `urn:uuid:...`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Credential types. Must include `VerifiableCredential`.
    #[serde(rename = "type")]
    pub credential_type: CredentialTypeValue,

    /// The issuer DID, e.g. `did:web:chaindox.com`.
    pub issuer: String,

    /// When the credential was issued (UTC).
    #[serde(rename = "issuanceDate")]
    pub issuance_date: DateTime<Utc>,

    /// When the credential expires, if ever (UTC).
    #[serde(rename = "expirationDate", skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,

    /// The document payload. Shape is governed by the document's context.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: serde_json::Value,

    /// Status binding: token registry or bitstring list entry.
    #[serde(rename = "credentialStatus", skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,

    /// Display template binding.
    #[serde(rename = "renderMethod", skip_serializing_if = "Option::is_none")]
    pub render_method: Option<RenderMethod>,

    /// Cryptographic proof. `None` on an unsigned credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiableCredential {
    /// Compute the canonical signing input for this credential.
    ///
    /// Serializes the credential, removes the `proof` member, and
    /// JCS-canonicalizes the remainder. Used for both signing and
    /// verification so the two always agree on the bytes.
    pub fn signing_input(&self) -> Result<CanonicalBytes, VcError> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("proof");
        }
        Ok(CanonicalBytes::from_value(value)?)
    }

    /// Sign this credential with an Ed25519 signer, attaching the proof.
    ///
    /// Fails with [`VcError::ProofAlreadyAttached`] if the credential is
    /// already signed. Re-signing requires building a fresh credential.
    pub fn sign(&mut self, signer: &dyn ProofSigner) -> Result<(), VcError> {
        if self.proof.is_some() {
            return Err(VcError::ProofAlreadyAttached);
        }

        let input = self.signing_input()?;
        let signature = signer
            .sign(&input)
            .map_err(|e| VcError::SigningFailed(e.to_string()))?;

        self.proof = Some(Proof::new_ed25519(
            signer.verification_method().to_string(),
            signature.to_hex(),
            None,
        ));
        Ok(())
    }

    /// Returns `true` if the credential carries a structurally complete
    /// proof: present, with a non-empty proof value and verification method.
    ///
    /// Says nothing about whether the signature is cryptographically valid.
    pub fn is_signed(&self) -> bool {
        match &self.proof {
            Some(p) => !p.proof_value.is_empty() && !p.verification_method.is_empty(),
            None => false,
        }
    }

    /// Returns `true` if the credential has an expiration date in the past.
    pub fn is_expired(&self) -> bool {
        match self.expiration_date {
            Some(exp) => exp < Utc::now(),
            None => false,
        }
    }

    /// Verify the attached proof against a key resolved by the caller.
    ///
    /// `resolve_key` maps the proof's verification method to an Ed25519
    /// public key; returning `Err` fails the check with that reason. An
    /// expired credential fails verification before any cryptography runs.
    pub fn verify_proof(
        &self,
        resolve_key: impl Fn(&str) -> Result<Ed25519PublicKey, String>,
    ) -> ProofResult {
        let proof = match &self.proof {
            Some(p) => p,
            None => {
                return ProofResult {
                    verification_method: String::new(),
                    ok: false,
                    error: Some("credential has no proof".to_string()),
                }
            }
        };

        // Expiry short-circuits before any signature work.
        if self.is_expired() {
            return ProofResult {
                verification_method: proof.verification_method.clone(),
                ok: false,
                error: Some("credential has expired".to_string()),
            };
        }

        if !proof.proof_type.is_ed25519() {
            return ProofResult {
                verification_method: proof.verification_method.clone(),
                ok: false,
                error: Some(format!("unsupported proof type: {}", proof.proof_type)),
            };
        }

        let public_key = match resolve_key(&proof.verification_method) {
            Ok(pk) => pk,
            Err(e) => {
                return ProofResult {
                    verification_method: proof.verification_method.clone(),
                    ok: false,
                    error: Some(format!("key resolution failed: {e}")),
                }
            }
        };

        let input = match self.signing_input() {
            Ok(i) => i,
            Err(e) => {
                return ProofResult {
                    verification_method: proof.verification_method.clone(),
                    ok: false,
                    error: Some(format!("canonicalization failed: {e}")),
                }
            }
        };

        let signature = match Ed25519Signature::from_hex(&proof.proof_value) {
            Ok(s) => s,
            Err(e) => {
                return ProofResult {
                    verification_method: proof.verification_method.clone(),
                    ok: false,
                    error: Some(format!("invalid proof value: {e}")),
                }
            }
        };

        match verify_with_public_key(&input, &signature, &public_key) {
            Ok(()) => ProofResult {
                verification_method: proof.verification_method.clone(),
                ok: true,
                error: None,
            },
            Err(e) => ProofResult {
                verification_method: proof.verification_method.clone(),
                ok: false,
                error: Some(e.to_string()),
            },
        }
    }

    /// Verify the proof and convert a failed check into an error.
    pub fn ensure_valid(
        &self,
        resolve_key: impl Fn(&str) -> Result<Ed25519PublicKey, String>,
    ) -> Result<(), VcError> {
        let result = self.verify_proof(resolve_key);
        if result.ok {
            Ok(())
        } else {
            Err(VcError::VerificationFailed(
                result.error.unwrap_or_else(|| "unknown".to_string()),
            ))
        }
    }
}
