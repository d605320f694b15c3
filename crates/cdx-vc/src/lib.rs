//! # cdx-vc — Verifiable Credentials for the Chaindox Stack
//!
//! Implements the W3C Verifiable Credentials Data Model adapted for
//! transferable trade documents. Provides:
//!
//! - **Credential structure** ([`VerifiableCredential`]) with typed envelope,
//!   chain-binding credential status, render method, and a single proof.
//! - **Ed25519 proof generation and verification** using the cryptographic
//!   primitives from `cdx-crypto`.
//! - **Document construction** ([`DocumentBuilder`]) from the document-type
//!   registry, with schema-first context ordering.
//! - **Token identifier derivation** ([`derive_token_id`]) mapping signed
//!   credentials to ERC-721 token ids.
//! - **DID documents** ([`DidDocument`]) for `did:web` issuer identity.
//!
//! ## Security Invariants
//!
//! - All proof computation uses [`CanonicalBytes`](cdx_core::CanonicalBytes)
//!   for payload canonicalization — never raw `serde_json::to_vec()`.
//! - Proof objects and the credential envelope have rigid structure
//!   (`deny_unknown_fields`) to prevent injection of unexpected members.
//! - The token id commits to the complete signed credential, proof included;
//!   the signing input detaches the proof. Both run through the same JCS
//!   canonicalization.

pub mod builder;
pub mod credential;
pub mod did;
pub mod document_type;
pub mod proof;
pub mod token;

// Re-export primary types.
pub use builder::{
    BuildError, ChainBinding, DocumentBuilder, DocumentTemplate, DEFAULT_EXPIRY_MONTHS,
};
pub use credential::{
    ContextValue, CredentialStatus, CredentialTypeValue, ProofResult, RenderMethod, VcError,
    VerifiableCredential, EMBEDDED_RENDERER, EMBEDDED_RENDERER_HOST,
};
pub use did::{
    did_web_to_url, split_did_url, DidDocument, DidError, VerificationMethod, DID_CONTEXT,
    MULTIKEY_CONTEXT,
};
pub use document_type::{DocumentType, UnknownDocumentType, ATTACHMENTS_CONTEXT};
pub use proof::{Proof, ProofPurpose, ProofType};
pub use token::{derive_token_id, TokenIdError};
