//! # DID documents for did:web issuers
//!
//! The issuer identity model: a `did:web` DID document publishing Ed25519
//! keys as Multikey verification methods. Covers both directions — emitting
//! a document for an issuer domain, and resolving a DID to the well-known
//! URL its document is served from.
//!
//! Unlike the credential envelope, the DID document parser tolerates
//! unknown members: documents in the wild carry `service` entries and
//! vendor extensions this stack has no use for.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// DID core context.
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Multikey suite context.
pub const MULTIKEY_CONTEXT: &str = "https://w3id.org/security/multikey/v1";

/// Errors from DID handling.
#[derive(Debug, Error)]
pub enum DidError {
    /// The DID uses a method other than `did:web`.
    #[error("unsupported DID method: {0}")]
    UnsupportedMethod(String),

    /// The DID string is not structurally valid.
    #[error("malformed DID: {0}")]
    Malformed(String),
}

/// A verification method entry: one published public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// DID URL of this key, e.g. `did:web:chaindox.com#keys-1`.
    pub id: String,

    /// Always `"Multikey"` for keys this stack emits.
    #[serde(rename = "type")]
    pub method_type: String,

    /// The controlling DID.
    pub controller: String,

    /// Multibase-encoded public key (`z` + base58btc of multicodec bytes).
    #[serde(rename = "publicKeyMultibase")]
    pub public_key_multibase: String,
}

/// A DID document.
///
/// Relationship arrays hold DID URL references (absolute or `#fragment`
/// relative) into `verificationMethod`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidDocument {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// The DID this document describes.
    pub id: String,

    #[serde(rename = "verificationMethod", default)]
    pub verification_method: Vec<VerificationMethod>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<String>,

    #[serde(rename = "assertionMethod", default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<String>,

    #[serde(
        rename = "capabilityInvocation",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub capability_invocation: Vec<String>,

    #[serde(
        rename = "capabilityDelegation",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub capability_delegation: Vec<String>,
}

impl DidDocument {
    /// Build the document for a `did:web` issuer domain with a single
    /// Multikey authorized for every relationship.
    ///
    /// The key id is `did:web:<domain>#keys-1`.
    pub fn for_web_issuer(domain: &str, public_key_multibase: &str) -> Self {
        let did = format!("did:web:{domain}");
        let key_id = format!("{did}#keys-1");
        Self {
            context: vec![DID_CONTEXT.to_string(), MULTIKEY_CONTEXT.to_string()],
            id: did.clone(),
            verification_method: vec![VerificationMethod {
                id: key_id.clone(),
                method_type: "Multikey".to_string(),
                controller: did,
                public_key_multibase: public_key_multibase.to_string(),
            }],
            authentication: vec![key_id.clone()],
            assertion_method: vec![key_id.clone()],
            capability_invocation: vec![key_id.clone()],
            capability_delegation: vec![key_id],
        }
    }

    /// Look up a verification method by DID URL.
    ///
    /// Accepts documents that publish relative `#fragment` method ids.
    pub fn find_verification_method(&self, method_id: &str) -> Option<&VerificationMethod> {
        self.verification_method.iter().find(|vm| {
            vm.id == method_id
                || (vm.id.starts_with('#')
                    && method_id
                        .strip_prefix(&self.id)
                        .is_some_and(|frag| frag == vm.id))
        })
    }

    /// True if the method id is authorized under `assertionMethod`.
    pub fn authorizes_assertion(&self, method_id: &str) -> bool {
        self.assertion_method.iter().any(|entry| {
            entry == method_id
                || (entry.starts_with('#')
                    && method_id
                        .strip_prefix(&self.id)
                        .is_some_and(|frag| frag == entry))
        })
    }
}

/// Split a DID URL into its DID part and optional fragment.
pub fn split_did_url(did_url: &str) -> (&str, Option<&str>) {
    match did_url.split_once('#') {
        Some((did, fragment)) => (did, Some(fragment)),
        None => (did_url, None),
    }
}

/// Resolve a `did:web` DID to the HTTPS URL of its DID document.
///
/// `did:web:example.com` maps to the well-known location
/// `https://example.com/.well-known/did.json`; additional colon-separated
/// segments become a path with `did.json` appended. `%3A` in the host
/// segment decodes to `:` for nonstandard ports.
///
/// # Errors
///
/// [`DidError::UnsupportedMethod`] for any method other than `web`;
/// [`DidError::Malformed`] for structurally broken DIDs.
pub fn did_web_to_url(did: &str) -> Result<String, DidError> {
    let (did, _fragment) = split_did_url(did);

    let rest = match did.strip_prefix("did:web:") {
        Some(rest) => rest,
        None => {
            let mut parts = did.splitn(3, ':');
            match (parts.next(), parts.next()) {
                (Some("did"), Some(method)) if !method.is_empty() => {
                    return Err(DidError::UnsupportedMethod(method.to_string()));
                }
                _ => return Err(DidError::Malformed(did.to_string())),
            }
        }
    };

    if rest.is_empty() {
        return Err(DidError::Malformed(did.to_string()));
    }

    let mut segments = rest.split(':');
    let host = segments
        .next()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| DidError::Malformed(did.to_string()))?;
    let host = host.replace("%3A", ":").replace("%3a", ":");

    let path: Vec<&str> = segments.collect();
    if path.iter().any(|seg| seg.is_empty()) {
        return Err(DidError::Malformed(did.to_string()));
    }

    if path.is_empty() {
        Ok(format!("https://{host}/.well-known/did.json"))
    } else {
        Ok(format!("https://{host}/{}/did.json", path.join("/")))
    }
}
