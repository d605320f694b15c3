//! `did:web` resolution over a [`DocumentLoader`].
//!
//! Turns a DID into its DID document by fetching the well-known URL the
//! `did:web` method mandates, then digs verification keys out of the
//! resolved document. The resolver is generic over the loader so the
//! same code path serves live HTTPS resolution and offline fixtures.

use std::future::Future;

use cdx_crypto::{decode_multibase, Ed25519PublicKey};
use cdx_vc::{did_web_to_url, split_did_url, DidDocument, DidError};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::loader::{DocumentLoader, LoaderError};

/// Failure modes when resolving a DID to keys.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The DID itself is malformed or uses an unsupported method.
    #[error(transparent)]
    Did(#[from] DidError),

    /// The DID document could not be fetched.
    #[error(transparent)]
    Load(#[from] LoaderError),

    /// The fetched document does not deserialize as a DID document.
    #[error("{url} is not a valid DID document: {detail}")]
    Document { url: String, detail: String },

    /// The DID document carries no verification method under the id.
    #[error("verification method {method_id} not found in DID document")]
    MethodNotFound { method_id: String },

    /// The verification method exists but its key cannot be used.
    #[error("cannot decode key for {method_id}: {detail}")]
    KeyDecode { method_id: String, detail: String },
}

/// Capability to resolve a DID into its DID document.
pub trait DidResolver: Send + Sync {
    fn resolve(&self, did: &str) -> impl Future<Output = Result<DidDocument, ResolveError>> + Send;
}

/// Resolver for the `did:web` method.
///
/// Maps the DID to its document URL per the method spec
/// (`did:web:example.com` → `https://example.com/.well-known/did.json`)
/// and fetches it through the wrapped loader.
#[derive(Debug, Clone)]
pub struct WebDidResolver<L> {
    loader: L,
}

impl<L> WebDidResolver<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }
}

impl<L: DocumentLoader> DidResolver for WebDidResolver<L> {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolveError> {
        let url = did_web_to_url(did)?;
        debug!(did, url, "resolving did:web document");
        let raw: Value = self.loader.load(&url).await?;
        serde_json::from_value(raw).map_err(|e| ResolveError::Document {
            url,
            detail: e.to_string(),
        })
    }
}

/// Resolves a DID URL to the Ed25519 key of the verification method it
/// names.
///
/// The DID part of `method_id` is resolved to its document, the fragment
/// selects the verification method, and the method's `publicKeyMultibase`
/// is decoded. Only `Multikey` methods are accepted.
pub async fn resolve_verification_key<R: DidResolver>(
    resolver: &R,
    method_id: &str,
) -> Result<Ed25519PublicKey, ResolveError> {
    let (did, _fragment) = split_did_url(method_id);
    let document = resolver.resolve(did).await?;

    let method = document
        .find_verification_method(method_id)
        .ok_or_else(|| ResolveError::MethodNotFound {
            method_id: method_id.to_string(),
        })?;

    if method.method_type != "Multikey" {
        return Err(ResolveError::KeyDecode {
            method_id: method_id.to_string(),
            detail: format!("unsupported verification method type {}", method.method_type),
        });
    }

    decode_multibase(&method.public_key_multibase).map_err(|e| ResolveError::KeyDecode {
        method_id: method_id.to_string(),
        detail: e.to_string(),
    })
}
