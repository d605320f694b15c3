//! Remote document fetching for verification.
//!
//! Everything the verifier pulls from the network — DID documents and
//! status list credentials — flows through the [`DocumentLoader`]
//! capability. Verification logic never talks HTTP directly, so tests
//! can swap in a [`StaticDocumentLoader`] seeded with fixtures and run
//! fully offline.
//!
//! ## Security Invariants
//!
//! - A loader returns the document as served; it performs no validation
//!   beyond JSON parsing. Interpreting the document (DID resolution,
//!   status list decoding) is the caller's job.
//! - [`HttpDocumentLoader`] enforces a request timeout so an unresponsive
//!   host degrades a single check rather than hanging verification.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Default timeout for a single document fetch.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Failure modes when loading a remote document.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The underlying HTTP client could not be constructed.
    #[error("document loader construction failed: {detail}")]
    Construction { detail: String },

    /// The request never produced a response.
    #[error("failed to fetch {url}: {detail}")]
    Fetch { url: String, detail: String },

    /// The host answered with a non-success status code.
    #[error("{url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The response body was not valid JSON.
    #[error("{url} returned malformed JSON: {detail}")]
    Json { url: String, detail: String },

    /// No document is registered under the URL (static loaders only).
    #[error("no document registered for {url}")]
    NotFound { url: String },
}

/// Capability to fetch a JSON document by URL.
pub trait DocumentLoader: Send + Sync {
    /// Fetches the document at `url` and parses it as JSON.
    fn load(&self, url: &str) -> impl Future<Output = Result<Value, LoaderError>> + Send;
}

impl<L: DocumentLoader + ?Sized> DocumentLoader for &L {
    fn load(&self, url: &str) -> impl Future<Output = Result<Value, LoaderError>> + Send {
        (**self).load(url)
    }
}

// ---- HTTP loader ----

/// Loader that fetches documents over HTTPS with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpDocumentLoader {
    client: reqwest::Client,
}

impl HttpDocumentLoader {
    /// Creates a loader with the default fetch timeout.
    pub fn new() -> Result<Self, LoaderError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Creates a loader with an explicit fetch timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, LoaderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoaderError::Construction {
                detail: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl DocumentLoader for HttpDocumentLoader {
    async fn load(&self, url: &str) -> Result<Value, LoaderError> {
        debug!(url, "fetching remote document");
        let response = self.client.get(url).send().await.map_err(|e| {
            let detail = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            };
            LoaderError::Fetch {
                url: url.to_string(),
                detail,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LoaderError::Json {
                url: url.to_string(),
                detail: e.to_string(),
            })
    }
}

// ---- static loader ----

/// In-memory loader backed by a fixed URL-to-document map.
///
/// Used in tests and offline verification: seed it with the DID
/// documents and status list credentials the credential under test
/// references, and no network access happens at all.
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentLoader {
    documents: HashMap<String, Value>,
}

impl StaticDocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document under its URL.
    pub fn insert(&mut self, url: impl Into<String>, document: Value) {
        self.documents.insert(url.into(), document);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_document(mut self, url: impl Into<String>, document: Value) -> Self {
        self.insert(url, document);
        self
    }
}

impl DocumentLoader for StaticDocumentLoader {
    async fn load(&self, url: &str) -> Result<Value, LoaderError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound {
                url: url.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn static_loader_returns_registered_document() {
        let loader = StaticDocumentLoader::new()
            .with_document("https://issuer.example/did.json", json!({"id": "did:web:issuer.example"}));

        let doc = loader.load("https://issuer.example/did.json").await.unwrap();
        assert_eq!(doc["id"], "did:web:issuer.example");
    }

    #[tokio::test]
    async fn static_loader_misses_unregistered_url() {
        let loader = StaticDocumentLoader::new();
        let err = loader.load("https://nowhere.example/doc.json").await.unwrap_err();
        assert!(matches!(err, LoaderError::NotFound { .. }));
    }

    #[tokio::test]
    async fn loader_works_through_a_reference() {
        // Check code generic over `L: DocumentLoader` also accepts `&L`.
        async fn fetch<L: DocumentLoader>(loader: L, url: &str) -> Result<Value, LoaderError> {
            loader.load(url).await
        }

        let loader =
            StaticDocumentLoader::new().with_document("https://a.example/x.json", json!(1));
        let doc = fetch(&loader, "https://a.example/x.json").await.unwrap();
        assert_eq!(doc, json!(1));
    }

    #[tokio::test]
    async fn http_loader_reports_unreachable_host() {
        // 192.0.2.0/24 is TEST-NET-1, guaranteed unroutable.
        let loader = HttpDocumentLoader::with_timeout(Duration::from_millis(200)).unwrap();
        let err = loader.load("http://192.0.2.1/did.json").await.unwrap_err();
        assert!(matches!(err, LoaderError::Fetch { .. }), "got {err:?}");
    }
}
