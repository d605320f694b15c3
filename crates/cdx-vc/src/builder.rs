//! # Document builder
//!
//! Pure construction of unsigned credentials from a document template, a
//! subject payload, and an optional chain binding. No I/O, no signing: the
//! builder's output feeds the signing and minting pipeline.
//!
//! ## Design
//!
//! Context ordering is an invariant of the output: the document-type schema
//! URI comes first, template extension contexts follow in declaration
//! order, and the attachments context is appended last. Duplicates collapse
//! to their first occurrence.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use cdx_core::{EvmAddress, Timestamp};

use crate::credential::{
    ContextValue, CredentialStatus, CredentialTypeValue, RenderMethod, VerifiableCredential,
};
use crate::document_type::{DocumentType, ATTACHMENTS_CONTEXT};

/// Default credential validity in calendar months.
pub const DEFAULT_EXPIRY_MONTHS: u32 = 3;

/// Errors from credential construction.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The template is structurally unusable.
    #[error("invalid template: {reason}")]
    InvalidTemplate { reason: String },

    /// The document-type key is not in the registry.
    #[error("unsupported document type: {key}")]
    UnsupportedDocumentType { key: String },

    /// No credential subject was supplied.
    #[error("credential subject is required")]
    MissingSubject,
}

/// A document template: the document-type key plus any extension contexts.
///
/// The key is matched case-insensitively against the document-type registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    /// Document-type key, e.g. `"BILL_OF_LADING"`.
    pub document_type: String,

    /// Extension context URIs, in order, placed after the type context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_contexts: Vec<String>,
}

impl DocumentTemplate {
    pub fn new(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            extra_contexts: Vec::new(),
        }
    }

    /// Append an extension context URI.
    pub fn with_context(mut self, uri: impl Into<String>) -> Self {
        self.extra_contexts.push(uri.into());
        self
    }
}

/// Chain binding data for a transferable document.
///
/// Carried by configuration and stamped into `credentialStatus` verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainBinding {
    /// Currency / network label, e.g. `"XDC"`.
    pub chain: String,
    /// EVM chain identifier.
    pub chain_id: u64,
    /// Deployed token registry contract address.
    pub token_registry: EvmAddress,
    /// JSON-RPC endpoint verifiers should use.
    pub rpc_provider_url: String,
}

/// Builder for unsigned credentials.
///
/// ```
/// use cdx_vc::builder::{DocumentBuilder, DocumentTemplate};
///
/// let vc = DocumentBuilder::new(
///     DocumentTemplate::new("BILL_OF_LADING"),
///     "did:web:chaindox.com",
/// )
/// .subject(serde_json::json!({ "blNumber": "BL-2026-0042" }))
/// .build()
/// .unwrap();
///
/// assert!(vc.proof.is_none());
/// assert!(vc.id.unwrap().starts_with("urn:uuid:"));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    template: DocumentTemplate,
    issuer: String,
    subject: Option<serde_json::Value>,
    chain_binding: Option<ChainBinding>,
    expiry_months: u32,
    render_template: Option<String>,
}

impl DocumentBuilder {
    pub fn new(template: DocumentTemplate, issuer: impl Into<String>) -> Self {
        Self {
            template,
            issuer: issuer.into(),
            subject: None,
            chain_binding: None,
            expiry_months: DEFAULT_EXPIRY_MONTHS,
            render_template: None,
        }
    }

    /// Set the credential subject payload. Required.
    pub fn subject(mut self, subject: serde_json::Value) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Bind the document to a token registry. Optional; without it the
    /// credential carries no `credentialStatus`.
    pub fn chain_binding(mut self, binding: ChainBinding) -> Self {
        self.chain_binding = Some(binding);
        self
    }

    /// Override the default validity period.
    pub fn expires_in_months(mut self, months: u32) -> Self {
        self.expiry_months = months;
        self
    }

    /// Override the render template name (defaults to the document-type key).
    pub fn render_template(mut self, name: impl Into<String>) -> Self {
        self.render_template = Some(name.into());
        self
    }

    /// Construct the unsigned credential.
    ///
    /// Pure: no I/O, no side effects beyond the fresh `urn:uuid` id.
    pub fn build(self) -> Result<VerifiableCredential, BuildError> {
        let key = self.template.document_type.trim();
        if key.is_empty() {
            return Err(BuildError::InvalidTemplate {
                reason: "document type key is empty".to_string(),
            });
        }
        if self.template.extra_contexts.iter().any(|c| c.trim().is_empty()) {
            return Err(BuildError::InvalidTemplate {
                reason: "template carries an empty context URI".to_string(),
            });
        }

        let key = key.to_uppercase();
        let document_type =
            DocumentType::parse(&key).map_err(|_| BuildError::UnsupportedDocumentType {
                key: key.clone(),
            })?;

        let subject = match self.subject {
            Some(s) if !s.is_null() => s,
            _ => return Err(BuildError::MissingSubject),
        };

        // Type context first, extensions next, attachments last. First
        // occurrence wins on duplicates.
        let mut contexts: Vec<String> = Vec::with_capacity(self.template.extra_contexts.len() + 2);
        contexts.push(document_type.context_uri().to_string());
        for uri in self.template.extra_contexts {
            if !contexts.contains(&uri) {
                contexts.push(uri);
            }
        }
        if !contexts.iter().any(|c| c == ATTACHMENTS_CONTEXT) {
            contexts.push(ATTACHMENTS_CONTEXT.to_string());
        }

        let issued = Timestamp::now();
        let expires = issued.add_months(self.expiry_months).map_err(|e| {
            BuildError::InvalidTemplate {
                reason: format!("expiry out of calendar range: {e}"),
            }
        })?;

        let credential_status = self.chain_binding.map(|b| CredentialStatus::TransferableRecords {
            chain: b.chain,
            chain_id: b.chain_id,
            token_registry: b.token_registry,
            rpc_provider_url: b.rpc_provider_url,
        });

        let template_name = self
            .render_template
            .unwrap_or_else(|| document_type.key().to_string());

        Ok(VerifiableCredential {
            context: ContextValue::Array(contexts),
            id: Some(format!("urn:uuid:{}", Uuid::new_v4())),
            credential_type: CredentialTypeValue::Array(vec![
                "VerifiableCredential".to_string(),
            ]),
            issuer: self.issuer,
            issuance_date: *issued.as_datetime(),
            expiration_date: Some(*expires.as_datetime()),
            credential_subject: subject,
            credential_status,
            render_method: Some(RenderMethod::embedded(template_name)),
            proof: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> ChainBinding {
        ChainBinding {
            chain: "XDC".to_string(),
            chain_id: 50,
            token_registry: "0x71c7656ec7ab88b098defb751b7401b5f6d8976f"
                .parse()
                .unwrap(),
            rpc_provider_url: "https://erpc.xinfin.network".to_string(),
        }
    }

    #[test]
    fn builds_bill_of_lading() {
        let vc = DocumentBuilder::new(
            DocumentTemplate::new("BILL_OF_LADING"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({ "blNumber": "BL-2026-0042" }))
        .chain_binding(binding())
        .build()
        .unwrap();

        assert_eq!(vc.issuer, "did:web:chaindox.com");
        assert!(vc.id.as_deref().unwrap().starts_with("urn:uuid:"));
        assert!(vc.credential_type.contains_vc_type());
        assert!(vc.proof.is_none());

        let uris = vc.context.as_uris();
        assert_eq!(uris[0], "https://chaindox.com/contexts/bol-context.json");
        assert_eq!(*uris.last().unwrap(), ATTACHMENTS_CONTEXT);
    }

    #[test]
    fn document_type_key_is_case_insensitive() {
        let vc = DocumentBuilder::new(
            DocumentTemplate::new("bill_of_lading"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({ "blNumber": "BL-1" }))
        .build()
        .unwrap();

        assert_eq!(
            vc.context.as_uris()[0],
            "https://chaindox.com/contexts/bol-context.json"
        );
        assert_eq!(
            vc.render_method.unwrap().template_name,
            "BILL_OF_LADING"
        );
    }

    #[test]
    fn unknown_type_rejected_with_uppercased_key() {
        let err = DocumentBuilder::new(
            DocumentTemplate::new("packing_list"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({}))
        .build()
        .unwrap_err();

        match err {
            BuildError::UnsupportedDocumentType { key } => assert_eq!(key, "PACKING_LIST"),
            other => panic!("expected UnsupportedDocumentType, got {other:?}"),
        }
    }

    #[test]
    fn empty_template_rejected() {
        let err = DocumentBuilder::new(DocumentTemplate::new("  "), "did:web:chaindox.com")
            .subject(serde_json::json!({}))
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidTemplate { .. }));
    }

    #[test]
    fn empty_extra_context_rejected() {
        let template = DocumentTemplate::new("SAMPLE").with_context("");
        let err = DocumentBuilder::new(template, "did:web:chaindox.com")
            .subject(serde_json::json!({}))
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidTemplate { .. }));
    }

    #[test]
    fn missing_subject_rejected() {
        let err = DocumentBuilder::new(
            DocumentTemplate::new("SAMPLE"),
            "did:web:chaindox.com",
        )
        .build()
        .unwrap_err();
        assert!(matches!(err, BuildError::MissingSubject));
    }

    #[test]
    fn null_subject_rejected() {
        let err = DocumentBuilder::new(
            DocumentTemplate::new("SAMPLE"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::Value::Null)
        .build()
        .unwrap_err();
        assert!(matches!(err, BuildError::MissingSubject));
    }

    #[test]
    fn extra_contexts_preserved_in_order_and_deduplicated() {
        let template = DocumentTemplate::new("INVOICE")
            .with_context("https://a.example/ctx.json")
            .with_context("https://chaindox.com/contexts/invoice-context.json")
            .with_context("https://b.example/ctx.json")
            .with_context("https://a.example/ctx.json");

        let vc = DocumentBuilder::new(template, "did:web:chaindox.com")
            .subject(serde_json::json!({ "invoiceNumber": "INV-7" }))
            .build()
            .unwrap();

        assert_eq!(
            vc.context.as_uris(),
            vec![
                "https://chaindox.com/contexts/invoice-context.json",
                "https://a.example/ctx.json",
                "https://b.example/ctx.json",
                ATTACHMENTS_CONTEXT,
            ]
        );
    }

    #[test]
    fn chain_binding_becomes_credential_status() {
        let vc = DocumentBuilder::new(
            DocumentTemplate::new("SAMPLE"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({ "name": "demo" }))
        .chain_binding(binding())
        .build()
        .unwrap();

        match vc.credential_status.unwrap() {
            CredentialStatus::TransferableRecords {
                chain,
                chain_id,
                token_registry,
                rpc_provider_url,
            } => {
                assert_eq!(chain, "XDC");
                assert_eq!(chain_id, 50);
                assert_eq!(
                    token_registry.to_hex(),
                    "0x71c7656ec7ab88b098defb751b7401b5f6d8976f"
                );
                assert_eq!(rpc_provider_url, "https://erpc.xinfin.network");
            }
            other => panic!("expected TransferableRecords, got {other:?}"),
        }
    }

    #[test]
    fn no_binding_means_no_status() {
        let vc = DocumentBuilder::new(
            DocumentTemplate::new("SAMPLE"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({ "name": "demo" }))
        .build()
        .unwrap();
        assert!(vc.credential_status.is_none());
    }

    #[test]
    fn default_expiry_is_three_months() {
        let vc = DocumentBuilder::new(
            DocumentTemplate::new("SAMPLE"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({ "name": "demo" }))
        .build()
        .unwrap();

        let expires = vc.expiration_date.unwrap();
        let issued = vc.issuance_date;
        let expected = Timestamp::from_utc(issued)
            .add_months(DEFAULT_EXPIRY_MONTHS)
            .unwrap();
        assert_eq!(expires, *expected.as_datetime());
    }

    #[test]
    fn custom_expiry_honored() {
        let vc = DocumentBuilder::new(
            DocumentTemplate::new("SAMPLE"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({ "name": "demo" }))
        .expires_in_months(12)
        .build()
        .unwrap();

        let issued = Timestamp::from_utc(vc.issuance_date);
        let expected = issued.add_months(12).unwrap();
        assert_eq!(vc.expiration_date.unwrap(), *expected.as_datetime());
    }

    #[test]
    fn absurd_expiry_rejected_not_panicking() {
        let err = DocumentBuilder::new(
            DocumentTemplate::new("SAMPLE"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({ "name": "demo" }))
        .expires_in_months(u32::MAX)
        .build()
        .unwrap_err();
        assert!(matches!(err, BuildError::InvalidTemplate { .. }));
    }

    #[test]
    fn render_method_defaults_to_document_key() {
        let vc = DocumentBuilder::new(
            DocumentTemplate::new("CERTIFICATE_OF_ORIGIN"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({ "cooNumber": "COO-1" }))
        .build()
        .unwrap();

        let rm = vc.render_method.unwrap();
        assert_eq!(rm.template_name, "CERTIFICATE_OF_ORIGIN");
        assert_eq!(rm.render_type, "EMBEDDED_RENDERER");
        assert_eq!(rm.id, "https://generic-templates.tradetrust.io");
    }

    #[test]
    fn render_template_override() {
        let vc = DocumentBuilder::new(
            DocumentTemplate::new("SAMPLE"),
            "did:web:chaindox.com",
        )
        .subject(serde_json::json!({ "name": "demo" }))
        .render_template("CUSTOM_VIEW")
        .build()
        .unwrap();
        assert_eq!(vc.render_method.unwrap().template_name, "CUSTOM_VIEW");
    }

    #[test]
    fn fresh_id_per_build() {
        let build = || {
            DocumentBuilder::new(DocumentTemplate::new("SAMPLE"), "did:web:chaindox.com")
                .subject(serde_json::json!({ "name": "demo" }))
                .build()
                .unwrap()
        };
        assert_ne!(build().id, build().id);
    }
}
