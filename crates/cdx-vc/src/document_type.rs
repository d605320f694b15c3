//! Trade document types and their JSON-LD contexts.
//!
//! Each document type maps to exactly one context URI. The context governs
//! the shape of `credentialSubject` and is always the first entry in the
//! credential's `@context` array.

use thiserror::Error;

/// Context URI appended to every document for file attachments.
pub const ATTACHMENTS_CONTEXT: &str = "https://trustvc.io/context/attachments-context.json";

/// Error parsing a document type key.
#[derive(Debug, Error)]
#[error("unknown document type: {0}")]
pub struct UnknownDocumentType(pub String);

/// The trade document types this stack can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Sample,
    BillOfLading,
    CertificateOfOrigin,
    Invoice,
    WarehouseReceipt,
    ElectronicPromissoryNote,
}

impl DocumentType {
    /// All known document types, for enumeration in CLIs and docs.
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Sample,
        DocumentType::BillOfLading,
        DocumentType::CertificateOfOrigin,
        DocumentType::Invoice,
        DocumentType::WarehouseReceipt,
        DocumentType::ElectronicPromissoryNote,
    ];

    /// Parse an uppercase document type key.
    pub fn parse(key: &str) -> Result<Self, UnknownDocumentType> {
        match key {
            "SAMPLE" => Ok(DocumentType::Sample),
            "BILL_OF_LADING" => Ok(DocumentType::BillOfLading),
            "CERTIFICATE_OF_ORIGIN" => Ok(DocumentType::CertificateOfOrigin),
            "INVOICE" => Ok(DocumentType::Invoice),
            "WAREHOUSE_RECEIPT" => Ok(DocumentType::WarehouseReceipt),
            "ELECTRONIC_PROMISSORY_NOTE" => Ok(DocumentType::ElectronicPromissoryNote),
            other => Err(UnknownDocumentType(other.to_string())),
        }
    }

    /// The canonical uppercase key for this type.
    pub fn key(&self) -> &'static str {
        match self {
            DocumentType::Sample => "SAMPLE",
            DocumentType::BillOfLading => "BILL_OF_LADING",
            DocumentType::CertificateOfOrigin => "CERTIFICATE_OF_ORIGIN",
            DocumentType::Invoice => "INVOICE",
            DocumentType::WarehouseReceipt => "WAREHOUSE_RECEIPT",
            DocumentType::ElectronicPromissoryNote => "ELECTRONIC_PROMISSORY_NOTE",
        }
    }

    /// The JSON-LD context URI governing this document's subject shape.
    pub fn context_uri(&self) -> &'static str {
        match self {
            DocumentType::Sample => "https://chaindox.com/contexts/chaindox-sample-document.json",
            DocumentType::BillOfLading => "https://chaindox.com/contexts/bol-context.json",
            DocumentType::CertificateOfOrigin => "https://chaindox.com/contexts/coo-context.json",
            DocumentType::Invoice => "https://chaindox.com/contexts/invoice-context.json",
            DocumentType::WarehouseReceipt => {
                "https://chaindox.com/contexts/warehouse-context.json"
            }
            DocumentType::ElectronicPromissoryNote => {
                "https://chaindox.com/contexts/electronic.json"
            }
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_known_keys() {
        for dt in DocumentType::ALL {
            assert_eq!(DocumentType::parse(dt.key()).unwrap(), dt);
        }
    }

    #[test]
    fn parse_rejects_unknown_key() {
        let err = DocumentType::parse("PACKING_LIST").unwrap_err();
        assert!(err.to_string().contains("PACKING_LIST"));
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!(DocumentType::parse("bill_of_lading").is_err());
        assert!(DocumentType::parse("Bill_Of_Lading").is_err());
    }

    #[test]
    fn context_uris_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for dt in DocumentType::ALL {
            assert!(seen.insert(dt.context_uri()), "duplicate context for {dt}");
        }
    }

    #[test]
    fn bill_of_lading_context() {
        assert_eq!(
            DocumentType::BillOfLading.context_uri(),
            "https://chaindox.com/contexts/bol-context.json"
        );
    }

    #[test]
    fn display_matches_key() {
        assert_eq!(
            DocumentType::ElectronicPromissoryNote.to_string(),
            "ELECTRONIC_PROMISSORY_NOTE"
        );
    }

    #[test]
    fn from_str_roundtrip() {
        let dt: DocumentType = "WAREHOUSE_RECEIPT".parse().unwrap();
        assert_eq!(dt, DocumentType::WarehouseReceipt);
    }
}
