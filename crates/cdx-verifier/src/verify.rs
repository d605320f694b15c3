//! Credential verification: three named checks, one report.
//!
//! [`verify`] is the single entry point relying parties call. It never
//! returns an error and never panics — whatever happens, the caller
//! gets a [`VerificationReport`] with the four summary flags. An input
//! that does not even parse as a credential fails every category.
//!
//! ## How It Works
//!
//! ```text
//!   credential JSON
//!         |
//!      parse ----------------- fails --> all categories false
//!         |
//!         +----------------+----------------------+
//!         v                v                      v
//!   DocumentIntegrity   DocumentStatus       IssuerIdentity
//!   resolve VM key      TransferableRecords: WebDid resolve,
//!   re-verify Ed25519   token_exists          assertionMethod
//!   proof, expiry       Bitstring: fetch      check
//!         |             list, read bit        |
//!         |                |                  |
//!         +----------------+------------------+
//!                          v
//!                 VerificationReport
//!                 VALIDITY = AND of the three
//! ```
//!
//! The three checks run concurrently; a slow status-list host does not
//! delay the signature check.
//!
//! ## Security Invariants
//!
//! - A check that cannot run to completion reports `Error`, and `Error`
//!   counts against validity. The report never vouches for a check it
//!   could not finish.
//! - The integrity check resolves the verification key from the DID
//!   document the proof names; it never trusts key material embedded in
//!   the credential itself.
//! - Token ids are re-derived from the presented credential bytes, so a
//!   tampered credential maps to a token the registry has never minted.

use cdx_registry::TokenRegistry;
use cdx_status::{extract_list_subject, StatusList};
use cdx_vc::{derive_token_id, CredentialStatus, VerifiableCredential};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::loader::DocumentLoader;
use crate::report::{FragmentCategory, VerificationFragment, VerificationReport};
use crate::resolver::{resolve_verification_key, DidResolver, ResolveError, WebDidResolver};

// ---- check names ----

const INTEGRITY_CHECK: &str = "Ed25519CredentialProof";
const TOKEN_STATUS_CHECK: &str = "TokenRegistryRecord";
const BITSTRING_STATUS_CHECK: &str = "BitstringStatusList";
const STATUS_SKIPPED_CHECK: &str = "CredentialStatus";
const IDENTITY_CHECK: &str = "WebDidIssuerIdentity";

/// Verifier-side context a relying party pins before checking
/// credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// When set, a transferable-record credential bound to any other
    /// chain fails its status check. Guards against a credential that
    /// points verifiers at a registry the issuer controls on some
    /// other network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_chain_id: Option<u64>,
}

/// Verifies a credential and reports per-category outcomes.
///
/// Runs the document-integrity, document-status, and issuer-identity
/// checks concurrently against the supplied registry and document
/// loader. Infallible by construction: malformed input yields a report
/// with every category false rather than an error.
pub async fn verify<R: TokenRegistry, L: DocumentLoader>(
    credential_json: &Value,
    registry: &R,
    loader: &L,
    config: &VerifierConfig,
) -> VerificationReport {
    let credential: VerifiableCredential = match serde_json::from_value(credential_json.clone()) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "credential JSON does not parse; failing all categories");
            return VerificationReport::unparseable();
        }
    };

    let resolver = WebDidResolver::new(loader);
    let (integrity, status, identity) = tokio::join!(
        check_integrity(&credential, &resolver),
        check_status(&credential, registry, loader, config),
        check_issuer_identity(&credential, &resolver),
    );

    let report = VerificationReport::new(integrity, status, identity);
    debug!(
        validity = report.validity(),
        integrity = report.document_integrity(),
        status = report.document_status(),
        identity = report.issuer_identity(),
        "verification complete"
    );
    report
}

// ---- document integrity ----

/// Re-verifies the Ed25519 proof against the key published in the
/// issuer's DID document.
async fn check_integrity<R: DidResolver>(
    credential: &VerifiableCredential,
    resolver: &R,
) -> VerificationFragment {
    let category = FragmentCategory::DocumentIntegrity;

    let proof = match &credential.proof {
        Some(p) => p,
        None => {
            return VerificationFragment::invalid(
                INTEGRITY_CHECK,
                category,
                "credential carries no proof",
            )
        }
    };

    // Resolution is async; the proof check itself is pure, so fetch the
    // key first and hand verify_proof a closure that already has it.
    let key = match resolve_verification_key(resolver, &proof.verification_method).await {
        Ok(key) => key,
        Err(ResolveError::Load(e)) => {
            return VerificationFragment::error(INTEGRITY_CHECK, category, e.to_string())
        }
        Err(e) => return VerificationFragment::invalid(INTEGRITY_CHECK, category, e.to_string()),
    };

    let result = credential.verify_proof(|_| Ok(key.clone()));
    if result.ok {
        VerificationFragment::valid(INTEGRITY_CHECK, category)
    } else {
        VerificationFragment::invalid(
            INTEGRITY_CHECK,
            category,
            result
                .error
                .unwrap_or_else(|| "signature verification failed".to_string()),
        )
    }
}

// ---- document status ----

/// Checks revocation state: registry lookup for transferable records,
/// status-list bit for bitstring entries, skipped when the credential
/// carries no status at all.
async fn check_status<R: TokenRegistry, L: DocumentLoader>(
    credential: &VerifiableCredential,
    registry: &R,
    loader: &L,
    config: &VerifierConfig,
) -> VerificationFragment {
    let category = FragmentCategory::DocumentStatus;

    match &credential.credential_status {
        None => VerificationFragment::skipped(
            STATUS_SKIPPED_CHECK,
            category,
            "no credentialStatus present",
        ),

        Some(CredentialStatus::TransferableRecords { chain_id, .. }) => {
            if let Some(expected) = config.expected_chain_id {
                if *chain_id != expected {
                    return VerificationFragment::invalid(
                        TOKEN_STATUS_CHECK,
                        category,
                        format!(
                            "chain id mismatch: credential is bound to {chain_id}, verifier expects {expected}"
                        ),
                    );
                }
            }

            let token_id = match derive_token_id(credential) {
                Ok(id) => id,
                Err(e) => {
                    return VerificationFragment::invalid(TOKEN_STATUS_CHECK, category, e.to_string())
                }
            };

            match registry.token_exists(&token_id).await {
                Ok(true) => VerificationFragment::valid(TOKEN_STATUS_CHECK, category),
                Ok(false) => VerificationFragment::invalid(
                    TOKEN_STATUS_CHECK,
                    category,
                    "token not found in registry",
                ),
                Err(e) => VerificationFragment::error(TOKEN_STATUS_CHECK, category, e.to_string()),
            }
        }

        Some(CredentialStatus::BitstringStatusListEntry {
            status_purpose,
            status_list_index,
            status_list_credential,
            ..
        }) => {
            let raw = match loader.load(status_list_credential).await {
                Ok(raw) => raw,
                Err(e) => {
                    return VerificationFragment::error(
                        BITSTRING_STATUS_CHECK,
                        category,
                        e.to_string(),
                    )
                }
            };

            let subject = match extract_list_subject(&raw) {
                Ok(s) => s,
                Err(e) => {
                    return VerificationFragment::invalid(
                        BITSTRING_STATUS_CHECK,
                        category,
                        e.to_string(),
                    )
                }
            };

            if subject.status_purpose.as_str() != status_purpose {
                return VerificationFragment::invalid(
                    BITSTRING_STATUS_CHECK,
                    category,
                    format!(
                        "status purpose mismatch: entry says {status_purpose}, list says {}",
                        subject.status_purpose
                    ),
                );
            }

            let list = match StatusList::decode(&subject.encoded_list) {
                Ok(l) => l,
                Err(e) => {
                    return VerificationFragment::invalid(
                        BITSTRING_STATUS_CHECK,
                        category,
                        e.to_string(),
                    )
                }
            };

            let index: usize = match status_list_index.parse() {
                Ok(i) => i,
                Err(_) => {
                    return VerificationFragment::invalid(
                        BITSTRING_STATUS_CHECK,
                        category,
                        format!("status list index {status_list_index:?} is not a number"),
                    )
                }
            };

            match list.get(index) {
                Ok(false) => VerificationFragment::valid(BITSTRING_STATUS_CHECK, category),
                Ok(true) => VerificationFragment::invalid(
                    BITSTRING_STATUS_CHECK,
                    category,
                    format!("credential is flagged for {status_purpose} at index {index}"),
                ),
                Err(e) => VerificationFragment::invalid(
                    BITSTRING_STATUS_CHECK,
                    category,
                    e.to_string(),
                ),
            }
        }
    }
}

// ---- issuer identity ----

/// Resolves the issuer's `did:web` document and checks the proof's
/// verification method is authorized for assertion.
async fn check_issuer_identity<R: DidResolver>(
    credential: &VerifiableCredential,
    resolver: &R,
) -> VerificationFragment {
    let category = FragmentCategory::IssuerIdentity;

    let proof = match &credential.proof {
        Some(p) => p,
        None => {
            return VerificationFragment::invalid(
                IDENTITY_CHECK,
                category,
                "credential carries no proof",
            )
        }
    };

    let document = match resolver.resolve(&credential.issuer).await {
        Ok(doc) => doc,
        Err(ResolveError::Load(e)) => {
            return VerificationFragment::error(IDENTITY_CHECK, category, e.to_string())
        }
        Err(e) => return VerificationFragment::invalid(IDENTITY_CHECK, category, e.to_string()),
    };

    if document.id != credential.issuer {
        return VerificationFragment::invalid(
            IDENTITY_CHECK,
            category,
            format!(
                "DID document id {} does not match issuer {}",
                document.id, credential.issuer
            ),
        );
    }

    if document.authorizes_assertion(&proof.verification_method) {
        VerificationFragment::valid(IDENTITY_CHECK, category)
    } else {
        VerificationFragment::invalid(
            IDENTITY_CHECK,
            category,
            "verification method not authorized for assertion",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticDocumentLoader;
    use crate::report::FragmentStatus;
    use cdx_crypto::{encode_multibase, LocalSigner, ProofSigner};
    use cdx_registry::MockTokenRegistry;
    use cdx_status::{credential_status_payload, status_entry, StatusPurpose};
    use cdx_vc::{ChainBinding, DidDocument, DocumentBuilder, DocumentTemplate};
    use serde_json::json;

    const DOMAIN: &str = "chaindox.example";
    const ISSUER: &str = "did:web:chaindox.example";
    const VM: &str = "did:web:chaindox.example#keys-1";
    const DID_URL: &str = "https://chaindox.example/.well-known/did.json";
    const LIST_URL: &str = "https://chaindox.example/credentials/status/1";
    const REGISTRY_ADDR: &str = "0x71c7656ec7ab88b098defb751b7401b5f6d8976f";

    /// Fresh issuer key plus a loader that serves its DID document.
    fn issuer_setup() -> (LocalSigner, StaticDocumentLoader) {
        let signer = LocalSigner::generate(VM);
        let multibase = encode_multibase(&signer.public_key().unwrap());
        let document = DidDocument::for_web_issuer(DOMAIN, &multibase);
        let loader = StaticDocumentLoader::new()
            .with_document(DID_URL, serde_json::to_value(&document).unwrap());
        (signer, loader)
    }

    fn bill_of_lading_subject() -> Value {
        json!({
            "shipper": { "name": "Maersk Line" },
            "consignee": { "name": "Pacific Imports Ltd" },
            "blNumber": "BL-2026-0042",
        })
    }

    /// Signed bill of lading bound to a token registry.
    fn token_credential(signer: &LocalSigner) -> VerifiableCredential {
        let mut credential = DocumentBuilder::new(DocumentTemplate::new("BILL_OF_LADING"), ISSUER)
            .subject(bill_of_lading_subject())
            .chain_binding(ChainBinding {
                chain: "XDC".to_string(),
                chain_id: 50,
                token_registry: REGISTRY_ADDR.parse().unwrap(),
                rpc_provider_url: "https://erpc.xinfin.network".to_string(),
            })
            .build()
            .unwrap();
        credential.sign(signer).unwrap();
        credential
    }

    /// Signed credential with a bitstring status entry at `index`.
    fn bitstring_credential(signer: &LocalSigner, index: usize) -> VerifiableCredential {
        let mut credential = DocumentBuilder::new(DocumentTemplate::new("BILL_OF_LADING"), ISSUER)
            .subject(bill_of_lading_subject())
            .build()
            .unwrap();
        credential.credential_status =
            Some(status_entry(LIST_URL, StatusPurpose::Revocation, index));
        credential.sign(signer).unwrap();
        credential
    }

    /// Serves a revocation list with the given bits set at LIST_URL.
    fn add_status_list(loader: &mut StaticDocumentLoader, set_bits: &[usize]) {
        let mut list = StatusList::with_default_length();
        for &bit in set_bits {
            list.set(bit, true).unwrap();
        }
        let payload =
            credential_status_payload(LIST_URL, ISSUER, StatusPurpose::Revocation, &list).unwrap();
        loader.insert(LIST_URL, serde_json::to_value(&payload).unwrap());
    }

    #[tokio::test]
    async fn fully_valid_token_record_verifies() {
        let (signer, loader) = issuer_setup();
        let credential = token_credential(&signer);
        let registry = MockTokenRegistry::new();
        registry.mark_minted(derive_token_id(&credential).unwrap());

        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert!(report.validity(), "fragments: {:?}", report.fragments());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "VALIDITY": true,
                "DOCUMENT_INTEGRITY": true,
                "DOCUMENT_STATUS": true,
                "ISSUER_IDENTITY": true,
            })
        );
    }

    #[tokio::test]
    async fn tampered_subject_fails_integrity() {
        let (signer, loader) = issuer_setup();
        let credential = token_credential(&signer);
        let registry = MockTokenRegistry::new();
        registry.mark_minted(derive_token_id(&credential).unwrap());

        let mut raw = serde_json::to_value(&credential).unwrap();
        raw["credentialSubject"]["blNumber"] = json!("BL-2026-9999");
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert!(!report.document_integrity());
        assert!(!report.validity());
        // Tampering also changes the derived token id, so the registry
        // no longer knows the token.
        assert!(!report.document_status());
        assert!(report.issuer_identity());
    }

    #[tokio::test]
    async fn malformed_input_fails_every_category() {
        let (_, loader) = issuer_setup();
        let registry = MockTokenRegistry::new();

        for raw in [json!("not an object"), json!({}), json!({ "@context": 5 })] {
            let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;
            assert!(!report.validity(), "input {raw} must not verify");
            assert!(!report.document_integrity());
            assert!(!report.document_status());
            assert!(!report.issuer_identity());
        }
    }

    #[tokio::test]
    async fn unminted_token_fails_status_only() {
        let (signer, loader) = issuer_setup();
        let credential = token_credential(&signer);
        let registry = MockTokenRegistry::new();

        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert!(report.document_integrity());
        assert!(!report.document_status());
        assert!(report.issuer_identity());
        assert!(!report.validity());
    }

    #[tokio::test]
    async fn revoked_bitstring_entry_fails_status() {
        let (signer, mut loader) = issuer_setup();
        let credential = bitstring_credential(&signer, 5);
        add_status_list(&mut loader, &[5]);
        let registry = MockTokenRegistry::new();

        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert!(report.document_integrity());
        assert!(report.issuer_identity());
        assert!(!report.document_status());
        assert!(!report.validity());
    }

    #[tokio::test]
    async fn clean_bitstring_entry_passes() {
        let (signer, mut loader) = issuer_setup();
        let credential = bitstring_credential(&signer, 5);
        add_status_list(&mut loader, &[4, 6]);
        let registry = MockTokenRegistry::new();

        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert!(report.validity(), "fragments: {:?}", report.fragments());
    }

    #[tokio::test]
    async fn unreachable_status_list_is_an_error_not_a_pass() {
        let (signer, loader) = issuer_setup();
        // Loader serves the DID document but not the status list.
        let credential = bitstring_credential(&signer, 5);
        let registry = MockTokenRegistry::new();

        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert!(report.document_integrity());
        assert_eq!(report.fragments()[1].status, FragmentStatus::Error);
        assert!(!report.document_status());
        assert!(!report.validity());
    }

    #[tokio::test]
    async fn chain_id_mismatch_fails_status() {
        let (signer, loader) = issuer_setup();
        let credential = token_credential(&signer);
        let registry = MockTokenRegistry::new();
        registry.mark_minted(derive_token_id(&credential).unwrap());

        let config = VerifierConfig {
            expected_chain_id: Some(51),
        };
        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &config).await;

        assert!(report.document_integrity());
        assert!(!report.document_status());
        assert!(report.issuer_identity());
        assert!(!report.validity());
    }

    #[tokio::test]
    async fn credential_without_status_is_skipped_but_passes() {
        let (signer, loader) = issuer_setup();
        let mut credential = DocumentBuilder::new(DocumentTemplate::new("INVOICE"), ISSUER)
            .subject(json!({ "invoiceNumber": "INV-77" }))
            .build()
            .unwrap();
        credential.sign(&signer).unwrap();
        let registry = MockTokenRegistry::new();

        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert_eq!(report.fragments()[1].status, FragmentStatus::Skipped);
        assert!(report.document_status());
        assert!(report.validity());
    }

    #[tokio::test]
    async fn unauthorized_assertion_method_fails_identity() {
        let signer = LocalSigner::generate(VM);
        let multibase = encode_multibase(&signer.public_key().unwrap());
        let mut document = DidDocument::for_web_issuer(DOMAIN, &multibase);
        // Key is published but not authorized for assertion.
        document.assertion_method = vec![format!("{ISSUER}#keys-2")];
        let loader = StaticDocumentLoader::new()
            .with_document(DID_URL, serde_json::to_value(&document).unwrap());

        let mut credential = DocumentBuilder::new(DocumentTemplate::new("INVOICE"), ISSUER)
            .subject(json!({ "invoiceNumber": "INV-77" }))
            .build()
            .unwrap();
        credential.sign(&signer).unwrap();
        let registry = MockTokenRegistry::new();

        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert!(report.document_integrity());
        assert!(!report.issuer_identity());
        assert!(!report.validity());
    }

    #[tokio::test]
    async fn unreachable_did_host_degrades_to_error() {
        let (signer, _) = issuer_setup();
        let mut credential = DocumentBuilder::new(DocumentTemplate::new("INVOICE"), ISSUER)
            .subject(json!({ "invoiceNumber": "INV-77" }))
            .build()
            .unwrap();
        credential.sign(&signer).unwrap();
        let registry = MockTokenRegistry::new();
        // Empty loader: the DID document cannot be fetched at all.
        let loader = StaticDocumentLoader::new();

        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert_eq!(report.fragments()[0].status, FragmentStatus::Error);
        assert_eq!(report.fragments()[2].status, FragmentStatus::Error);
        assert!(!report.validity());
    }

    #[tokio::test]
    async fn unsigned_credential_fails_integrity_and_identity() {
        let (_, loader) = issuer_setup();
        let credential = DocumentBuilder::new(DocumentTemplate::new("INVOICE"), ISSUER)
            .subject(json!({ "invoiceNumber": "INV-77" }))
            .build()
            .unwrap();
        let registry = MockTokenRegistry::new();

        let raw = serde_json::to_value(&credential).unwrap();
        let report = verify(&raw, &registry, &loader, &VerifierConfig::default()).await;

        assert!(!report.document_integrity());
        assert!(!report.issuer_identity());
        assert!(report.document_status());
        assert!(!report.validity());
    }
}
