//! # Status list credential payloads
//!
//! Builds the unsigned `BitstringStatusListCredential` that publishes an
//! encoded list, the per-document status entries that reference it, and the
//! subject extraction used when reading a fetched list credential back.
//!
//! Published lists are immutable snapshots: revoking a credential produces
//! a new payload that must be signed and republished, never an in-place
//! edit of the hosted document.

use serde_json::Value;

use cdx_core::Timestamp;
use cdx_vc::{ContextValue, CredentialStatus, CredentialTypeValue, VerifiableCredential};

use crate::list::{StatusList, StatusListError, StatusPurpose};

/// VC Data Model 2.0 context carried by status list credentials.
pub const BITSTRING_STATUS_CONTEXT: &str = "https://www.w3.org/ns/credentials/v2";

/// Credential type marking a published status list.
pub const STATUS_LIST_CREDENTIAL_TYPE: &str = "BitstringStatusListCredential";

/// Subject type inside a status list credential.
pub const STATUS_LIST_SUBJECT_TYPE: &str = "BitstringStatusList";

/// Parsed view of a status list credential's subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusListSubject {
    /// Subject id, conventionally `<hosting url>#list`.
    pub id: Option<String>,
    pub status_purpose: StatusPurpose,
    pub encoded_list: String,
}

/// Build the unsigned status list credential for publication.
///
/// The caller signs the result and hosts it at `hosting_url`.
pub fn credential_status_payload(
    hosting_url: &str,
    issuer: &str,
    purpose: StatusPurpose,
    list: &StatusList,
) -> Result<VerifiableCredential, StatusListError> {
    let encoded_list = list.encode()?;

    Ok(VerifiableCredential {
        context: ContextValue::Array(vec![BITSTRING_STATUS_CONTEXT.to_string()]),
        id: Some(hosting_url.to_string()),
        credential_type: CredentialTypeValue::Array(vec![
            "VerifiableCredential".to_string(),
            STATUS_LIST_CREDENTIAL_TYPE.to_string(),
        ]),
        issuer: issuer.to_string(),
        issuance_date: *Timestamp::now().as_datetime(),
        expiration_date: None,
        credential_subject: serde_json::json!({
            "id": format!("{hosting_url}#list"),
            "type": STATUS_LIST_SUBJECT_TYPE,
            "statusPurpose": purpose.as_str(),
            "encodedList": encoded_list,
        }),
        credential_status: None,
        render_method: None,
        proof: None,
    })
}

/// Build the `credentialStatus` entry a document credential carries to
/// reference bit `index` of the list hosted at `hosting_url`.
pub fn status_entry(hosting_url: &str, purpose: StatusPurpose, index: usize) -> CredentialStatus {
    CredentialStatus::BitstringStatusListEntry {
        id: Some(format!("{hosting_url}#{index}")),
        status_purpose: purpose.as_str().to_string(),
        status_list_index: index.to_string(),
        status_list_credential: hosting_url.to_string(),
    }
}

/// Extract the status list subject from a fetched list credential.
///
/// Works on raw JSON rather than the typed envelope: hosted lists from
/// other stacks carry members (`validFrom`, foreign proof suites) the
/// rigid envelope rejects, and the status check only needs the subject.
pub fn extract_list_subject(credential_json: &Value) -> Result<StatusListSubject, StatusListError> {
    let subject = credential_json
        .get("credentialSubject")
        .ok_or_else(|| missing("credentialSubject"))?;

    let encoded_list = subject
        .get("encodedList")
        .and_then(Value::as_str)
        .ok_or_else(|| missing("credentialSubject.encodedList"))?
        .to_string();

    let status_purpose = subject
        .get("statusPurpose")
        .and_then(Value::as_str)
        .ok_or_else(|| missing("credentialSubject.statusPurpose"))?
        .parse::<StatusPurpose>()
        .map_err(StatusListError::MalformedListCredential)?;

    let id = subject
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(StatusListSubject {
        id,
        status_purpose,
        encoded_list,
    })
}

fn missing(field: &str) -> StatusListError {
    StatusListError::MalformedListCredential(format!("missing {field}"))
}
