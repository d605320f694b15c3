//! Verification fragments and the aggregate validity report.
//!
//! Each verification check produces one named [`VerificationFragment`]
//! in a fixed category. The [`VerificationReport`] holds exactly one
//! fragment per category and derives the four summary booleans relying
//! parties consume. There is no dynamic fragment list to filter — a
//! category is its fragment.
//!
//! ## Design
//!
//! A fragment with [`FragmentStatus::Skipped`] passes: a credential
//! with no `credentialStatus` has nothing to check, and that is not a
//! defect. A fragment with [`FragmentStatus::Error`] fails: if a check
//! could not run to completion, the report must not vouch for it.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// The category a verification fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FragmentCategory {
    DocumentIntegrity,
    DocumentStatus,
    IssuerIdentity,
}

/// Outcome of a single verification check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FragmentStatus {
    /// The check ran and the credential passed it.
    Valid,
    /// The check ran and the credential failed it.
    Invalid,
    /// The check could not run to completion (network failure, etc.).
    Error,
    /// The check does not apply to this credential.
    Skipped,
}

/// Result of one named verification check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationFragment {
    /// Name of the check that produced this fragment.
    pub name: String,
    pub category: FragmentCategory,
    pub status: FragmentStatus,
    /// Human-readable explanation for non-`Valid` outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerificationFragment {
    pub fn valid(name: &str, category: FragmentCategory) -> Self {
        Self {
            name: name.to_string(),
            category,
            status: FragmentStatus::Valid,
            reason: None,
        }
    }

    pub fn invalid(name: &str, category: FragmentCategory, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            category,
            status: FragmentStatus::Invalid,
            reason: Some(reason.into()),
        }
    }

    pub fn error(name: &str, category: FragmentCategory, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            category,
            status: FragmentStatus::Error,
            reason: Some(reason.into()),
        }
    }

    pub fn skipped(name: &str, category: FragmentCategory, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            category,
            status: FragmentStatus::Skipped,
            reason: Some(reason.into()),
        }
    }

    /// Whether this fragment counts toward validity.
    ///
    /// `Skipped` passes; `Error` does not.
    pub fn passes(&self) -> bool {
        matches!(self.status, FragmentStatus::Valid | FragmentStatus::Skipped)
    }
}

/// Aggregate verification outcome for one credential.
///
/// Serializes to the four-flag wire shape relying parties consume:
///
/// ```json
/// {
///   "VALIDITY": true,
///   "DOCUMENT_INTEGRITY": true,
///   "DOCUMENT_STATUS": true,
///   "ISSUER_IDENTITY": true
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VerificationReport {
    integrity: VerificationFragment,
    status: VerificationFragment,
    identity: VerificationFragment,
}

impl VerificationReport {
    pub fn new(
        integrity: VerificationFragment,
        status: VerificationFragment,
        identity: VerificationFragment,
    ) -> Self {
        Self {
            integrity,
            status,
            identity,
        }
    }

    /// Report for input that does not parse as a credential at all.
    ///
    /// Every category fails — nothing can be vouched for.
    pub fn unparseable() -> Self {
        let reason = "credential JSON is unparseable";
        Self {
            integrity: VerificationFragment::invalid(
                "CredentialParse",
                FragmentCategory::DocumentIntegrity,
                reason,
            ),
            status: VerificationFragment::invalid(
                "CredentialParse",
                FragmentCategory::DocumentStatus,
                reason,
            ),
            identity: VerificationFragment::invalid(
                "CredentialParse",
                FragmentCategory::IssuerIdentity,
                reason,
            ),
        }
    }

    pub fn document_integrity(&self) -> bool {
        self.integrity.passes()
    }

    pub fn document_status(&self) -> bool {
        self.status.passes()
    }

    pub fn issuer_identity(&self) -> bool {
        self.identity.passes()
    }

    /// Overall validity: every category passes.
    pub fn validity(&self) -> bool {
        self.document_integrity() && self.document_status() && self.issuer_identity()
    }

    /// The three fragments in category order.
    pub fn fragments(&self) -> [&VerificationFragment; 3] {
        [&self.integrity, &self.status, &self.identity]
    }
}

impl Serialize for VerificationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("VerificationReport", 4)?;
        state.serialize_field("VALIDITY", &self.validity())?;
        state.serialize_field("DOCUMENT_INTEGRITY", &self.document_integrity())?;
        state.serialize_field("DOCUMENT_STATUS", &self.document_status())?;
        state.serialize_field("ISSUER_IDENTITY", &self.issuer_identity())?;
        state.end()
    }
}
