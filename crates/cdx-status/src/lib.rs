//! # cdx-status — Bitstring status lists for the Chaindox Stack
//!
//! The off-chain revocation mechanism: each issued credential owns one bit
//! in a published, signed bitstring. Provides:
//!
//! - **The codec** ([`StatusList`]): fixed-length bitstring, GZIP +
//!   unpadded base64url with multibase `u` prefix, leftmost bit first.
//! - **Credential payloads** ([`credential_status_payload`]): the unsigned
//!   `BitstringStatusListCredential` ready for signing and hosting, plus
//!   the per-document [`status_entry`] referencing it.
//! - **Subject extraction** ([`extract_list_subject`]) for reading fetched
//!   list credentials, tolerant of foreign envelope members.

pub mod list;
pub mod payload;

pub use list::{StatusList, StatusListError, StatusPurpose, DEFAULT_LIST_LENGTH};
pub use payload::{
    credential_status_payload, extract_list_subject, status_entry, StatusListSubject,
    BITSTRING_STATUS_CONTEXT, STATUS_LIST_CREDENTIAL_TYPE, STATUS_LIST_SUBJECT_TYPE,
};
