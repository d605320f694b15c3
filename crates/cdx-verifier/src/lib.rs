//! # cdx-verifier — Credential verification for the Chaindox Stack
//!
//! Answers one question for relying parties: is this credential valid?
//! Three named checks run concurrently and their outcomes aggregate
//! into a [`VerificationReport`]:
//!
//! - **Document integrity** — the Ed25519 proof verifies against the
//!   key the issuer's DID document publishes, and the credential has
//!   not expired.
//! - **Document status** — for transferable records the derived token
//!   exists in the bound registry; for bitstring entries the status
//!   bit is clear.
//! - **Issuer identity** — the issuer's `did:web` document resolves
//!   and authorizes the proof's verification method for assertion.
//!
//! ## Security Invariants
//!
//! - [`verify`] is infallible: every input, including garbage, produces
//!   a report. Unparseable input fails all categories.
//! - A check that cannot complete reports `Error`, which counts
//!   against validity — network trouble never upgrades to a pass.
//! - All network access goes through the [`DocumentLoader`] capability,
//!   so verification runs fully offline under test.

pub mod loader;
pub mod report;
pub mod resolver;
pub mod verify;

pub use loader::{DocumentLoader, HttpDocumentLoader, LoaderError, StaticDocumentLoader};
pub use report::{FragmentCategory, FragmentStatus, VerificationFragment, VerificationReport};
pub use resolver::{resolve_verification_key, DidResolver, ResolveError, WebDidResolver};
pub use verify::{verify, VerifierConfig};
