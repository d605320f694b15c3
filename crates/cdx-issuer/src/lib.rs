//! # cdx-issuer — Issuance Pipeline for the Chaindox Stack
//!
//! Turns a document request into a signed verifiable credential backed by a
//! minted transferable record:
//!
//! - [`Issuer`] — build, sign, dry-run, fee-quote, mint, confirm
//! - [`IssueRequest`] — raw document payload plus mint parties
//! - [`Issuance`] — the signed credential together with its mint receipt
//!
//! ## Security Invariants
//!
//! - Signing keys stay behind the `ProofSigner` capability; this crate never
//!   touches raw key material.
//! - No transaction is submitted without a passing dry run in the same
//!   pipeline run.
//! - A signed credential without a mined, successful mint receipt is an
//!   error, never a partial result.

pub mod pipeline;

pub use pipeline::{Issuance, IssueError, IssueRequest, Issuer, IssuerConfig, MintParties};
