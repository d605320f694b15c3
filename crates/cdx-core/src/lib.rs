//! # cdx-core — Foundational Types for the Chaindox Stack
//!
//! This crate is the bedrock of the Chaindox Stack. It defines the core
//! type-system primitives that enforce correctness guarantees at compile
//! time. Every other crate in the workspace depends on `cdx-core`; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** ALL signing and digest computation flows
//!    through `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for
//!    digests, ever. A credential must hash to the same token identifier on
//!    every node, and a single construction path makes a serialization split
//!    impossible by construction.
//!
//! 2. **Newtype wrappers for chain-facing values.** `TokenId` and
//!    `EvmAddress` have validated constructors and fixed wire formats.
//!    No bare strings for identifiers that end up in transactions.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, and owns the calendar-month expiry
//!    arithmetic (month-end clamping).
//!
//! 4. **Digest functions accept only `&CanonicalBytes`.** Compile-time
//!    enforcement that all content digest paths flow through
//!    canonicalization. Keccak-256 for on-chain identifiers, SHA-256 for
//!    everything off-chain.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cdx-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod address;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod hex;
pub mod temporal;
pub mod token;

// Re-export primary types for ergonomic imports.
pub use address::EvmAddress;
pub use canonical::CanonicalBytes;
pub use digest::{
    keccak256_bytes, keccak256_digest, sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm,
};
pub use error::{CanonicalizationError, CdxError, CryptoError};
pub use temporal::Timestamp;
pub use token::TokenId;
