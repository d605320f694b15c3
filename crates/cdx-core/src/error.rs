//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the Chaindox Stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Cryptographic errors fail loudly with full context.
//! - Validation errors name the field and the rule that rejected it.
//! - Crate-specific failures (document building, minting, status lists)
//!   define their own enums next to the code that raises them; only
//!   cross-cutting errors live here.

use thiserror::Error;

/// Top-level error type for the Chaindox Stack.
#[derive(Error, Debug)]
pub enum CdxError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A value failed structural validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Amounts and indexes must be strings or integers.
    #[error("float values are not permitted in canonical representations; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Producing a signature failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key generation, parsing, or decoding failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Symmetric encryption or decryption failed.
    #[error("cipher error: {0}")]
    CipherFailed(String),
}
