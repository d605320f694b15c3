//! # Token registry capability
//!
//! The [`TokenRegistry`] trait is the seam between the issuance pipeline
//! and the chain. Simulation, submission, receipt polling, and existence
//! probes are separate operations so the pipeline can gate submission on a
//! successful dry run.
//!
//! ## Security Invariant
//!
//! Implementations must not submit a transaction from `simulate_mint`.
//! The pipeline relies on simulation being free of side effects to
//! guarantee that a rejected dry run leaves zero submissions behind.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cdx_core::{EvmAddress, TokenId};

use crate::chain::ChainProfile;
use crate::fees::FeeQuote;

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The endpoint could not be reached or answered out of protocol.
    #[error("transport failure reaching {endpoint}: {detail}")]
    Transport { endpoint: String, detail: String },

    /// The node returned a JSON-RPC error.
    #[error("RPC error: {message}")]
    Rpc { message: String },

    /// A bounded wait elapsed without a definitive answer.
    #[error("timed out after {waited_secs}s waiting for {what}")]
    Timeout { what: String, waited_secs: u64 },

    /// An address failed validation before any call went out.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The node answered with JSON this client cannot interpret.
    #[error("malformed RPC response: {detail}")]
    MalformedResponse { detail: String },

    /// The fee oracle failed or returned degenerate values.
    #[error("fee oracle error: {detail}")]
    FeeOracle { detail: String },
}

/// A transaction hash returned by the node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal status of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Executed successfully.
    Success,
    /// Mined but reverted.
    Reverted,
}

/// Receipt for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub status: TxStatus,
}

/// One mint call: the token and its initial owner/holder pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintCall {
    /// Initial beneficiary owner recorded by the registry.
    pub owner: EvmAddress,
    /// Initial holder of the transferable record.
    pub holder: EvmAddress,
    /// Token id derived from the signed credential.
    pub token_id: TokenId,
    /// Encrypted remarks as `0x`-prefixed hex (`0x00` when empty).
    pub remarks_hex: String,
}

/// Outcome of a mint dry run.
///
/// Three-way on purpose: a revert is an answer about the call, a transport
/// failure is an answer about the endpoint, and the pipeline treats them
/// differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationOutcome {
    /// The node executed the call without reverting.
    Accepted,
    /// The call would revert if submitted.
    WouldRevert { reason: String },
    /// No answer: the endpoint was unreachable or out of protocol.
    TransportError { detail: String },
}

/// Configuration for a registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Deployed token registry contract.
    pub address: EvmAddress,
    /// Sender address; the RPC endpoint's key management signs for it.
    pub wallet: EvmAddress,
    /// The chain this registry is deployed on.
    pub chain: ChainProfile,
    /// Upper bound on receipt polling.
    pub confirmation_timeout: Duration,
    /// Delay between receipt polls.
    pub poll_interval: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl RegistryConfig {
    /// Defaults: 30s per request, 3s poll interval, 180s confirmation bound.
    pub fn new(address: EvmAddress, wallet: EvmAddress, chain: ChainProfile) -> Self {
        Self {
            address,
            wallet,
            chain,
            confirmation_timeout: Duration::from_secs(180),
            poll_interval: Duration::from_secs(3),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Override the polling bounds.
    pub fn with_polling(mut self, poll_interval: Duration, confirmation_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.confirmation_timeout = confirmation_timeout;
        self
    }
}

/// Capability trait for token registry access.
///
/// Futures are `Send` so callers can drive registry operations from
/// multi-threaded runtimes and join them with other work.
pub trait TokenRegistry: Send + Sync {
    /// Dry-run the mint without submitting anything.
    fn simulate_mint(&self, call: &MintCall) -> impl Future<Output = SimulationOutcome> + Send;

    /// Submit the mint transaction. `fees` of `None` lets the node price it.
    fn submit_mint(
        &self,
        call: &MintCall,
        fees: Option<&FeeQuote>,
    ) -> impl Future<Output = Result<TxHash, RegistryError>> + Send;

    /// Poll until the transaction is mined or the configured bound elapses.
    fn wait_for_receipt(
        &self,
        tx_hash: &TxHash,
    ) -> impl Future<Output = Result<TxReceipt, RegistryError>> + Send;

    /// ERC-721 `ownerOf` probe: `Ok(false)` when the token has no owner.
    fn token_exists(
        &self,
        token_id: &TokenId,
    ) -> impl Future<Output = Result<bool, RegistryError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainRegistry;

    fn sample_config() -> RegistryConfig {
        let chain = ChainRegistry::with_defaults().get(50).unwrap().clone();
        RegistryConfig::new(
            "0x1111111111111111111111111111111111111111".parse().unwrap(),
            "0x2222222222222222222222222222222222222222".parse().unwrap(),
            chain,
        )
    }

    #[test]
    fn config_defaults() {
        let config = sample_config();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.confirmation_timeout, Duration::from_secs(180));
    }

    #[test]
    fn config_with_polling() {
        let config = sample_config()
            .with_polling(Duration::from_millis(10), Duration::from_millis(50));
        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert_eq!(config.confirmation_timeout, Duration::from_millis(50));
    }

    #[test]
    fn tx_hash_display() {
        let hash = TxHash::new("0xabc123");
        assert_eq!(hash.to_string(), "0xabc123");
        assert_eq!(hash.as_str(), "0xabc123");
        assert!(!hash.is_empty());
    }

    #[test]
    fn mint_call_serde_roundtrip() {
        let call = MintCall {
            owner: "0x1111111111111111111111111111111111111111".parse().unwrap(),
            holder: "0x2222222222222222222222222222222222222222".parse().unwrap(),
            token_id: TokenId::from_bytes([7u8; 32]),
            remarks_hex: "0x00".to_string(),
        };
        let json = serde_json::to_string(&call).unwrap();
        let back: MintCall = serde_json::from_str(&json).unwrap();
        assert_eq!(back, call);
    }

    #[test]
    fn simulation_outcome_distinctions() {
        let revert = SimulationOutcome::WouldRevert {
            reason: "execution reverted: token already minted".to_string(),
        };
        let transport = SimulationOutcome::TransportError {
            detail: "connection refused".to_string(),
        };
        assert_ne!(revert, transport);
        assert_ne!(revert, SimulationOutcome::Accepted);
    }
}
