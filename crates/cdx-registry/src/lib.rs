//! # cdx-registry — Token registry access for the Chaindox Stack
//!
//! Everything between the issuance pipeline and the chain:
//!
//! - **Chain profiles** ([`ChainRegistry`]) with the deployment defaults
//!   for XDC, Polygon, Ethereum and their testnets.
//! - **Fee strategies** ([`FeeStrategy`]): node-priced, gas-station oracle,
//!   or explicit fixed values — re-quoted on every attempt.
//! - **The registry capability** ([`TokenRegistry`]): simulate, submit,
//!   await receipt, probe existence.
//! - **The EVM client** ([`EvmTokenRegistry`]) over JSON-RPC, with
//!   transaction signing delegated to the endpoint's key management.
//! - **A mock** ([`MockTokenRegistry`]) with an observable submission
//!   counter for proving dry-run gating.

pub mod abi;
pub mod chain;
pub mod evm;
pub mod fees;
pub mod mock;
pub mod registry;

pub use chain::{ChainProfile, ChainRegistry, DEFAULT_CHAIN_ID};
pub use evm::EvmTokenRegistry;
pub use fees::{quote_fees, FeeQuote, FeeStrategy};
pub use mock::MockTokenRegistry;
pub use registry::{
    MintCall, RegistryConfig, RegistryError, SimulationOutcome, TokenRegistry, TxHash, TxReceipt,
    TxStatus,
};
