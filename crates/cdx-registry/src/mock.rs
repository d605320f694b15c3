//! # Mock token registry
//!
//! In-memory [`TokenRegistry`] for tests and local development. Simulates
//! registry behavior without a chain: scripted simulation outcomes, an
//! observable submission counter, and a minted-token set backing the
//! `ownerOf` probe.
//!
//! ## Warning
//!
//! Provides NO on-chain guarantees. The submission counter exists so tests
//! can prove the dry-run gate: a scripted `WouldRevert` must leave the
//! counter at zero.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use cdx_core::TokenId;

use crate::fees::FeeQuote;
use crate::registry::{
    MintCall, RegistryError, SimulationOutcome, TokenRegistry, TxHash, TxReceipt, TxStatus,
};

/// Mock registry with scripted behavior.
#[derive(Debug)]
pub struct MockTokenRegistry {
    simulation: Mutex<SimulationOutcome>,
    receipt_status: Mutex<TxStatus>,
    minted: Mutex<HashSet<TokenId>>,
    last_fees: Mutex<Option<FeeQuote>>,
    last_call: Mutex<Option<MintCall>>,
    submissions: AtomicU64,
    next_block: AtomicU64,
}

impl Default for MockTokenRegistry {
    fn default() -> Self {
        Self {
            simulation: Mutex::new(SimulationOutcome::Accepted),
            receipt_status: Mutex::new(TxStatus::Success),
            minted: Mutex::new(HashSet::new()),
            last_fees: Mutex::new(None),
            last_call: Mutex::new(None),
            submissions: AtomicU64::new(0),
            next_block: AtomicU64::new(1),
        }
    }
}

impl MockTokenRegistry {
    /// A mock that accepts simulations and mines successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome of subsequent simulations.
    pub fn script_simulation(&self, outcome: SimulationOutcome) {
        *lock(&self.simulation) = outcome;
    }

    /// Script the status of subsequent receipts.
    pub fn script_receipt_status(&self, status: TxStatus) {
        *lock(&self.receipt_status) = status;
    }

    /// Pre-seed a token as already minted.
    pub fn mark_minted(&self, token_id: TokenId) {
        lock(&self.minted).insert(token_id);
    }

    /// Number of `submit_mint` calls observed.
    pub fn submissions(&self) -> u64 {
        self.submissions.load(Ordering::SeqCst)
    }

    /// The fee quote passed to the most recent submission.
    pub fn last_fee_quote(&self) -> Option<FeeQuote> {
        *lock(&self.last_fees)
    }

    /// The call passed to the most recent submission.
    pub fn last_mint_call(&self) -> Option<MintCall> {
        lock(&self.last_call).clone()
    }
}

impl TokenRegistry for MockTokenRegistry {
    async fn simulate_mint(&self, call: &MintCall) -> SimulationOutcome {
        if lock(&self.minted).contains(&call.token_id) {
            return SimulationOutcome::WouldRevert {
                reason: "execution reverted: token already minted".to_string(),
            };
        }
        lock(&self.simulation).clone()
    }

    async fn submit_mint(
        &self,
        call: &MintCall,
        fees: Option<&FeeQuote>,
    ) -> Result<TxHash, RegistryError> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        *lock(&self.last_fees) = fees.copied();
        *lock(&self.last_call) = Some(call.clone());
        lock(&self.minted).insert(call.token_id);

        let id_prefix = call.token_id.to_hex();
        let id_prefix = id_prefix.get(2..18).unwrap_or("unknown");
        Ok(TxHash::new(format!("mock-tx-{n}-{id_prefix}")))
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> Result<TxReceipt, RegistryError> {
        Ok(TxReceipt {
            tx_hash: tx_hash.clone(),
            block_number: self.next_block.fetch_add(1, Ordering::SeqCst),
            status: *lock(&self.receipt_status),
        })
    }

    async fn token_exists(&self, token_id: &TokenId) -> Result<bool, RegistryError> {
        Ok(lock(&self.minted).contains(token_id))
    }
}

/// Lock a mock mutex, recovering from poisoning.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
