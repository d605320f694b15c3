//! # Issuance pipeline
//!
//! Orchestrates the full path from document template to minted transferable
//! record: build, sign, derive the token id, encrypt remarks, dry-run the
//! mint, quote fees, submit, and wait for the mined receipt.
//!
//! ## Security Invariants
//!
//! - A credential is never returned without its mint receipt. Signed but not
//!   minted is a failure, not a partial success.
//! - Every submission is preceded by an `eth_call` dry run in the same
//!   pipeline run. A predicted revert ([`IssueError::MintWouldFail`]) leaves
//!   zero transactions in the mempool.
//! - Fees are re-quoted on every attempt, never cached across runs.
//!
//! ## How It Works
//!
//! ```text
//! IssueRequest ──▶ build ──▶ sign ──▶ (token id ∥ remarks) ──▶ simulate
//!                                                                  │
//!                       receipt ◀── wait ◀── submit ◀── fees ◀─────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use cdx_core::EvmAddress;
use cdx_crypto::{encrypt_remarks, ProofSigner, RemarksError};
use cdx_registry::{
    quote_fees, ChainProfile, MintCall, RegistryError, SimulationOutcome, TokenRegistry, TxHash,
    TxReceipt, TxStatus,
};
use cdx_vc::{
    derive_token_id, BuildError, ChainBinding, DocumentBuilder, DocumentTemplate, TokenIdError,
    VerifiableCredential,
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from the issuance pipeline.
///
/// Chain-side failures keep their phase visible: [`IssueError::MintWouldFail`]
/// never reached the mempool, while [`IssueError::MintReverted`] names a
/// transaction that was mined and failed.
#[derive(Error, Debug)]
pub enum IssueError {
    /// The pipeline configuration is incomplete.
    #[error("issuer configuration missing: {what}")]
    ConfigurationMissing { what: String },

    /// Building the credential from the template failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The signer could not produce a proof.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Token id derivation from the signed credential failed.
    #[error(transparent)]
    TokenId(#[from] TokenIdError),

    /// Remarks encryption failed.
    #[error(transparent)]
    Remarks(#[from] RemarksError),

    /// The dry run predicts an on-chain revert. Nothing was submitted.
    #[error("mint would fail: {reason}")]
    MintWouldFail { reason: String },

    /// The chain endpoint could not be reached.
    #[error("chain unavailable: {detail}")]
    ChainUnavailable { detail: String },

    /// The fee oracle failed or returned degenerate values.
    #[error("fee quote failed: {0}")]
    FeeQuoteFailed(#[source] RegistryError),

    /// The node rejected the mint transaction.
    #[error("mint submission failed: {0}")]
    MintSubmissionFailed(#[source] RegistryError),

    /// The mint transaction was mined and reverted.
    #[error("mint transaction {tx_hash} reverted on chain")]
    MintReverted { tx_hash: TxHash },

    /// Waiting for the mined receipt failed or timed out.
    #[error("mint receipt not confirmed: {0}")]
    ReceiptFailed(#[source] RegistryError),
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A raw issuance request: document payload plus mint parties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    /// Document-type key, e.g. `"BILL_OF_LADING"`. Case-insensitive.
    pub document_type: String,
    /// Claims embedded as `credentialSubject`.
    pub credential_subject: serde_json::Value,
    /// Initial beneficiary owner of the transferable record.
    pub owner: EvmAddress,
    /// Initial holder of the transferable record.
    pub holder: EvmAddress,
    /// Confidential remarks, encrypted before they reach the chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Mint parties for a credential prepared outside the builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintParties {
    pub owner: EvmAddress,
    pub holder: EvmAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// A successfully issued document: the signed credential together with the
/// receipt of its mint transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issuance {
    pub credential: VerifiableCredential,
    pub receipt: TxReceipt,
}

// ---------------------------------------------------------------------------
// Issuer
// ---------------------------------------------------------------------------

/// Issuer-side configuration: who signs and where records are minted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// DID recorded as the credential issuer, e.g. `"did:web:chaindox.com"`.
    pub issuer_did: String,
    /// Token registry contract backing new transferable records.
    pub registry_address: EvmAddress,
    /// Chain profile the records bind to.
    pub chain: ChainProfile,
}

/// The issuance pipeline over a token registry.
pub struct Issuer<R> {
    registry: R,
    config: IssuerConfig,
    http: reqwest::Client,
}

impl<R> std::fmt::Debug for Issuer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Issuer")
            .field("issuer_did", &self.config.issuer_did)
            .field("chain_id", &self.config.chain.chain_id)
            .finish()
    }
}

impl<R: TokenRegistry> Issuer<R> {
    /// Create an issuer over a registry.
    ///
    /// Configuration is validated up front so a broken deployment fails at
    /// startup, not halfway through a pipeline run.
    pub fn new(registry: R, config: IssuerConfig) -> Result<Self, IssueError> {
        if config.issuer_did.trim().is_empty() {
            return Err(IssueError::ConfigurationMissing {
                what: "issuer DID".to_string(),
            });
        }
        if config.registry_address.as_bytes() == &[0u8; 20] {
            return Err(IssueError::ConfigurationMissing {
                what: "token registry address".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| IssueError::ChainUnavailable {
                detail: format!("failed to build fee oracle client: {e}"),
            })?;

        Ok(Self {
            registry,
            config,
            http,
        })
    }

    /// The registry this issuer mints against.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The issuer configuration.
    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Chain binding stamped into issued credentials.
    fn chain_binding(&self) -> ChainBinding {
        ChainBinding {
            chain: self.config.chain.currency.clone(),
            chain_id: self.config.chain.chain_id,
            token_registry: self.config.registry_address,
            rpc_provider_url: self.config.chain.rpc_url.clone(),
        }
    }

    /// Issue a document end to end: build, sign, and mint.
    pub async fn issue(
        &self,
        request: IssueRequest,
        signer: &dyn ProofSigner,
    ) -> Result<Issuance, IssueError> {
        debug!(document_type = %request.document_type, "building credential");
        let credential = DocumentBuilder::new(
            DocumentTemplate::new(&request.document_type),
            &self.config.issuer_did,
        )
        .subject(request.credential_subject)
        .chain_binding(self.chain_binding())
        .build()?;

        let parties = MintParties {
            owner: request.owner,
            holder: request.holder,
            remarks: request.remarks,
        };
        self.issue_credential(credential, parties, signer).await
    }

    /// Issue a credential prepared outside the builder.
    ///
    /// The credential must be unsigned and must already carry its
    /// transferable-records binding.
    pub async fn issue_credential(
        &self,
        mut credential: VerifiableCredential,
        parties: MintParties,
        signer: &dyn ProofSigner,
    ) -> Result<Issuance, IssueError> {
        if credential.credential_status.is_none() {
            return Err(IssueError::ConfigurationMissing {
                what: "credentialStatus chain binding".to_string(),
            });
        }
        let credential_id =
            credential
                .id
                .clone()
                .ok_or_else(|| IssueError::ConfigurationMissing {
                    what: "credential id".to_string(),
                })?;

        credential
            .sign(signer)
            .map_err(|e| IssueError::SigningFailed(e.to_string()))?;
        debug!(signer = signer.signer_name(), "credential signed");

        // Token id and remarks are independent; both must complete.
        let remarks = parties.remarks.as_deref().unwrap_or("");
        let (token_id, remarks_hex) = tokio::join!(
            async { derive_token_id(&credential) },
            async { encrypt_remarks(remarks, &credential_id) },
        );
        let token_id = token_id?;
        let remarks_hex = remarks_hex?;

        let call = MintCall {
            owner: parties.owner,
            holder: parties.holder,
            token_id,
            remarks_hex,
        };

        // Dry run. A predicted revert costs nothing on chain.
        match self.registry.simulate_mint(&call).await {
            SimulationOutcome::Accepted => {
                debug!(token_id = %token_id.to_hex(), "mint dry run accepted");
            }
            SimulationOutcome::WouldRevert { reason } => {
                warn!(%reason, "mint dry run rejected");
                return Err(IssueError::MintWouldFail { reason });
            }
            SimulationOutcome::TransportError { detail } => {
                return Err(IssueError::ChainUnavailable { detail });
            }
        }

        // Fees are re-quoted per attempt, never cached.
        let fees = quote_fees(&self.http, &self.config.chain.fee_strategy)
            .await
            .map_err(IssueError::FeeQuoteFailed)?;

        let tx_hash = self
            .registry
            .submit_mint(&call, fees.as_ref())
            .await
            .map_err(IssueError::MintSubmissionFailed)?;
        info!(tx_hash = %tx_hash, token_id = %token_id.to_hex(), "mint submitted");

        let receipt = self
            .registry
            .wait_for_receipt(&tx_hash)
            .await
            .map_err(IssueError::ReceiptFailed)?;
        if receipt.status == TxStatus::Reverted {
            return Err(IssueError::MintReverted {
                tx_hash: receipt.tx_hash,
            });
        }
        info!(block = receipt.block_number, "mint confirmed");

        Ok(Issuance {
            credential,
            receipt,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
