//! # EVM JSON-RPC registry client
//!
//! Production [`TokenRegistry`] implementation speaking JSON-RPC to an
//! EVM-compatible chain (XDC, Polygon, Ethereum and their testnets).
//!
//! ## How It Works
//!
//! 1. `simulate_mint` dry-runs the calldata via `eth_call` against the
//!    latest block. A node-reported revert is a [`SimulationOutcome`]
//!    answer, not an error.
//! 2. `submit_mint` sends the same calldata via `eth_sendTransaction`.
//!    The JSON-RPC endpoint handles transaction signing — the `from`
//!    wallet must be managed by the provider's signing service.
//! 3. `wait_for_receipt` polls `eth_getTransactionReceipt` on the
//!    configured interval until the transaction mines or the confirmation
//!    bound elapses.
//! 4. `token_exists` probes ERC-721 `ownerOf`; a revert means the token
//!    was never minted.
//!
//! ## Security
//!
//! - The client does NOT hold chain private keys. Transaction signing is
//!   delegated to the RPC endpoint's key management (HSM, KMS, or an
//!   unlocked account).
//! - The `from` wallet must be funded with native token for gas.
//! - All RPC calls use HTTPS in production.

use tokio::time::Instant;
use tracing::debug;

use cdx_core::{hex, TokenId};

use crate::abi;
use crate::fees::FeeQuote;
use crate::registry::{
    MintCall, RegistryConfig, RegistryError, SimulationOutcome, TokenRegistry, TxHash, TxReceipt,
    TxStatus,
};

/// EVM JSON-RPC token registry client.
#[derive(Debug)]
pub struct EvmTokenRegistry {
    client: reqwest::Client,
    config: RegistryConfig,
}

impl EvmTokenRegistry {
    /// Create a client from configuration.
    ///
    /// Rejects zero addresses for the contract and wallet before any call
    /// goes out.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        if config.address.as_bytes() == &[0u8; 20] {
            return Err(RegistryError::InvalidAddress(
                "token registry address is the zero address".to_string(),
            ));
        }
        if config.wallet.as_bytes() == &[0u8; 20] {
            return Err(RegistryError::InvalidAddress(
                "wallet address is the zero address".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RegistryError::Transport {
                endpoint: config.chain.rpc_url.clone(),
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Send a JSON-RPC request and return the `result` member.
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RegistryError> {
        let endpoint = &self.config.chain.rpc_url;
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let resp = self
            .client
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let detail = if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                };
                RegistryError::Transport {
                    endpoint: endpoint.clone(),
                    detail,
                }
            })?;

        if !resp.status().is_success() {
            return Err(RegistryError::Transport {
                endpoint: endpoint.clone(),
                detail: format!("HTTP {}", resp.status()),
            });
        }

        let json: serde_json::Value =
            resp.json().await.map_err(|e| RegistryError::MalformedResponse {
                detail: format!("invalid JSON response: {e}"),
            })?;

        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown RPC error");
            return Err(RegistryError::Rpc {
                message: message.to_string(),
            });
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| RegistryError::MalformedResponse {
                detail: "JSON-RPC response missing 'result'".to_string(),
            })
    }

    fn mint_calldata(&self, call: &MintCall) -> Result<String, RegistryError> {
        let remarks =
            hex::hex_to_bytes(&call.remarks_hex).map_err(|e| RegistryError::MalformedResponse {
                detail: format!("remarks are not valid hex: {e}"),
            })?;
        Ok(abi::encode_mint(
            &call.owner,
            &call.holder,
            &call.token_id,
            &remarks,
        ))
    }
}

impl TokenRegistry for EvmTokenRegistry {
    async fn simulate_mint(&self, call: &MintCall) -> SimulationOutcome {
        let data = match self.mint_calldata(call) {
            Ok(data) => data,
            Err(e) => {
                return SimulationOutcome::TransportError {
                    detail: e.to_string(),
                }
            }
        };

        let call_object = serde_json::json!({
            "from": self.config.wallet.to_hex(),
            "to": self.config.address.to_hex(),
            "data": data,
        });

        match self
            .rpc_call("eth_call", serde_json::json!([call_object, "latest"]))
            .await
        {
            Ok(_) => SimulationOutcome::Accepted,
            Err(RegistryError::Rpc { message }) => {
                debug!(reason = %message, "mint dry run rejected by node");
                SimulationOutcome::WouldRevert { reason: message }
            }
            Err(e) => SimulationOutcome::TransportError {
                detail: e.to_string(),
            },
        }
    }

    async fn submit_mint(
        &self,
        call: &MintCall,
        fees: Option<&FeeQuote>,
    ) -> Result<TxHash, RegistryError> {
        let data = self.mint_calldata(call)?;

        let mut tx = serde_json::json!({
            "from": self.config.wallet.to_hex(),
            "to": self.config.address.to_hex(),
            "data": data,
        });
        if let Some(quote) = fees {
            tx["maxFeePerGas"] = serde_json::json!(format!("0x{:x}", quote.max_fee_per_gas));
            tx["maxPriorityFeePerGas"] =
                serde_json::json!(format!("0x{:x}", quote.max_priority_fee_per_gas));
        }

        let result = self
            .rpc_call("eth_sendTransaction", serde_json::json!([tx]))
            .await?;

        let hash = result
            .as_str()
            .ok_or_else(|| RegistryError::MalformedResponse {
                detail: "eth_sendTransaction returned non-string result".to_string(),
            })?;

        debug!(tx_hash = hash, token_id = %call.token_id, "mint transaction submitted");
        Ok(TxHash::new(hash))
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> Result<TxReceipt, RegistryError> {
        let started = Instant::now();

        loop {
            let receipt = self
                .rpc_call(
                    "eth_getTransactionReceipt",
                    serde_json::json!([tx_hash.as_str()]),
                )
                .await?;

            if !receipt.is_null() {
                return Ok(receipt_from_json(tx_hash, &receipt));
            }

            if started.elapsed() >= self.config.confirmation_timeout {
                return Err(RegistryError::Timeout {
                    what: format!("receipt for {tx_hash}"),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn token_exists(&self, token_id: &TokenId) -> Result<bool, RegistryError> {
        let call_object = serde_json::json!({
            "to": self.config.address.to_hex(),
            "data": abi::encode_owner_of(token_id),
        });

        match self
            .rpc_call("eth_call", serde_json::json!([call_object, "latest"]))
            .await
        {
            Ok(result) => Ok(result.as_str().is_some_and(word_is_nonzero)),
            // ownerOf reverts for tokens that were never minted.
            Err(RegistryError::Rpc { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Build a receipt from a non-null `eth_getTransactionReceipt` result.
fn receipt_from_json(tx_hash: &TxHash, receipt: &serde_json::Value) -> TxReceipt {
    let status = match receipt.get("status").and_then(|s| s.as_str()) {
        Some("0x1") => TxStatus::Success,
        _ => TxStatus::Reverted,
    };
    let block_number = receipt
        .get("blockNumber")
        .and_then(|b| b.as_str())
        .and_then(parse_quantity)
        .unwrap_or(0);

    TxReceipt {
        tx_hash: tx_hash.clone(),
        block_number,
        status,
    }
}

/// Parse a JSON-RPC hex quantity (`0x`-prefixed) into a u64.
fn parse_quantity(hex_str: &str) -> Option<u64> {
    u64::from_str_radix(hex_str.trim_start_matches("0x"), 16).ok()
}

/// True if an `eth_call` return word holds any non-zero byte.
fn word_is_nonzero(word: &str) -> bool {
    let bare = word.trim_start_matches("0x");
    !bare.is_empty() && bare.chars().any(|c| c != '0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainProfile, ChainRegistry};
    use crate::fees::FeeStrategy;
    use cdx_core::EvmAddress;

    fn config() -> RegistryConfig {
        RegistryConfig::new(
            "0x1111111111111111111111111111111111111111".parse().unwrap(),
            "0x2222222222222222222222222222222222222222".parse().unwrap(),
            ChainRegistry::with_defaults().get(50).unwrap().clone(),
        )
    }

    #[test]
    fn builds_with_valid_config() {
        let registry = EvmTokenRegistry::new(config()).unwrap();
        assert_eq!(registry.config().chain.chain_id, 50);
    }

    #[test]
    fn rejects_zero_contract_address() {
        let mut cfg = config();
        cfg.address = EvmAddress::parse("0x0000000000000000000000000000000000000000").unwrap();
        assert!(matches!(
            EvmTokenRegistry::new(cfg),
            Err(RegistryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn rejects_zero_wallet_address() {
        let mut cfg = config();
        cfg.wallet = EvmAddress::parse("0x0000000000000000000000000000000000000000").unwrap();
        assert!(matches!(
            EvmTokenRegistry::new(cfg),
            Err(RegistryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn mint_calldata_includes_remarks_bytes() {
        let registry = EvmTokenRegistry::new(config()).unwrap();
        let call = MintCall {
            owner: "0x3333333333333333333333333333333333333333".parse().unwrap(),
            holder: "0x4444444444444444444444444444444444444444".parse().unwrap(),
            token_id: TokenId::from_bytes([9u8; 32]),
            remarks_hex: "0xdeadbeef".to_string(),
        };

        let calldata = registry.mint_calldata(&call).unwrap();
        assert!(calldata.contains("deadbeef"));
        assert!(calldata.starts_with("0x"));
    }

    #[test]
    fn mint_calldata_rejects_bad_remarks_hex() {
        let registry = EvmTokenRegistry::new(config()).unwrap();
        let call = MintCall {
            owner: "0x3333333333333333333333333333333333333333".parse().unwrap(),
            holder: "0x4444444444444444444444444444444444444444".parse().unwrap(),
            token_id: TokenId::from_bytes([9u8; 32]),
            remarks_hex: "0xzz".to_string(),
        };
        assert!(registry.mint_calldata(&call).is_err());
    }

    #[test]
    fn parse_quantity_hex() {
        assert_eq!(parse_quantity("0x0"), Some(0));
        assert_eq!(parse_quantity("0x10"), Some(16));
        assert_eq!(parse_quantity("0x2a"), Some(42));
        assert_eq!(parse_quantity("0xzz"), None);
    }

    #[test]
    fn word_is_nonzero_cases() {
        assert!(!word_is_nonzero("0x"));
        assert!(!word_is_nonzero(&format!("0x{}", "0".repeat(64))));
        assert!(word_is_nonzero(&format!(
            "0x{}1111111111111111111111111111111111111111",
            "0".repeat(24)
        )));
    }

    #[test]
    fn receipt_success_and_revert() {
        let hash = TxHash::new("0xabc");

        let mined = serde_json::json!({ "status": "0x1", "blockNumber": "0x10" });
        let receipt = receipt_from_json(&hash, &mined);
        assert_eq!(receipt.status, TxStatus::Success);
        assert_eq!(receipt.block_number, 16);

        let reverted = serde_json::json!({ "status": "0x0", "blockNumber": "0x11" });
        let receipt = receipt_from_json(&hash, &reverted);
        assert_eq!(receipt.status, TxStatus::Reverted);
        assert_eq!(receipt.block_number, 17);
    }

    #[test]
    fn receipt_missing_fields_degrade() {
        let hash = TxHash::new("0xabc");
        let receipt = receipt_from_json(&hash, &serde_json::json!({}));
        assert_eq!(receipt.status, TxStatus::Reverted);
        assert_eq!(receipt.block_number, 0);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_outcome() {
        // Reserved TEST-NET-1 address; nothing listens there.
        let chain = ChainProfile::new(
            50,
            "XDC",
            "http://192.0.2.1:8545",
            FeeStrategy::NodeDefault,
        );
        let mut cfg = RegistryConfig::new(
            "0x1111111111111111111111111111111111111111".parse().unwrap(),
            "0x2222222222222222222222222222222222222222".parse().unwrap(),
            chain,
        );
        cfg.request_timeout = std::time::Duration::from_millis(200);

        let registry = EvmTokenRegistry::new(cfg).unwrap();
        let call = MintCall {
            owner: "0x3333333333333333333333333333333333333333".parse().unwrap(),
            holder: "0x4444444444444444444444444444444444444444".parse().unwrap(),
            token_id: TokenId::from_bytes([9u8; 32]),
            remarks_hex: "0x00".to_string(),
        };

        match registry.simulate_mint(&call).await {
            SimulationOutcome::TransportError { .. } => {}
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
