//! # Chain profiles
//!
//! Immutable per-chain configuration: chain id, currency label, default
//! RPC endpoint, and the fee strategy. The [`ChainRegistry`] ships the
//! deployment defaults; operators override by inserting their own profile
//! under the same chain id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fees::FeeStrategy;

/// Chain id issuance defaults to when none is configured (XDC mainnet).
pub const DEFAULT_CHAIN_ID: u64 = 50;

/// Immutable configuration for one EVM chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProfile {
    /// EVM chain identifier.
    pub chain_id: u64,
    /// Currency label stamped into `credentialStatus.chain`.
    pub currency: String,
    /// Default JSON-RPC endpoint.
    pub rpc_url: String,
    /// Fee strategy for submissions on this chain.
    pub fee_strategy: FeeStrategy,
}

impl ChainProfile {
    pub fn new(
        chain_id: u64,
        currency: impl Into<String>,
        rpc_url: impl Into<String>,
        fee_strategy: FeeStrategy,
    ) -> Self {
        Self {
            chain_id,
            currency: currency.into(),
            rpc_url: rpc_url.into(),
            fee_strategy,
        }
    }
}

/// Registry of chain profiles keyed by chain id.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    profiles: BTreeMap<u64, ChainProfile>,
}

impl ChainRegistry {
    /// An empty registry with no profiles.
    pub fn new() -> Self {
        Self::default()
    }

    /// The deployment defaults.
    ///
    /// XDC and Apothem run the standard node fee estimation; Polygon and
    /// Amoy quote from the Polygon gas station per attempt.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for profile in [
            ChainProfile::new(
                50,
                "XDC",
                "https://erpc.xinfin.network",
                FeeStrategy::NodeDefault,
            ),
            ChainProfile::new(
                51,
                "XDCt",
                "https://erpc.apothem.network",
                FeeStrategy::NodeDefault,
            ),
            ChainProfile::new(
                137,
                "MATIC",
                "https://polygon-rpc.com",
                FeeStrategy::Oracle {
                    url: "https://gasstation.polygon.technology/v2".to_string(),
                },
            ),
            ChainProfile::new(
                80002,
                "MATIC",
                "https://rpc-amoy.polygon.technology",
                FeeStrategy::Oracle {
                    url: "https://gasstation.polygon.technology/amoy".to_string(),
                },
            ),
            ChainProfile::new(
                1,
                "ETH",
                "https://ethereum-rpc.publicnode.com",
                FeeStrategy::NodeDefault,
            ),
            ChainProfile::new(
                11155111,
                "ETH",
                "https://ethereum-sepolia-rpc.publicnode.com",
                FeeStrategy::NodeDefault,
            ),
        ] {
            registry.insert(profile);
        }
        registry
    }

    /// Insert or replace the profile for its chain id.
    pub fn insert(&mut self, profile: ChainProfile) {
        self.profiles.insert(profile.chain_id, profile);
    }

    pub fn get(&self, chain_id: u64) -> Option<&ChainProfile> {
        self.profiles.get(&chain_id)
    }

    /// The default issuance profile (XDC mainnet).
    pub fn default_profile(&self) -> Option<&ChainProfile> {
        self.get(DEFAULT_CHAIN_ID)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.profiles.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_deployment_chains() {
        let registry = ChainRegistry::with_defaults();
        assert_eq!(
            registry.chain_ids().collect::<Vec<_>>(),
            vec![1, 50, 51, 137, 80002, 11155111]
        );
    }

    #[test]
    fn xdc_is_the_default_profile() {
        let registry = ChainRegistry::with_defaults();
        let profile = registry.default_profile().unwrap();
        assert_eq!(profile.chain_id, 50);
        assert_eq!(profile.currency, "XDC");
        assert_eq!(profile.rpc_url, "https://erpc.xinfin.network");
        assert_eq!(profile.fee_strategy, FeeStrategy::NodeDefault);
    }

    #[test]
    fn polygon_chains_use_the_gas_station() {
        let registry = ChainRegistry::with_defaults();

        match &registry.get(137).unwrap().fee_strategy {
            FeeStrategy::Oracle { url } => {
                assert_eq!(url, "https://gasstation.polygon.technology/v2")
            }
            other => panic!("expected oracle strategy, got {other:?}"),
        }
        match &registry.get(80002).unwrap().fee_strategy {
            FeeStrategy::Oracle { url } => {
                assert_eq!(url, "https://gasstation.polygon.technology/amoy")
            }
            other => panic!("expected oracle strategy, got {other:?}"),
        }
    }

    #[test]
    fn unknown_chain_id_is_none() {
        let registry = ChainRegistry::with_defaults();
        assert!(registry.get(42161).is_none());
    }

    #[test]
    fn operator_override_replaces_default() {
        let mut registry = ChainRegistry::with_defaults();
        registry.insert(ChainProfile::new(
            50,
            "XDC",
            "https://xdc.internal.example",
            FeeStrategy::Fixed {
                max_fee_per_gas: 12_500_000_000,
                max_priority_fee_per_gas: 12_500_000_000,
            },
        ));

        let profile = registry.get(50).unwrap();
        assert_eq!(profile.rpc_url, "https://xdc.internal.example");
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn profile_serde_roundtrip() {
        let profile = ChainProfile::new(
            137,
            "MATIC",
            "https://polygon-rpc.com",
            FeeStrategy::Oracle {
                url: "https://gasstation.polygon.technology/v2".to_string(),
            },
        );
        let json = serde_json::to_string(&profile).unwrap();
        let back: ChainProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
