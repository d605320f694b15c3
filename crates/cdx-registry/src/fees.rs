//! # EIP-1559 fee strategies
//!
//! One fee capability is chosen at configuration time and re-evaluated on
//! every submission attempt — quotes are never cached across attempts.
//!
//! ## Security Invariant
//!
//! Zero fees are never produced implicitly. An oracle that returns missing
//! or degenerate values is an error, and the only way to submit with zero
//! fees is an explicit `Fixed` configuration, which is logged at warn.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::registry::RegistryError;

/// An EIP-1559 fee quote in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// How submission fees are determined, chosen per chain profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum FeeStrategy {
    /// Omit fee fields; the node prices the transaction.
    NodeDefault,

    /// Fetch a quote from a gas station endpoint per attempt.
    Oracle { url: String },

    /// Explicit values. Zero is permitted here and only here.
    Fixed {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

/// Produce the fee quote for one submission attempt.
///
/// `None` means the transaction goes out without fee fields and the node
/// decides. Oracle fetches happen fresh on every call.
pub async fn quote_fees(
    client: &reqwest::Client,
    strategy: &FeeStrategy,
) -> Result<Option<FeeQuote>, RegistryError> {
    match strategy {
        FeeStrategy::NodeDefault => Ok(None),

        FeeStrategy::Fixed {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } => {
            if *max_fee_per_gas == 0 || *max_priority_fee_per_gas == 0 {
                warn!(
                    max_fee_per_gas,
                    max_priority_fee_per_gas, "submitting with explicitly configured zero fees"
                );
            }
            Ok(Some(FeeQuote {
                max_fee_per_gas: *max_fee_per_gas,
                max_priority_fee_per_gas: *max_priority_fee_per_gas,
            }))
        }

        FeeStrategy::Oracle { url } => {
            let resp = client.get(url).send().await.map_err(|e| {
                RegistryError::FeeOracle {
                    detail: format!("{url}: {e}"),
                }
            })?;

            if !resp.status().is_success() {
                return Err(RegistryError::FeeOracle {
                    detail: format!("{url}: HTTP {}", resp.status()),
                });
            }

            let body: Value = resp.json().await.map_err(|e| RegistryError::FeeOracle {
                detail: format!("{url}: invalid JSON: {e}"),
            })?;

            parse_gas_station(&body).map(Some)
        }
    }
}

/// Parse a Polygon-style gas station response.
///
/// Expected shape: `{"fast": {"maxFee": <gwei>, "maxPriorityFee": <gwei>},
/// ...}` with gwei as floats. The `fast` tier is used.
pub fn parse_gas_station(body: &Value) -> Result<FeeQuote, RegistryError> {
    let fast = body
        .get("fast")
        .ok_or_else(|| RegistryError::FeeOracle {
            detail: "gas station response has no 'fast' tier".to_string(),
        })?;

    let max_fee_per_gas = gwei_field(fast, "maxFee")?;
    let max_priority_fee_per_gas = gwei_field(fast, "maxPriorityFee")?;

    Ok(FeeQuote {
        max_fee_per_gas,
        max_priority_fee_per_gas,
    })
}

fn gwei_field(tier: &Value, field: &str) -> Result<u128, RegistryError> {
    let gwei = tier
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| RegistryError::FeeOracle {
            detail: format!("gas station tier missing numeric '{field}'"),
        })?;
    gwei_to_wei(gwei).map_err(|detail| RegistryError::FeeOracle {
        detail: format!("'{field}': {detail}"),
    })
}

/// Convert a gwei float to integer wei, rejecting degenerate values.
fn gwei_to_wei(gwei: f64) -> Result<u128, String> {
    if !gwei.is_finite() {
        return Err(format!("non-finite value {gwei}"));
    }
    if gwei <= 0.0 {
        return Err(format!("non-positive value {gwei}"));
    }
    Ok((gwei * 1_000_000_000.0).round() as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_polygon_gas_station_shape() {
        let body = serde_json::json!({
            "safeLow": { "maxPriorityFee": 30.0, "maxFee": 30.0 },
            "standard": { "maxPriorityFee": 32.4, "maxFee": 32.5 },
            "fast": { "maxPriorityFee": 35.1, "maxFee": 36.2 },
            "estimatedBaseFee": 0.0000000076,
            "blockTime": 2,
            "blockNumber": 48924412
        });

        let quote = parse_gas_station(&body).unwrap();
        assert_eq!(quote.max_fee_per_gas, 36_200_000_000);
        assert_eq!(quote.max_priority_fee_per_gas, 35_100_000_000);
    }

    #[test]
    fn fractional_gwei_rounds_to_wei() {
        let body = serde_json::json!({
            "fast": { "maxPriorityFee": 1.5, "maxFee": 2.000000001 }
        });
        let quote = parse_gas_station(&body).unwrap();
        assert_eq!(quote.max_priority_fee_per_gas, 1_500_000_000);
        assert_eq!(quote.max_fee_per_gas, 2_000_000_001);
    }

    #[test]
    fn missing_tier_is_an_error() {
        let body = serde_json::json!({ "standard": { "maxFee": 30.0 } });
        let err = parse_gas_station(&body).unwrap_err();
        assert!(matches!(err, RegistryError::FeeOracle { .. }));
    }

    #[test]
    fn missing_field_is_an_error() {
        let body = serde_json::json!({ "fast": { "maxFee": 30.0 } });
        assert!(parse_gas_station(&body).is_err());
    }

    #[test]
    fn zero_oracle_values_are_an_error_not_a_quote() {
        let body = serde_json::json!({
            "fast": { "maxPriorityFee": 0.0, "maxFee": 30.0 }
        });
        assert!(parse_gas_station(&body).is_err());

        let body = serde_json::json!({
            "fast": { "maxPriorityFee": 30.0, "maxFee": 0 }
        });
        assert!(parse_gas_station(&body).is_err());
    }

    #[test]
    fn negative_and_non_finite_rejected() {
        assert!(gwei_to_wei(-1.0).is_err());
        assert!(gwei_to_wei(f64::NAN).is_err());
        assert!(gwei_to_wei(f64::INFINITY).is_err());
        assert!(gwei_to_wei(30.0).is_ok());
    }

    #[tokio::test]
    async fn node_default_quotes_nothing() {
        let client = reqwest::Client::new();
        let quote = quote_fees(&client, &FeeStrategy::NodeDefault).await.unwrap();
        assert!(quote.is_none());
    }

    #[tokio::test]
    async fn fixed_strategy_passes_values_through() {
        let client = reqwest::Client::new();
        let strategy = FeeStrategy::Fixed {
            max_fee_per_gas: 25_000_000_000,
            max_priority_fee_per_gas: 1_000_000_000,
        };
        let quote = quote_fees(&client, &strategy).await.unwrap().unwrap();
        assert_eq!(quote.max_fee_per_gas, 25_000_000_000);
        assert_eq!(quote.max_priority_fee_per_gas, 1_000_000_000);
    }

    #[tokio::test]
    async fn fixed_zero_is_permitted() {
        // Explicit zeros are configuration, not an error.
        let client = reqwest::Client::new();
        let strategy = FeeStrategy::Fixed {
            max_fee_per_gas: 0,
            max_priority_fee_per_gas: 0,
        };
        let quote = quote_fees(&client, &strategy).await.unwrap().unwrap();
        assert_eq!(quote.max_fee_per_gas, 0);
    }

    #[test]
    fn strategy_serde_shapes() {
        let json = serde_json::to_value(&FeeStrategy::NodeDefault).unwrap();
        assert_eq!(json["strategy"], "node_default");

        let json = serde_json::to_value(&FeeStrategy::Oracle {
            url: "https://gasstation.polygon.technology/v2".to_string(),
        })
        .unwrap();
        assert_eq!(json["strategy"], "oracle");
        assert_eq!(json["url"], "https://gasstation.polygon.technology/v2");

        let fixed: FeeStrategy = serde_json::from_value(serde_json::json!({
            "strategy": "fixed",
            "max_fee_per_gas": 25000000000u64,
            "max_priority_fee_per_gas": 1000000000u64
        }))
        .unwrap();
        assert!(matches!(fixed, FeeStrategy::Fixed { .. }));
    }
}
