use alloy_primitives::utils::format_ether;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

use super::client::JsonRpcClient;
use crate::chain::Chain;
use crate::config::NetworkConfig;
use crate::error::{AppError, AppResult};

/// Reads the ETH balance of an address. Results are never cached.
#[async_trait]
pub trait BalanceOracle: Send + Sync {
    /// Decimal ETH string, e.g. `"0.015"`
    async fn balance(&self, chain: Chain, address: Address) -> AppResult<String>;
}

/// `eth_getBalance` against the configured public RPC for each chain
#[derive(Debug, Clone)]
pub struct RpcBalanceOracle {
    network: NetworkConfig,
}

impl RpcBalanceOracle {
    pub fn new(network: NetworkConfig) -> Self {
        Self { network }
    }

    pub fn rpc_url(&self, chain: Chain) -> String {
        self.network.rpc_url(chain)
    }
}

#[async_trait]
impl BalanceOracle for RpcBalanceOracle {
    async fn balance(&self, chain: Chain, address: Address) -> AppResult<String> {
        let client = JsonRpcClient::with_timeout(
            self.rpc_url(chain),
            Duration::from_secs(self.network.timeout_secs),
        )?;
        let raw: String = client
            .call("eth_getBalance", json!([address.to_checksum(None), "latest"]))
            .await
            .map_err(|e| {
                error!("Balance fetch failed on {}: {}", chain, e);
                e
            })?;

        let wei = parse_quantity(&raw)?;
        debug!("Balance of {} on {}: {} wei", address, chain, wei);
        Ok(format_ether_display(wei))
    }
}

/// Parse a JSON-RPC hex quantity (`"0x1bc16d674ec80000"`)
pub(crate) fn parse_quantity(raw: &str) -> AppResult<U256> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| AppError::internal(format!("invalid quantity {:?}: {}", raw, e)))
}

/// Ether amount without trailing zeros, keeping one fractional digit
pub fn format_ether_display(wei: U256) -> String {
    let full = format_ether(wei);
    match full.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => format!("{}.0", full),
    }
}
