//! Recent account activity from the Etherscan V2 API.
//!
//! The API reports "nothing here" in several shapes: a string `result`,
//! `status == "0"` with "No transactions found", or an unexpected status.
//! All of them collapse to an empty list; only transport and decode
//! failures surface as errors.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};
use usethrow_types::etherscan::{self, TxListResponse, TxListResult};

use crate::chain::Chain;
use crate::config::ExplorerConfig;
use crate::error::{AppError, AppResult};
use crate::rpc::format_ether_display;

/// One row of account history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Wei
    pub value: U256,
    /// Unix seconds
    pub timestamp: i64,
}

impl TransactionRecord {
    /// `None` when the value or timestamp is not a decimal integer
    fn from_wire(tx: etherscan::Transaction) -> Option<Self> {
        let (Ok(value), Ok(timestamp)) = (
            U256::from_str_radix(&tx.value, 10),
            tx.time_stamp.parse::<i64>(),
        ) else {
            warn!(
                "Skipping malformed transaction {} (value {:?}, timeStamp {:?})",
                tx.hash, tx.value, tx.time_stamp
            );
            return None;
        };
        Some(Self {
            value,
            timestamp,
            hash: tx.hash,
            from: tx.from,
            to: tx.to,
        })
    }

    pub fn value_ether(&self) -> String {
        format_ether_display(self.value)
    }

    /// First 16 characters of the hash followed by an ellipsis
    pub fn short_hash(&self) -> String {
        let prefix: String = self.hash.chars().take(16).collect();
        format!("{}…", prefix)
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Whether `address` sent this transaction
    pub fn is_outgoing(&self, address: Address) -> bool {
        self.from.eq_ignore_ascii_case(&address.to_string())
    }
}

/// Source of recent transactions, most recent first
#[async_trait]
pub trait ActivityOracle: Send + Sync {
    async fn recent(&self, chain: Chain, address: Address) -> AppResult<Vec<TransactionRecord>>;
}

/// Etherscan V2 `account/txlist` client
pub struct EtherscanClient {
    http: Client,
    config: ExplorerConfig,
}

impl std::fmt::Debug for EtherscanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtherscanClient")
            .field("api_url", &self.config.api_url)
            .field("page_size", &self.config.page_size)
            .finish_non_exhaustive()
    }
}

impl EtherscanClient {
    pub fn new(config: ExplorerConfig, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, config })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AppError::MissingApiKey)
    }

    /// Query string for `txlist`, newest first
    fn query(&self, chain: Chain, address: Address, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("chainid", chain.id().to_string()),
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", address.to_checksum(None)),
            ("startblock", "0".to_string()),
            ("endblock", "99999999".to_string()),
            ("page", "1".to_string()),
            ("offset", self.config.page_size.to_string()),
            ("sort", "desc".to_string()),
            ("apikey", api_key.to_string()),
        ]
    }

    /// Reduce every response shape to a list
    fn collapse(&self, response: TxListResponse) -> Vec<TransactionRecord> {
        let txs = match response.result {
            Some(TxListResult::Transactions(txs)) => txs,
            Some(TxListResult::Message(msg)) => {
                warn!("Explorer returned message instead of list: {}", msg);
                return Vec::new();
            }
            Some(TxListResult::Other(_)) | None => {
                warn!("No valid result array in explorer response");
                return Vec::new();
            }
        };

        if response.status != etherscan::STATUS_OK {
            if response.message == etherscan::NO_TRANSACTIONS {
                debug!("No transactions found");
            } else {
                warn!("Unexpected explorer status: {:?}", response.status);
            }
            return Vec::new();
        }

        txs.into_iter()
            .take(self.config.page_size as usize)
            .filter_map(TransactionRecord::from_wire)
            .collect()
    }
}

#[async_trait]
impl ActivityOracle for EtherscanClient {
    async fn recent(&self, chain: Chain, address: Address) -> AppResult<Vec<TransactionRecord>> {
        let api_key = self.api_key()?;
        let query = self.query(chain, address, api_key);

        debug!("Fetching activity for {} on {}", address, chain);
        let response: TxListResponse = self
            .http
            .get(&self.config.api_url)
            .query(&query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!("Tx fetch failed: {}", e);
                AppError::Http(e)
            })?
            .json()
            .await?;

        Ok(self.collapse(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(page_size: u32, api_key: Option<&str>) -> EtherscanClient {
        EtherscanClient::new(
            ExplorerConfig {
                api_url: "http://127.0.0.1:9/api".to_string(),
                api_key: api_key.map(str::to_string),
                page_size,
            },
            Duration::from_secs(1),
        )
        .unwrap()
    }

    fn parse(value: serde_json::Value) -> TxListResponse {
        serde_json::from_value(value).unwrap()
    }

    fn tx(hash: &str) -> serde_json::Value {
        json!({
            "hash": hash,
            "from": "0x1111111111111111111111111111111111111111",
            "to": "0x2222222222222222222222222222222222222222",
            "value": "10000000000000000",
            "timeStamp": "1700000000"
        })
    }

    #[tokio::test]
    async fn missing_key_fails_before_request() {
        let err = client(10, None)
            .recent(Chain::Mainnet, Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingApiKey));

        let err = client(10, Some("   "))
            .recent(Chain::Mainnet, Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingApiKey));
    }

    #[test]
    fn string_result_is_empty() {
        let c = client(10, Some("k"));
        let out = c.collapse(parse(json!({
            "status": "0", "message": "NOTOK", "result": "Max rate limit reached"
        })));
        assert!(out.is_empty());
    }

    #[test]
    fn no_transactions_is_empty() {
        let c = client(10, Some("k"));
        let out = c.collapse(parse(json!({
            "status": "0", "message": "No transactions found", "result": []
        })));
        assert!(out.is_empty());
    }

    #[test]
    fn unexpected_status_is_empty() {
        let c = client(10, Some("k"));
        let out = c.collapse(parse(json!({
            "status": "2", "message": "??", "result": [tx("0xaa")]
        })));
        assert!(out.is_empty());
        let out = c.collapse(parse(json!({"status": "1", "message": "OK", "result": null})));
        assert!(out.is_empty());
        let out = c.collapse(parse(json!({"status": "1", "message": "OK", "result": {"x": 1}})));
        assert!(out.is_empty());
    }

    #[test]
    fn ok_maps_records_in_order() {
        let c = client(2, Some("k"));
        let out = c.collapse(parse(json!({
            "status": "1", "message": "OK",
            "result": [tx("0x03"), tx("0x02"), tx("0x01")]
        })));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].hash, "0x03");
        assert_eq!(out[1].hash, "0x02");
        assert_eq!(out[0].value_ether(), "0.01");
        assert_eq!(out[0].timestamp, 1_700_000_000);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let c = client(10, Some("k"));
        let mut bad_value = tx("0xbad1");
        bad_value["value"] = json!("1e18");
        let mut bad_time = tx("0xbad2");
        bad_time["timeStamp"] = json!("oops");
        let out = c.collapse(parse(json!({
            "status": "1", "message": "OK",
            "result": [bad_value, tx("0x01"), bad_time]
        })));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].hash, "0x01");
        assert_eq!(out[0].value_ether(), "0.01");
    }

    #[test]
    fn query_matches_txlist_contract() {
        let c = client(10, Some("secret"));
        let query = c.query(Chain::Sepolia, Address::ZERO, "secret");
        let get = |k: &str| query.iter().find(|(n, _)| *n == k).map(|(_, v)| v.as_str());
        assert_eq!(get("chainid"), Some("11155111"));
        assert_eq!(get("action"), Some("txlist"));
        assert_eq!(get("offset"), Some("10"));
        assert_eq!(get("sort"), Some("desc"));
        assert_eq!(get("apikey"), Some("secret"));
    }

    #[test]
    fn record_helpers() {
        let record = TransactionRecord {
            hash: "0x0123456789abcdef0123".to_string(),
            from: "0x1111111111111111111111111111111111111111".to_string(),
            to: String::new(),
            value: U256::ZERO,
            timestamp: 0,
        };
        assert_eq!(record.short_hash(), "0x0123456789abcd…");
        assert_eq!(record.time().unwrap().timestamp(), 0);
        let from: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();
        assert!(record.is_outgoing(from));
        assert!(!record.is_outgoing(Address::ZERO));
    }
}
