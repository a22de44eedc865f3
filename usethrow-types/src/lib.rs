//! Wire types for the external services a burner wallet talks to.
//!
//! `jsonrpc` covers the Ethereum JSON-RPC 2.0 envelope used by both public
//! nodes and signing wallets; `etherscan` covers the account `txlist`
//! response of the Etherscan V2 API.

pub mod jsonrpc {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    pub const VERSION: &str = "2.0";

    #[derive(Debug, Serialize)]
    pub struct Request<'a, P> {
        pub jsonrpc: &'static str,
        pub id: u64,
        pub method: &'a str,
        pub params: P,
    }

    impl<'a, P: Serialize> Request<'a, P> {
        pub fn new(id: u64, method: &'a str, params: P) -> Self {
            Self {
                jsonrpc: VERSION,
                id,
                method,
                params,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct Response<T> {
        #[serde(default)]
        pub id: Option<Value>,
        pub result: Option<T>,
        #[serde(default)]
        pub error: Option<ErrorObject>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ErrorObject {
        pub code: i64,
        pub message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub data: Option<Value>,
    }

    impl ErrorObject {
        /// Some wallets wrap the real failure, e.g. `data.originalError.code`
        pub fn original_code(&self) -> Option<i64> {
            self.data
                .as_ref()
                .and_then(|d| d.get("originalError"))
                .and_then(|e| e.get("code"))
                .and_then(Value::as_i64)
        }
    }

    /// Parameter object for `wallet_switchEthereumChain`
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SwitchChain<'a> {
        pub chain_id: &'a str,
    }

    /// Parameter object for `eth_sendTransaction`; quantities are hex strings
    #[derive(Debug, Serialize)]
    pub struct SendTransaction {
        pub from: String,
        pub to: String,
        pub value: String,
    }

    /// The subset of a receipt needed to tell mined from pending
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Receipt {
        pub transaction_hash: String,
        #[serde(default)]
        pub block_number: Option<String>,
        #[serde(default)]
        pub status: Option<String>,
    }

    impl Receipt {
        pub fn succeeded(&self) -> bool {
            self.status.as_deref() != Some("0x0")
        }
    }
}

pub mod etherscan {
    use serde::Deserialize;
    use serde_json::Value;

    /// `status == "1"` is the only shape that carries transactions
    pub const STATUS_OK: &str = "1";
    pub const NO_TRANSACTIONS: &str = "No transactions found";

    #[derive(Debug, Deserialize)]
    pub struct TxListResponse {
        #[serde(default)]
        pub status: String,
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub result: Option<TxListResult>,
    }

    /// `result` is an array on success and a bare string on most errors
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum TxListResult {
        Transactions(Vec<Transaction>),
        Message(String),
        Other(Value),
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Transaction {
        pub hash: String,
        pub from: String,
        #[serde(default)]
        pub to: String,
        pub value: String,
        #[serde(rename = "timeStamp")]
        pub time_stamp: String,
    }
}

#[cfg(test)]
mod tests {
    use super::etherscan::{TxListResponse, TxListResult};
    use super::jsonrpc::{ErrorObject, Receipt, Request, Response};
    use serde_json::json;

    #[test]
    fn request_envelope() {
        let req = Request::new(7, "eth_getBalance", json!(["0xabc", "latest"]));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "eth_getBalance");
    }

    #[test]
    fn response_with_error() {
        let resp: Response<String> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 4902, "message": "Unrecognized chain ID"}
        }))
        .unwrap();
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, 4902);
    }

    #[test]
    fn wrapped_error_code() {
        let err: ErrorObject = serde_json::from_value(json!({
            "code": -32603,
            "message": "Internal JSON-RPC error.",
            "data": {"originalError": {"code": 4902}}
        }))
        .unwrap();
        assert_eq!(err.original_code(), Some(4902));
    }

    #[test]
    fn txlist_result_shapes() {
        let ok: TxListResponse = serde_json::from_value(json!({
            "status": "1",
            "message": "OK",
            "result": [{
                "hash": "0x01", "from": "0xa", "to": "0xb",
                "value": "1000", "timeStamp": "1700000000", "gas": "21000"
            }]
        }))
        .unwrap();
        assert!(matches!(ok.result, Some(TxListResult::Transactions(ref t)) if t.len() == 1));

        let err: TxListResponse = serde_json::from_value(json!({
            "status": "0", "message": "NOTOK", "result": "Invalid API Key"
        }))
        .unwrap();
        assert!(matches!(err.result, Some(TxListResult::Message(_))));

        let null: TxListResponse = serde_json::from_value(json!({"status": "0"})).unwrap();
        assert!(null.result.is_none());
    }

    #[test]
    fn receipt_status() {
        let failed: Receipt = serde_json::from_value(json!({
            "transactionHash": "0x1", "blockNumber": "0x10", "status": "0x0"
        }))
        .unwrap();
        assert!(!failed.succeeded());
    }
}
