use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use usethrow_types::jsonrpc::{Request, Response};

use crate::error::{AppError, AppResult};

/// JSON-RPC "internal error", used when a node answers with neither result nor error
const INTERNAL_ERROR_CODE: i64 = -32603;

/// Minimal JSON-RPC 2.0 client over HTTP
pub struct JsonRpcClient {
    url: String,
    http: Client,
    next_id: AtomicU64,
}

impl std::fmt::Debug for JsonRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            http,
            next_id: AtomicU64::new(1),
        }
    }

    /// Build a client with its own HTTP connection pool and timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(url, http))
    }

    /// Call `method`, treating a `null` result as an error
    pub async fn call<P, R>(&self, method: &str, params: P) -> AppResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.call_optional(method, params)
            .await?
            .ok_or_else(|| AppError::Rpc {
                code: INTERNAL_ERROR_CODE,
                message: format!("{} returned no result", method),
            })
    }

    /// Call `method` where `null` is a legitimate answer (e.g. pending receipts)
    pub async fn call_optional<P, R>(&self, method: &str, params: P) -> AppResult<Option<R>>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("JSON-RPC #{} {} -> {}", id, method, self.url);

        let response = self
            .http
            .post(&self.url)
            .json(&Request::new(id, method, params))
            .send()
            .await?
            .error_for_status()?;

        let body: Response<R> = response.json().await?;
        if let Some(err) = body.error {
            let code = err.original_code().unwrap_or(err.code);
            warn!("JSON-RPC {} failed: {} ({})", method, err.message, code);
            return Err(AppError::from_rpc(code, err.message));
        }
        Ok(body.result)
    }
}
