//! Topping up the burner from an external signing wallet.
//!
//! The signing wallet holds its own keys and is only ever asked to send
//! value *to* the burner address; the burner secret never leaves the
//! lifecycle manager.

use alloy_primitives::utils::parse_ether;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};
use usethrow_types::jsonrpc::{Receipt, SendTransaction, SwitchChain};

use crate::chain::Chain;
use crate::config::FundingConfig;
use crate::error::{AppError, AppResult, UNRECOGNIZED_CHAIN_CODE};
use crate::rpc::balance::parse_quantity;
use crate::rpc::JsonRpcClient;

/// An external wallet able to sign and send on the user's behalf
#[async_trait]
pub trait FundingWallet: Send + Sync {
    async fn request_accounts(&self) -> AppResult<Vec<Address>>;
    async fn chain_id(&self) -> AppResult<u64>;
    async fn switch_network(&self, chain: Chain) -> AppResult<()>;
    /// Returns the transaction hash
    async fn send_transaction(&self, from: Address, to: Address, value: U256) -> AppResult<String>;
    /// `Some(succeeded)` once mined, `None` while pending
    async fn transaction_status(&self, hash: &str) -> AppResult<Option<bool>>;
}

#[async_trait]
impl<W: FundingWallet + ?Sized> FundingWallet for std::sync::Arc<W> {
    async fn request_accounts(&self) -> AppResult<Vec<Address>> {
        (**self).request_accounts().await
    }

    async fn chain_id(&self) -> AppResult<u64> {
        (**self).chain_id().await
    }

    async fn switch_network(&self, chain: Chain) -> AppResult<()> {
        (**self).switch_network(chain).await
    }

    async fn send_transaction(&self, from: Address, to: Address, value: U256) -> AppResult<String> {
        (**self).send_transaction(from, to, value).await
    }

    async fn transaction_status(&self, hash: &str) -> AppResult<Option<bool>> {
        (**self).transaction_status(hash).await
    }
}

/// Signing wallet reachable over JSON-RPC (Frame, a dev node with unlocked accounts, ...)
#[derive(Debug)]
pub struct JsonRpcFundingWallet {
    rpc: JsonRpcClient,
}

impl JsonRpcFundingWallet {
    pub fn new(rpc: JsonRpcClient) -> Self {
        Self { rpc }
    }

    pub fn from_config(config: &FundingConfig, timeout: Duration) -> AppResult<Self> {
        Ok(Self::new(JsonRpcClient::with_timeout(&config.wallet_url, timeout)?))
    }
}

#[async_trait]
impl FundingWallet for JsonRpcFundingWallet {
    async fn request_accounts(&self) -> AppResult<Vec<Address>> {
        let accounts: Vec<String> = self.rpc.call("eth_requestAccounts", json!([])).await?;
        accounts
            .iter()
            .map(|a| {
                a.parse::<Address>()
                    .map_err(|e| AppError::internal(format!("wallet returned bad address {}: {}", a, e)))
            })
            .collect()
    }

    async fn chain_id(&self) -> AppResult<u64> {
        let raw: String = self.rpc.call("eth_chainId", json!([])).await?;
        let id = parse_quantity(&raw)?;
        u64::try_from(id).map_err(|_| AppError::internal(format!("chain id out of range: {}", raw)))
    }

    async fn switch_network(&self, chain: Chain) -> AppResult<()> {
        let params = [SwitchChain {
            chain_id: chain.hex_id(),
        }];
        match self
            .rpc
            .call_optional::<_, serde_json::Value>("wallet_switchEthereumChain", params)
            .await
        {
            Ok(_) => Ok(()),
            Err(AppError::Rpc { code, .. }) if code == UNRECOGNIZED_CHAIN_CODE => {
                Err(AppError::NetworkNotAdded(chain.name().to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn send_transaction(&self, from: Address, to: Address, value: U256) -> AppResult<String> {
        let tx = SendTransaction {
            from: from.to_checksum(None),
            to: to.to_checksum(None),
            value: format!("{:#x}", value),
        };
        self.rpc.call("eth_sendTransaction", [tx]).await
    }

    async fn transaction_status(&self, hash: &str) -> AppResult<Option<bool>> {
        let receipt: Option<Receipt> = self
            .rpc
            .call_optional("eth_getTransactionReceipt", [hash])
            .await?;
        Ok(receipt
            .filter(|r| r.block_number.is_some())
            .map(|r| r.succeeded()))
    }
}

/// Funding session: a connected account on a known network
pub struct Funder<W: FundingWallet> {
    wallet: W,
    poll_interval: Duration,
    confirm_timeout: Duration,
}

impl<W: FundingWallet> Funder<W> {
    pub fn new(wallet: W, config: &FundingConfig) -> Self {
        Self {
            wallet,
            poll_interval: Duration::from_millis(config.receipt_poll_ms),
            confirm_timeout: Duration::from_secs(config.receipt_timeout_secs),
        }
    }

    /// Make sure the wallet is on `chain`, switching if needed
    pub async fn ensure_network(&self, chain: Chain) -> AppResult<()> {
        let current = self.wallet.chain_id().await?;
        if current == chain.id() {
            return Ok(());
        }
        match Chain::from_id(current) {
            Some(from) => info!("Funding wallet on {}, switching to {}", from, chain),
            None => info!("Funding wallet on chain id {}, switching to {}", current, chain),
        }
        self.wallet.switch_network(chain).await
    }

    /// Connect and return the funding account
    pub async fn connect(&self, chain: Chain) -> AppResult<Address> {
        self.ensure_network(chain).await?;
        let accounts = self.wallet.request_accounts().await?;
        let account = accounts.first().copied().ok_or(AppError::NoAccounts)?;
        info!("Funding wallet connected: {}", account);
        Ok(account)
    }

    /// Send `amount_eth` from `from` to the burner, returning once the
    /// transaction is mined. `on_sent` sees the hash as soon as it exists.
    pub async fn fund<F>(
        &self,
        chain: Chain,
        from: Address,
        burner: Address,
        amount_eth: &str,
        on_sent: F,
    ) -> AppResult<String>
    where
        F: FnOnce(&str) + Send,
    {
        let value = parse_amount(amount_eth)?;
        self.ensure_network(chain).await?;

        let hash = self.wallet.send_transaction(from, burner, value).await?;
        info!("Funding tx sent: {}", hash);
        on_sent(&hash);

        self.wait_for_confirmation(&hash).await?;
        Ok(hash)
    }

    async fn wait_for_confirmation(&self, hash: &str) -> AppResult<()> {
        let deadline = tokio::time::Instant::now() + self.confirm_timeout;
        loop {
            match self.wallet.transaction_status(hash).await? {
                Some(true) => {
                    info!("Funding tx {} confirmed", hash);
                    return Ok(());
                }
                Some(false) => {
                    warn!("Funding tx {} reverted", hash);
                    return Err(AppError::Rpc {
                        code: 0,
                        message: format!("transaction {} reverted", hash),
                    });
                }
                None => debug!("Funding tx {} pending", hash),
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(AppError::ConfirmationTimeout(hash.to_string()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Parse a user-entered ETH amount; zero and garbage are rejected
pub fn parse_amount(amount_eth: &str) -> AppResult<U256> {
    let trimmed = amount_eth.trim();
    let value = parse_ether(trimmed).map_err(|e| AppError::InvalidAmount(format!("{}: {}", trimmed, e)))?;
    if value.is_zero() {
        return Err(AppError::InvalidAmount(format!("{}: must be greater than zero", trimmed)));
    }
    Ok(value)
}
