//! Ethereum JSON-RPC plumbing and the balance lookup built on it.

pub mod balance;
pub mod client;

pub use balance::{format_ether_display, BalanceOracle, RpcBalanceOracle};
pub use client::JsonRpcClient;
