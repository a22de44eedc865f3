pub mod chain;
pub mod config;
pub mod error;
pub mod explorer;
pub mod funding;
pub mod rpc;
pub mod wallet;

pub use chain::Chain;
pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use explorer::{ActivityOracle, EtherscanClient, TransactionRecord};
pub use funding::{parse_amount, Funder, FundingWallet, JsonRpcFundingWallet};
pub use rpc::{BalanceOracle, RpcBalanceOracle};
pub use wallet::{BurnerWallet, ExpiryOutcome, WalletLifecycle};
