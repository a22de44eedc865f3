use thiserror::Error;

/// Application-wide error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Explorer API key not configured")]
    MissingApiKey,

    #[error("Network {0} is not added in the funding wallet")]
    NetworkNotAdded(String),

    #[error("Funding account has insufficient funds")]
    InsufficientFunds,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Funding wallet returned no accounts")]
    NoAccounts,

    #[error("Transaction {0} not confirmed in time")]
    ConfirmationTimeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Broad failure classes that decide how a caller reacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation fails, prior state kept, no retry
    Fatal,
    /// Network hiccup; re-invoking the same read is fine
    Transient,
    /// Missing setup; retrying without a config change is pointless
    Configuration,
    /// Rejected user input
    UserInput,
}

/// JSON-RPC code a wallet returns for `wallet_switchEthereumChain` on an unknown chain
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

impl AppError {
    pub fn key_generation<S: Into<String>>(msg: S) -> Self {
        Self::KeyGeneration(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyGeneration(_) | Self::Internal(_) => ErrorKind::Fatal,
            Self::Http(_) | Self::Json(_) | Self::Rpc { .. } | Self::ConfirmationTimeout(_) => {
                ErrorKind::Transient
            }
            Self::Config(_) | Self::MissingApiKey | Self::NetworkNotAdded(_) | Self::NoAccounts => {
                ErrorKind::Configuration
            }
            Self::InsufficientFunds | Self::InvalidAmount(_) => ErrorKind::UserInput,
        }
    }

    /// Text suitable for showing to the person at the keyboard
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey => "Set ETHERSCAN_API_KEY to fetch history.".to_string(),
            Self::NetworkNotAdded(_) => {
                "Please add this network in your wallet first, then retry.".to_string()
            }
            Self::InsufficientFunds => "Funding account has insufficient ETH on this network to cover amount + gas. \
                 Switch to the correct network (e.g., Sepolia) and ensure it has test ETH."
                .to_string(),
            Self::NoAccounts => "No funding wallet account available. Unlock your wallet.".to_string(),
            other => other.to_string(),
        }
    }

    /// Map wallet-side failures onto the variants the UI reacts to
    pub(crate) fn from_rpc(code: i64, message: String) -> Self {
        if message.to_lowercase().contains("insufficient funds") {
            Self::InsufficientFunds
        } else {
            Self::Rpc { code, message }
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
