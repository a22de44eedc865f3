use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::sync::OnceLock;

use crate::chain::Chain;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Environment variables accepted for the explorer key when the layered config has none.
/// The second one is what the browser build of the wallet read.
const API_KEY_FALLBACK_VARS: [&str; 2] = ["ETHERSCAN_API_KEY", "NEXT_PUBLIC_ETHERSCAN_API_KEY"];

/// RPC endpoints and HTTP behaviour
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    #[serde(default)]
    pub default_chain: Chain,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-chain overrides for the public RPC table
    #[serde(default)]
    pub mainnet_rpc: Option<String>,
    #[serde(default)]
    pub sepolia_rpc: Option<String>,
    #[serde(default)]
    pub holesky_rpc: Option<String>,
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_chain: Chain::default(),
            timeout_secs: default_timeout_secs(),
            mainnet_rpc: None,
            sepolia_rpc: None,
            holesky_rpc: None,
        }
    }
}

impl NetworkConfig {
    /// RPC URL for a chain, honouring overrides
    pub fn rpc_url(&self, chain: Chain) -> String {
        let custom = match chain {
            Chain::Mainnet => &self.mainnet_rpc,
            Chain::Sepolia => &self.sepolia_rpc,
            Chain::Holesky => &self.holesky_rpc,
        };
        custom
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(chain.default_rpc_url())
            .trim_end_matches('/')
            .to_string()
    }
}

/// Block explorer (Etherscan V2) settings
#[derive(Debug, Deserialize, Clone)]
pub struct ExplorerConfig {
    #[serde(default = "default_explorer_url")]
    pub api_url: String,
    /// Never logged
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_explorer_url() -> String {
    "https://api.etherscan.io/v2/api".to_string()
}

fn default_page_size() -> u32 {
    10
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_url: default_explorer_url(),
            api_key: None,
            page_size: default_page_size(),
        }
    }
}

/// Burner wallet defaults
#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    /// Expiry applied by the headless runner; 0 disables expiry
    #[serde(default = "default_expiry_minutes")]
    pub default_expiry_minutes: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_expiry_minutes() -> u32 {
    2
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            default_expiry_minutes: default_expiry_minutes(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// External signing wallet used to top up the burner
#[derive(Debug, Deserialize, Clone)]
pub struct FundingConfig {
    /// JSON-RPC endpoint of the signing wallet (Frame listens here by default)
    #[serde(default = "default_wallet_url")]
    pub wallet_url: String,
    #[serde(default = "default_amount")]
    pub default_amount: String,
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
}

fn default_wallet_url() -> String {
    "http://127.0.0.1:1248".to_string()
}

fn default_amount() -> String {
    "0.01".to_string()
}

fn default_receipt_poll_ms() -> u64 {
    2000
}

fn default_receipt_timeout_secs() -> u64 {
    180
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            wallet_url: default_wallet_url(),
            default_amount: default_amount(),
            receipt_poll_ms: default_receipt_poll_ms(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
        }
    }
}

/// Root application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub funding: FundingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is the normal case
        let _ = dotenvy::dotenv();

        let mut loaded = Self::from_sources(Self::environment())?;
        loaded.apply_api_key_fallback(|name| std::env::var(name).ok());
        Ok(loaded)
    }

    /// Initialize the global config singleton
    pub fn init() -> Result<&'static Self, ConfigError> {
        let config = Self::load()?;
        Ok(CONFIG.get_or_init(|| config))
    }

    // e.g. USETHROW_EXPLORER__API_KEY, USETHROW_NETWORK__DEFAULT_CHAIN
    fn environment() -> Environment {
        Environment::with_prefix("USETHROW")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn from_sources(env: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env)
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.wallet.tick_interval_ms == 0 {
            return Err(ConfigError::Message(
                "wallet.tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.funding.receipt_poll_ms == 0 {
            return Err(ConfigError::Message(
                "funding.receipt_poll_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_api_key_fallback<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let configured = self
            .explorer
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if configured {
            return;
        }
        self.explorer.api_key = API_KEY_FALLBACK_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|k| !k.trim().is_empty());
    }
}
