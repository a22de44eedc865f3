use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Networks a burner can be watched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    #[default]
    #[serde(alias = "ethereum")]
    Mainnet,
    Sepolia,
    Holesky,
}

impl Chain {
    pub const ALL: [Chain; 3] = [Chain::Mainnet, Chain::Sepolia, Chain::Holesky];

    /// Numeric EIP-155 chain id
    pub fn id(&self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Sepolia => 11_155_111,
            Self::Holesky => 17_000,
        }
    }

    /// Chain id in the `0x`-prefixed form wallets expect for `wallet_switchEthereumChain`
    pub fn hex_id(&self) -> &'static str {
        match self {
            Self::Mainnet => "0x1",
            Self::Sepolia => "0xaa36a7",
            Self::Holesky => "0x4268",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "Mainnet",
            Self::Sepolia => "Sepolia",
            Self::Holesky => "Holesky",
        }
    }

    pub fn explorer_base(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://etherscan.io",
            Self::Sepolia => "https://sepolia.etherscan.io",
            Self::Holesky => "https://holesky.etherscan.io",
        }
    }

    /// Public RPC used when no override is configured
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://cloudflare-eth.com",
            Self::Sepolia => "https://ethereum-sepolia-rpc.publicnode.com",
            Self::Holesky => "https://ethereum-holesky-rpc.publicnode.com",
        }
    }

    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_base(), address)
    }

    pub fn tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_base(), hash)
    }

    /// Next chain in selector order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Self::Mainnet => Self::Sepolia,
            Self::Sepolia => Self::Holesky,
            Self::Holesky => Self::Mainnet,
        }
    }

    /// Reverse lookup from a numeric chain id reported by a wallet
    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "ethereum" => Ok(Self::Mainnet),
            "sepolia" => Ok(Self::Sepolia),
            "holesky" => Ok(Self::Holesky),
            other => Err(format!("unknown chain: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_mainnet() {
        assert_eq!(Chain::default(), Chain::Mainnet);
    }

    #[test]
    fn hex_id_matches_numeric_id() {
        for chain in Chain::ALL {
            let parsed = u64::from_str_radix(chain.hex_id().trim_start_matches("0x"), 16).unwrap();
            assert_eq!(parsed, chain.id());
        }
    }

    #[test]
    fn parse_accepts_original_names() {
        assert_eq!("ethereum".parse::<Chain>().unwrap(), Chain::Mainnet);
        assert_eq!("Sepolia".parse::<Chain>().unwrap(), Chain::Sepolia);
        assert_eq!(" holesky ".parse::<Chain>().unwrap(), Chain::Holesky);
        assert!("goerli".parse::<Chain>().is_err());
    }

    #[test]
    fn next_cycles_through_all() {
        let mut chain = Chain::Mainnet;
        for _ in 0..3 {
            chain = chain.next();
        }
        assert_eq!(chain, Chain::Mainnet);
    }

    #[test]
    fn explorer_links() {
        assert_eq!(
            Chain::Sepolia.tx_url("0xabc"),
            "https://sepolia.etherscan.io/tx/0xabc"
        );
        assert_eq!(
            Chain::Mainnet.address_url("0xdef"),
            "https://etherscan.io/address/0xdef"
        );
    }

    #[test]
    fn from_id_round_trips() {
        assert_eq!(Chain::from_id(17_000), Some(Chain::Holesky));
        assert_eq!(Chain::from_id(5), None);
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&Chain::Sepolia).unwrap();
        assert_eq!(json, "\"sepolia\"");
        let back: Chain = serde_json::from_str("\"ethereum\"").unwrap();
        assert_eq!(back, Chain::Mainnet);
    }
}
