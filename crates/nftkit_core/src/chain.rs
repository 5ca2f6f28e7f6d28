use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported EVM networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Sepolia,
    Polygon,
    Base,
}

impl Chain {
    pub const ALL: [Chain; 4] = [Chain::Ethereum, Chain::Sepolia, Chain::Polygon, Chain::Base];

    /// Human-readable label for the chain.
    pub fn label(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum Mainnet",
            Chain::Sepolia => "Sepolia Testnet",
            Chain::Polygon => "Polygon PoS",
            Chain::Base => "Base Mainnet",
        }
    }

    /// EIP-155 chain ID.
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Sepolia => 11_155_111,
            Chain::Polygon => 137,
            Chain::Base => 8453,
        }
    }

    /// Look up a chain by its EIP-155 ID.
    pub fn from_chain_id(id: u64) -> Option<Chain> {
        Self::ALL.into_iter().find(|c| c.chain_id() == id)
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Chain::Sepolia)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Chain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ethereum" | "mainnet" => Ok(Chain::Ethereum),
            "sepolia" => Ok(Chain::Sepolia),
            "polygon" | "matic" => Ok(Chain::Polygon),
            "base" => Ok(Chain::Base),
            other => anyhow::bail!("unknown chain: {other}"),
        }
    }
}
