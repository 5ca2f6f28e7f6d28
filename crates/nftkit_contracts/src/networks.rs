use std::collections::HashMap;

use nftkit_core::Chain;
use serde::{Deserialize, Serialize};

/// Network-specific configuration for a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_symbol: String,
}

impl ChainConfig {
    /// Explorer page for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_url)
    }
}

/// Returns default chain configurations for all supported networks.
pub fn get_chain_configs() -> HashMap<Chain, ChainConfig> {
    let entry = |chain: Chain, rpc: &str, explorer: &str, symbol: &str| {
        (
            chain,
            ChainConfig {
                name: chain.label().to_string(),
                chain_id: chain.chain_id(),
                rpc_url: rpc.to_string(),
                explorer_url: explorer.to_string(),
                native_symbol: symbol.to_string(),
            },
        )
    };

    HashMap::from([
        entry(Chain::Ethereum, "https://eth.llamarpc.com", "https://etherscan.io", "ETH"),
        entry(
            Chain::Sepolia,
            "https://ethereum-sepolia-rpc.publicnode.com",
            "https://sepolia.etherscan.io",
            "ETH",
        ),
        entry(Chain::Polygon, "https://polygon-rpc.com", "https://polygonscan.com", "POL"),
        entry(Chain::Base, "https://mainnet.base.org", "https://basescan.org", "ETH"),
    ])
}

/// ABI fragment of the ERC-721 surface the NFT manager calls.
///
/// Covers the mint/burn extensions used by OpenZeppelin presets plus the
/// standard ownership views and the `Transfer` event.
pub fn erc721_abi() -> serde_json::Value {
    serde_json::json!([
        {
            "type": "function",
            "name": "safeMint",
            "inputs": [
                { "name": "to", "type": "address" },
                { "name": "uri", "type": "string" }
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "burn",
            "inputs": [{ "name": "tokenId", "type": "uint256" }],
            "outputs": [],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "safeTransferFrom",
            "inputs": [
                { "name": "from", "type": "address" },
                { "name": "to", "type": "address" },
                { "name": "tokenId", "type": "uint256" }
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "ownerOf",
            "inputs": [{ "name": "tokenId", "type": "uint256" }],
            "outputs": [{ "name": "", "type": "address" }],
            "stateMutability": "view"
        },
        {
            "type": "function",
            "name": "tokenURI",
            "inputs": [{ "name": "tokenId", "type": "uint256" }],
            "outputs": [{ "name": "", "type": "string" }],
            "stateMutability": "view"
        },
        {
            "type": "function",
            "name": "balanceOf",
            "inputs": [{ "name": "owner", "type": "address" }],
            "outputs": [{ "name": "", "type": "uint256" }],
            "stateMutability": "view"
        },
        {
            "type": "event",
            "name": "Transfer",
            "anonymous": false,
            "inputs": [
                { "name": "from", "type": "address", "indexed": true },
                { "name": "to", "type": "address", "indexed": true },
                { "name": "tokenId", "type": "uint256", "indexed": true }
            ]
        }
    ])
}
