//! Which JSON-RPC endpoint a client dials.
//!
//! The built-in table in [`crate::networks`] supplies one public endpoint per
//! chain; `NftKitConfig::rpc_url` overrides it for the configured chain.

use std::time::Duration;

use nftkit_core::{Chain, NftKitConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ContractError, ContractResult};
use crate::networks::get_chain_configs;

pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Where an endpoint URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointSource {
    Builtin,
    Override,
}

/// A resolved, validated endpoint for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcEndpoint {
    pub chain: Chain,
    pub url: String,
    pub source: EndpointSource,
}

impl RpcEndpoint {
    /// The public endpoint shipped for `chain`.
    pub fn builtin(chain: Chain) -> ContractResult<Self> {
        let config = get_chain_configs()
            .remove(&chain)
            .ok_or_else(|| ContractError::invalid(format!("no built-in RPC endpoint for {chain}")))?;
        Ok(Self {
            chain,
            url: config.rpc_url,
            source: EndpointSource::Builtin,
        })
    }

    /// A caller-supplied endpoint for `chain`.
    pub fn custom(chain: Chain, url: &str) -> ContractResult<Self> {
        let url = validate_url(url)?;
        Ok(Self {
            chain,
            url,
            source: EndpointSource::Override,
        })
    }

    /// Endpoint for `config.chain`: the non-empty `rpc_url` override, else
    /// the built-in one.
    pub fn from_config(config: &NftKitConfig) -> ContractResult<Self> {
        match config.rpc_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => Self::custom(config.chain, url),
            None => Self::builtin(config.chain),
        }
    }
}

/// Accept http(s) URLs with a host; returns the URL as given.
pub fn validate_url(url: &str) -> ContractResult<String> {
    let usable = url::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some())
        .unwrap_or(false);
    if usable {
        Ok(url.to_string())
    } else {
        Err(ContractError::InvalidRpcUrl {
            url: url.to_string(),
        })
    }
}
