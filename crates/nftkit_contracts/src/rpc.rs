//! Minimal JSON-RPC 2.0 client for EVM nodes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use nftkit_core::NftKitConfig;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{ContractError, ContractResult};
use crate::rpc_config::{DEFAULT_RPC_TIMEOUT, RpcEndpoint};

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// Receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
}

impl RpcReceipt {
    /// Post-Byzantium status flag; `0x1` means success.
    pub fn succeeded(&self) -> bool {
        self.status.as_deref() == Some("0x1")
    }
}

pub struct JsonRpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> ContractResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Client for a resolved endpoint with the default timeout.
    pub fn for_endpoint(endpoint: &RpcEndpoint) -> ContractResult<Self> {
        Self::new(endpoint.url.clone(), DEFAULT_RPC_TIMEOUT)
    }

    /// Client for the configured chain, honoring the `rpc_url` override.
    pub fn from_config(config: &NftKitConfig) -> ContractResult<Self> {
        Self::for_endpoint(&RpcEndpoint::from_config(config)?)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC call and decode its `result`.
    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> ContractResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        debug!(url = %self.url, method, id, "JSON-RPC request");

        let response: RpcResponse = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(ContractError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        serde_json::from_value(response.result.unwrap_or(Value::Null))
            .map_err(|e| ContractError::invalid(format!("{method}: {e}")))
    }

    pub async fn chain_id(&self) -> ContractResult<u64> {
        let hex: String = self.request("eth_chainId", json!([])).await?;
        quantity_u64(&hex)
    }

    pub async fn block_number(&self) -> ContractResult<u64> {
        let hex: String = self.request("eth_blockNumber", json!([])).await?;
        quantity_u64(&hex)
    }

    /// Native balance in wei at the latest block.
    pub async fn get_balance(&self, address: &str) -> ContractResult<u128> {
        let hex: String = self
            .request("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity(&hex)
    }

    /// `None` while the transaction is pending or unknown.
    pub async fn transaction_receipt(&self, tx_hash: &str) -> ContractResult<Option<RpcReceipt>> {
        self.request("eth_getTransactionReceipt", json!([tx_hash]))
            .await
    }
}

/// Decode a hex `QUANTITY` such as `0x1bc16d674ec80000`.
pub fn parse_quantity(hex: &str) -> ContractResult<u128> {
    let digits = hex
        .strip_prefix("0x")
        .ok_or_else(|| ContractError::invalid(format!("quantity without 0x prefix: {hex}")))?;
    if digits.is_empty() {
        return Err(ContractError::invalid("empty quantity"));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| ContractError::invalid(format!("bad quantity {hex}: {e}")))
}

fn quantity_u64(hex: &str) -> ContractResult<u64> {
    u64::try_from(parse_quantity(hex)?)
        .map_err(|_| ContractError::invalid(format!("quantity out of range: {hex}")))
}
