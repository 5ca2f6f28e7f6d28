//! The contract-call seam.
//!
//! ABI encoding and signing live behind [`ContractCaller`]; managers only
//! name the method and pass JSON arguments.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ContractError, ContractResult};

/// A decoded event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEvent {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    /// `true` when the transaction executed without reverting.
    pub status: bool,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub gas_used: Option<u64>,
    #[serde(default)]
    pub events: Vec<ContractEvent>,
}

impl TxReceipt {
    /// First event with the given name.
    pub fn event(&self, name: &str) -> Option<&ContractEvent> {
        self.events.iter().find(|e| e.name == name)
    }
}

/// Bound contract handle: reads, writes and the connected chain.
#[async_trait]
pub trait ContractCaller: Send + Sync {
    /// EIP-155 id of the network the caller is connected to.
    async fn chain_id(&self) -> ContractResult<u64>;

    /// Read-only call.
    async fn call(&self, method: &str, args: &[serde_json::Value])
    -> ContractResult<serde_json::Value>;

    /// State-changing call; resolves once the transaction is mined.
    async fn send(&self, method: &str, args: &[serde_json::Value]) -> ContractResult<TxReceipt>;
}

/// ERC-721 token id. A `uint256`, held as canonical decimal text so ids
/// above `u64::MAX` (hash-derived ids) survive intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

/// Decimal digits in `2^256 - 1`.
const MAX_UINT256_DIGITS: usize = 78;
const MAX_UINT256: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639935";

impl TokenId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read a token id from a JSON number, decimal string or `0x` hex string.
    pub fn from_value(value: &serde_json::Value) -> ContractResult<Self> {
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(Self::from)
                .ok_or_else(|| ContractError::invalid(format!("token id {n} is not a uint256"))),
            serde_json::Value::String(s) => s.parse(),
            other => Err(ContractError::invalid(format!("expected a token id, got {other}"))),
        }
    }

    /// JSON argument form passed to the contract caller.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::String(self.0.clone())
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenId {
    type Err = ContractError;

    fn from_str(s: &str) -> ContractResult<Self> {
        let invalid = || ContractError::invalid(format!("invalid token id: {s}"));
        let decimal = match s.strip_prefix("0x") {
            Some(hex) if !hex.is_empty() && hex.len() <= 64 => {
                hex_to_decimal(hex).ok_or_else(invalid)?
            }
            None if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                match s.trim_start_matches('0') {
                    "" => "0".to_string(),
                    trimmed => trimmed.to_string(),
                }
            }
            _ => return Err(invalid()),
        };
        let too_big = decimal.len() > MAX_UINT256_DIGITS
            || (decimal.len() == MAX_UINT256_DIGITS && decimal.as_str() > MAX_UINT256);
        if too_big {
            return Err(invalid());
        }
        Ok(Self(decimal))
    }
}

/// Base-16 to base-10 on little-endian decimal digits.
fn hex_to_decimal(hex: &str) -> Option<String> {
    let mut digits: Vec<u8> = vec![0];
    for c in hex.chars() {
        let mut carry = c.to_digit(16)?;
        for d in digits.iter_mut() {
            let v = u32::from(*d) * 16 + carry;
            *d = (v % 10) as u8;
            carry = v / 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    while digits.len() > 1 && digits.last() == Some(&0) {
        digits.pop();
    }
    Some(digits.iter().rev().map(|d| char::from(b'0' + d)).collect())
}

/// Read an unsigned integer that may arrive as a JSON number, a decimal
/// string or a `0x` hex string.
pub fn value_to_u64(value: &serde_json::Value) -> ContractResult<u64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => match s.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        },
        _ => None,
    };
    parsed.ok_or_else(|| ContractError::invalid(format!("expected an unsigned integer, got {value}")))
}
