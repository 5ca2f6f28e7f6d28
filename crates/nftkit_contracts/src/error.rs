//! Contract error types.

use nftkit_storage::{BoxError, StorageError};

/// Errors returned by contract managers and the RPC client.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// A guarded operation ran before its manager was activated.
    #[error("{manager} must be activated before use")]
    MustActivate { manager: String },

    #[error("Wrong network: expected chain {expected}, connected to {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// The transaction was mined but reverted.
    #[error("Transaction {tx_hash} failed")]
    TransactionFailed { tx_hash: String },

    /// Endpoint is not an http(s) URL with a host.
    #[error("Invalid RPC URL: {url}")]
    InvalidRpcUrl { url: String },

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Failure raised by the contract-call layer, passed through as is.
    #[error(transparent)]
    Caller(BoxError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ContractError {
    pub fn caller(err: impl Into<BoxError>) -> Self {
        Self::Caller(err.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
