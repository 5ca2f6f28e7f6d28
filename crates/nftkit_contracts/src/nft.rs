//! ERC-721 contract manager.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use nftkit_core::Chain;
use nftkit_storage::Storage;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::caller::{ContractCaller, TokenId, TxReceipt, value_to_u64};
use crate::error::{ContractError, ContractResult};
use crate::guard::{ContractManager, ManagedArgs, guarded};

// ERC-721 entry points, as named in `networks::erc721_abi`.
const SAFE_MINT: &str = "safeMint";
const BURN: &str = "burn";
const SAFE_TRANSFER_FROM: &str = "safeTransferFrom";
const OWNER_OF: &str = "ownerOf";
const TOKEN_URI: &str = "tokenURI";
const BALANCE_OF: &str = "balanceOf";
const TRANSFER_EVENT: &str = "Transfer";

/// A token created by a mint transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintedToken {
    pub token_id: TokenId,
    pub token_uri: String,
    pub tx_hash: String,
}

/// Manages one deployed ERC-721 contract.
pub struct NftManager {
    address: String,
    chain: Chain,
    caller: Arc<dyn ContractCaller>,
    active: AtomicBool,
}

impl NftManager {
    pub fn new(address: impl Into<String>, chain: Chain, caller: Arc<dyn ContractCaller>) -> Self {
        Self {
            address: address.into(),
            chain,
            caller,
            active: AtomicBool::new(false),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// Check the connected network and enable guarded operations.
    pub async fn activate(&self) -> ContractResult<()> {
        let expected = self.chain.chain_id();
        let actual = self.caller.chain_id().await?;
        if actual != expected {
            warn!(address = %self.address, expected, actual, "refusing to activate on wrong network");
            return Err(ContractError::WrongNetwork { expected, actual });
        }
        self.active.store(true, Ordering::SeqCst);
        info!(address = %self.address, chain = %self.chain, "NFT manager activated");
        Ok(())
    }

    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
        debug!(address = %self.address, "NFT manager deactivated");
    }

    /// Mint a token to `to` pointing at `token_uri`.
    pub async fn mint(&self, to: &str, token_uri: &str) -> ContractResult<MintedToken> {
        guarded(self, |manager| async move {
            let receipt = manager.transact(SAFE_MINT, &[json!(to), json!(token_uri)]).await?;
            let token_id = minted_token_id(&receipt)?;
            info!(token_id = %token_id, to = %to, tx_hash = %receipt.tx_hash, "token minted");
            Ok(MintedToken {
                token_id,
                token_uri: token_uri.to_string(),
                tx_hash: receipt.tx_hash,
            })
        })
        .await
    }

    pub async fn burn(&self, token_id: &TokenId) -> ContractResult<TxReceipt> {
        guarded(self, |manager| async move {
            manager.transact(BURN, &[token_id.to_value()]).await
        })
        .await
    }

    pub async fn transfer(
        &self,
        from: &str,
        to: &str,
        token_id: &TokenId,
    ) -> ContractResult<TxReceipt> {
        guarded(self, |manager| async move {
            manager
                .transact(SAFE_TRANSFER_FROM, &[json!(from), json!(to), token_id.to_value()])
                .await
        })
        .await
    }

    /// Store `properties` on `storage`, then mint a token pointing at the
    /// returned identifier.
    pub async fn mint_with_metadata(
        &self,
        to: &str,
        storage: &dyn Storage,
        properties: &Value,
    ) -> ContractResult<MintedToken> {
        guarded(self, |manager| async move {
            let token_uri = storage.store_metadata(properties).await?;
            debug!(backend = %storage.backend(), uri = %token_uri, "metadata stored for mint");
            manager.mint(to, &token_uri).await
        })
        .await
    }

    pub async fn owner_of(&self, token_id: &TokenId) -> ContractResult<String> {
        let value = self.caller.call(OWNER_OF, &[token_id.to_value()]).await?;
        expect_string(value, OWNER_OF)
    }

    pub async fn token_uri(&self, token_id: &TokenId) -> ContractResult<String> {
        let value = self.caller.call(TOKEN_URI, &[token_id.to_value()]).await?;
        expect_string(value, TOKEN_URI)
    }

    pub async fn balance_of(&self, owner: &str) -> ContractResult<u64> {
        let value = self.caller.call(BALANCE_OF, &[json!(owner)]).await?;
        value_to_u64(&value)
    }

    async fn transact(&self, method: &str, args: &[Value]) -> ContractResult<TxReceipt> {
        debug!(address = %self.address, method, "sending transaction");
        let receipt = self.caller.send(method, args).await?;
        if !receipt.status {
            warn!(method, tx_hash = %receipt.tx_hash, "transaction reverted");
            return Err(ContractError::TransactionFailed {
                tx_hash: receipt.tx_hash,
            });
        }
        Ok(receipt)
    }
}

impl ContractManager for NftManager {
    fn name(&self) -> &str {
        "NftManager"
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

fn minted_token_id(receipt: &TxReceipt) -> ContractResult<TokenId> {
    let token_id = receipt
        .event(TRANSFER_EVENT)
        .and_then(|event| event.args.get("tokenId"))
        .ok_or_else(|| {
            ContractError::invalid(format!("no Transfer tokenId in receipt of {}", receipt.tx_hash))
        })?;
    TokenId::from_value(token_id).map_err(|e| {
        ContractError::invalid(format!("{e} (mined in {})", receipt.tx_hash))
    })
}

fn expect_string(value: Value, method: &str) -> ContractResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(ContractError::invalid(format!(
            "{method} returned {other}, expected a string"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Airdrop
// ---------------------------------------------------------------------------

/// Mint the same token URI to several recipients.
pub struct AirdropRequest<'a> {
    pub manager: &'a NftManager,
    pub recipients: Vec<String>,
    pub token_uri: String,
}

impl ManagedArgs for AirdropRequest<'_> {
    fn manager(&self) -> &dyn ContractManager {
        self.manager
    }
}

/// Mint to each recipient in order. Stops at the first failed mint; tokens
/// minted before it stay minted.
pub async fn airdrop(request: AirdropRequest<'_>) -> ContractResult<Vec<MintedToken>> {
    guarded(request, |request| async move {
        let mut minted = Vec::with_capacity(request.recipients.len());
        for to in &request.recipients {
            minted.push(request.manager.mint(to, &request.token_uri).await?);
        }
        info!(count = minted.len(), "airdrop complete");
        Ok(minted)
    })
    .await
}
