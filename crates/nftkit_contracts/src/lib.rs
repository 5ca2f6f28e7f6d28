//! nftkit_contracts: ERC-721 contract management on EVM chains.
//!
//! State-changing operations on [`NftManager`] are guarded by an activation
//! flag; see [`guard`]. Contract calls go through the [`ContractCaller`] seam,
//! and [`JsonRpcClient`] covers the plain node queries.

pub mod caller;
pub mod error;
pub mod guard;
pub mod networks;
pub mod nft;
pub mod rpc;
pub mod rpc_config;

pub use caller::{ContractCaller, ContractEvent, TokenId, TxReceipt, value_to_u64};
pub use error::{ContractError, ContractResult};
pub use guard::{ContractManager, ManagedArgs, ensure_active, guarded};
pub use networks::{ChainConfig, erc721_abi, get_chain_configs};
pub use nft::{AirdropRequest, MintedToken, NftManager, airdrop};
pub use rpc::{JsonRpcClient, RpcReceipt, parse_quantity};
pub use rpc_config::{DEFAULT_RPC_TIMEOUT, EndpointSource, RpcEndpoint, validate_url};
