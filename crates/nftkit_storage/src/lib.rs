//! nftkit_storage: off-chain resource storage for NFT assets and metadata.
//!
//! | Backend                | Reads by          | Writes                          |
//! |------------------------|-------------------|---------------------------------|
//! | `HttpStorage`          | URL               | (none)                          |
//! | `IpfsStorage`          | `ipfs://<cid>`    | files, metadata, base64 images  |
//! | `AwsStorage`           | S3 object key     | files, metadata                 |
//! | `CloudMetadataStorage` | URL               | metadata, base64 images         |
//!
//! Every read returns a [`Resource`] that materializes its bytes once and
//! exposes string, JSON and base64 views.

pub mod aws;
pub mod error;
pub mod http;
pub mod ipfs;
pub mod metadata;
pub mod resource;
pub mod traits;
pub mod uri;

use std::time::Duration;

use nftkit_core::{StorageBackend, StorageConfig};
use tracing::info;

pub use aws::{AwsResource, AwsStorage};
pub use error::{BoxError, StorageError, StorageResult};
pub use http::{HttpResource, HttpStorage};
pub use ipfs::{ChunkStream, IpfsResource, IpfsStorage};
pub use metadata::CloudMetadataStorage;
pub use resource::{ParsedData, Resource};
pub use traits::{Storage, base64_payload, decode_base64_image};

/// Build the backend selected by `config.backend`.
///
/// Fails with [`StorageError::RequiredField`] when the selected backend's
/// mandatory setting is empty.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Box<dyn Storage>> {
    let timeout = Duration::from_secs(config.http_timeout_secs);
    let storage: Box<dyn Storage> = match config.backend {
        StorageBackend::Http => Box::new(HttpStorage::new(timeout)?),
        StorageBackend::Ipfs => Box::new(IpfsStorage::new(&config.ipfs, timeout)?),
        StorageBackend::Aws => Box::new(AwsStorage::new(&config.aws).await?),
        StorageBackend::CloudMetadata => {
            Box::new(CloudMetadataStorage::new(&config.metadata, timeout)?)
        }
    };
    info!(backend = %storage.backend(), "storage backend initialized");
    Ok(storage)
}
