//! Storage trait definitions

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use nftkit_core::StorageBackend;

use crate::error::{StorageError, StorageResult};
use crate::resource::Resource;

/// Backend-specific adapter for fetching and storing off-chain resources.
///
/// Only [`Storage::get_data`] is mandatory. The store operations default to
/// [`StorageError::NotImplemented`] and never touch the network unless a
/// backend overrides them.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Which backend this adapter talks to.
    fn backend(&self) -> StorageBackend;

    /// Fetch the payload behind `resource_id` and wrap it in a fresh resource.
    async fn get_data(&self, resource_id: &str) -> StorageResult<Box<dyn Resource>>;

    /// Store a local file, returning its canonical identifier.
    async fn store_file(&self, _path: &Path) -> StorageResult<String> {
        Err(StorageError::not_implemented(self.backend(), "store_file"))
    }

    /// Serialize `properties` to JSON and store it, returning its identifier.
    async fn store_metadata(&self, _properties: &serde_json::Value) -> StorageResult<String> {
        Err(StorageError::not_implemented(self.backend(), "store_metadata"))
    }

    /// Store inline image data given as base64 or a `data:` URL.
    async fn store_base64_image(&self, _base64: &str) -> StorageResult<String> {
        Err(StorageError::not_implemented(self.backend(), "store_base64_image"))
    }
}

/// Strip an optional `data:<mime>;base64,` header, returning the bare payload.
pub fn base64_payload(input: &str) -> &str {
    let trimmed = input.trim();
    match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .unwrap_or(rest),
        None => trimmed,
    }
}

/// Decode base64 image data (raw or `data:` URL) into bytes.
pub fn decode_base64_image(input: &str) -> StorageResult<Vec<u8>> {
    Ok(STANDARD.decode(base64_payload(input))?)
}

/// Serialize metadata properties the way every backend stores them.
pub(crate) fn metadata_json(properties: &serde_json::Value) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(properties)?)
}
