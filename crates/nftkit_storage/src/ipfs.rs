//! IPFS backend over the Kubo HTTP RPC API.
//!
//! Content is read with `POST /api/v0/cat` and streamed back in chunks; writes
//! go through `POST /api/v0/add`. Identifiers are returned in the canonical
//! `ipfs://<cid>` form.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, StreamExt};
use nftkit_core::{IpfsSettings, StorageBackend};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::http::{build_client, send_checked};
use crate::resource::{ParsedData, Resource};
use crate::traits::{Storage, decode_base64_image, metadata_json};
use crate::uri;

/// Chunks of an IPFS payload in arrival order.
pub type ChunkStream = BoxStream<'static, StorageResult<Bytes>>;

const ADD_FAILED: &str = "failed to add content to IPFS";

/// A resource backed by a stream of byte chunks.
///
/// The stream is drained on first materialization and cannot be replayed.
pub struct IpfsResource {
    data: Mutex<Option<ChunkStream>>,
    parsed: ParsedData,
}

impl IpfsResource {
    pub fn new(chunks: ChunkStream) -> Self {
        Self {
            data: Mutex::new(Some(chunks)),
            parsed: ParsedData::new(),
        }
    }
}

#[async_trait]
impl Resource for IpfsResource {
    fn parsed_data(&self) -> &ParsedData {
        &self.parsed
    }

    async fn parse_data(&self) -> StorageResult<Bytes> {
        let mut chunks = self.data.lock().await.take().ok_or_else(|| {
            StorageError::backend(
                "IPFS chunk stream was already drained",
                "payload consumed by an earlier parse",
            )
        })?;

        let mut buf = BytesMut::new();
        while let Some(chunk) = chunks.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

/// `POST /api/v0/add` response body.
#[derive(Debug, Clone, Deserialize)]
struct IpfsAddResponse {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "Size")]
    size: String,
}

/// Reads and writes content through an IPFS node.
pub struct IpfsStorage {
    client: Client,
    api_url: String,
    gateway_url: String,
}

impl IpfsStorage {
    /// Create a backend for the node at `settings.api_url`.
    pub fn new(settings: &IpfsSettings, timeout: Duration) -> StorageResult<Self> {
        let api_url = settings.api_url.trim().trim_end_matches('/');
        if api_url.is_empty() {
            return Err(StorageError::RequiredField("ipfs.api_url"));
        }
        let client = build_client(timeout)?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            gateway_url: settings.gateway_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Browsable gateway link for an IPFS identifier.
    pub fn gateway_link(&self, uri_or_cid: &str) -> String {
        uri::gateway_url(&self.gateway_url, uri_or_cid)
    }

    /// Add raw bytes to IPFS, returning the canonical `ipfs://<cid>`.
    async fn add(&self, file_name: &str, data: Vec<u8>) -> StorageResult<String> {
        let url = format!("{}/api/v0/add?cid-version=1&pin=true", self.api_url);
        let size = data.len();
        debug!(file_name = %file_name, size, "adding content to IPFS");

        let form = Form::new().part("file", Part::bytes(data).file_name(file_name.to_string()));
        let response = send_checked(self.client.post(&url).multipart(form), &url)
            .await
            .map_err(|e| StorageError::backend(ADD_FAILED, e))?;
        let added: IpfsAddResponse = response
            .json()
            .await
            .map_err(|e| StorageError::backend(ADD_FAILED, e))?;

        let canonical = uri::ensure_prefix(&added.hash);
        info!(uri = %canonical, name = %added.name, size = %added.size, "content added to IPFS");
        Ok(canonical)
    }
}

#[async_trait]
impl Storage for IpfsStorage {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Ipfs
    }

    async fn get_data(&self, resource_id: &str) -> StorageResult<Box<dyn Resource>> {
        let canonical = uri::ensure_prefix(resource_id);
        let cid = uri::strip_prefix(&canonical);
        let url = format!("{}/api/v0/cat?arg={cid}", self.api_url);
        debug!(cid = %cid, "fetching IPFS content");

        let response = send_checked(self.client.post(&url), &url).await?;
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(StorageError::from))
            .boxed();
        Ok(Box::new(IpfsResource::new(chunks)))
    }

    async fn store_file(&self, path: &Path) -> StorageResult<String> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        self.add(&file_name, data).await
    }

    async fn store_metadata(&self, properties: &serde_json::Value) -> StorageResult<String> {
        let json = metadata_json(properties)?;
        self.add("metadata.json", json).await
    }

    async fn store_base64_image(&self, base64: &str) -> StorageResult<String> {
        let image = decode_base64_image(base64)?;
        self.add("image", image).await
    }
}
