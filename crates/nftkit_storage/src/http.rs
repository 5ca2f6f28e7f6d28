//! Plain HTTP(S) backend. Read-only: resources are fetched by URL.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use nftkit_core::StorageBackend;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::resource::{ParsedData, Resource};
use crate::traits::Storage;

/// A resource whose payload is already a byte buffer.
pub struct HttpResource {
    data: Bytes,
    parsed: ParsedData,
}

impl HttpResource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            parsed: ParsedData::new(),
        }
    }
}

#[async_trait]
impl Resource for HttpResource {
    fn parsed_data(&self) -> &ParsedData {
        &self.parsed
    }

    async fn parse_data(&self) -> StorageResult<Bytes> {
        Ok(self.data.clone())
    }
}

/// Fetches resources by absolute URL.
pub struct HttpStorage {
    client: Client,
}

impl HttpStorage {
    pub fn new(timeout: Duration) -> StorageResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Storage for HttpStorage {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Http
    }

    async fn get_data(&self, resource_id: &str) -> StorageResult<Box<dyn Resource>> {
        debug!(url = %resource_id, "fetching HTTP resource");
        let response = send_checked(self.client.get(resource_id), resource_id).await?;
        let body = response.bytes().await?;
        Ok(Box::new(HttpResource::new(body)))
    }
}

/// Client with a total request timeout. `Duration::ZERO` disables the timeout.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    let mut builder = Client::builder();
    if !timeout.is_zero() {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Send a request and turn a non-success status into [`StorageError::Status`].
pub(crate) async fn send_checked(request: RequestBuilder, url: &str) -> StorageResult<Response> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(StorageError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(response)
}
