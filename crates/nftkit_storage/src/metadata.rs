//! Hosted metadata API backend.
//!
//! The service accepts token metadata and inline images and answers with the
//! public URL it serves them from:
//!
//! - `POST {endpoint}/metadata` with the JSON properties
//! - `POST {endpoint}/images` with `{"image": "<base64>"}`
//!
//! Both respond with `{"uri": "<url>"}`. Stored resources are read back over
//! plain HTTP.

use std::time::Duration;

use async_trait::async_trait;
use nftkit_core::{MetadataSettings, StorageBackend};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::http::{HttpResource, build_client, send_checked};
use crate::resource::Resource;
use crate::traits::{Storage, base64_payload, decode_base64_image};

#[derive(Debug, Deserialize)]
struct StoredResponse {
    uri: String,
}

pub struct CloudMetadataStorage {
    client: Client,
    endpoint: String,
    /// Sent on writes to `endpoint` only, never on reads of returned URLs.
    auth: Option<HeaderValue>,
}

impl CloudMetadataStorage {
    pub fn new(settings: &MetadataSettings, timeout: Duration) -> StorageResult<Self> {
        let endpoint = settings.endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(StorageError::RequiredField("metadata.endpoint"));
        }

        let auth = settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|key| {
                let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                    StorageError::backend("invalid characters in metadata API key", e)
                })?;
                value.set_sensitive(true);
                Ok::<_, StorageError>(value)
            })
            .transpose()?;

        let client = build_client(timeout)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            auth,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, path: &str, body: &serde_json::Value, failure: &'static str) -> StorageResult<String> {
        let url = format!("{}/{path}", self.endpoint);
        debug!(url = %url, "posting to metadata API");

        let mut request = self.client.post(&url).json(body);
        if let Some(auth) = &self.auth {
            request = request.header(AUTHORIZATION, auth.clone());
        }
        let response = send_checked(request, &url)
            .await
            .map_err(|e| StorageError::backend(failure, e))?;
        let stored: StoredResponse = response
            .json()
            .await
            .map_err(|e| StorageError::backend(failure, e))?;

        info!(uri = %stored.uri, "stored via metadata API");
        Ok(stored.uri)
    }
}

#[async_trait]
impl Storage for CloudMetadataStorage {
    fn backend(&self) -> StorageBackend {
        StorageBackend::CloudMetadata
    }

    async fn get_data(&self, resource_id: &str) -> StorageResult<Box<dyn Resource>> {
        debug!(url = %resource_id, "fetching hosted metadata");
        let response = send_checked(self.client.get(resource_id), resource_id).await?;
        let body = response.bytes().await?;
        Ok(Box::new(HttpResource::new(body)))
    }

    async fn store_metadata(&self, properties: &serde_json::Value) -> StorageResult<String> {
        self.post("metadata", properties, "failed to store metadata")
            .await
    }

    async fn store_base64_image(&self, base64: &str) -> StorageResult<String> {
        // Reject malformed payloads before they reach the service.
        decode_base64_image(base64)?;
        let body = serde_json::json!({ "image": base64_payload(base64) });
        self.post("images", &body, "failed to store image").await
    }
}
