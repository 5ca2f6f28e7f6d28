//! AWS S3 (and S3-compatible) object storage backend.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use nftkit_core::{AwsSettings, StorageBackend};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::resource::{ParsedData, Resource};
use crate::traits::{Storage, metadata_json};

/// A resource backed by an S3 `GetObject` response body.
pub struct AwsResource {
    data: Mutex<Option<ByteStream>>,
    parsed: ParsedData,
}

impl AwsResource {
    pub fn new(body: ByteStream) -> Self {
        Self {
            data: Mutex::new(Some(body)),
            parsed: ParsedData::new(),
        }
    }
}

#[async_trait]
impl Resource for AwsResource {
    fn parsed_data(&self) -> &ParsedData {
        &self.parsed
    }

    async fn parse_data(&self) -> StorageResult<Bytes> {
        let body = self.data.lock().await.take().ok_or_else(|| {
            StorageError::backend(
                "S3 object body was already drained",
                "payload consumed by an earlier parse",
            )
        })?;
        let aggregated = body
            .collect()
            .await
            .map_err(|e| StorageError::backend("failed to read S3 object body", e))?;
        Ok(aggregated.into_bytes())
    }
}

/// Object storage keyed by S3 object key.
///
/// Bucket structure:
/// ```text
/// {bucket}/
///   {key_prefix}{file_name}
///   {key_prefix}metadata/{uuid}.json
/// ```
pub struct AwsStorage {
    client: Client,
    bucket: String,
    key_prefix: String,
}

impl AwsStorage {
    /// Build a client from the standard AWS provider chain, applying the
    /// region and endpoint overrides from `settings`.
    pub async fn new(settings: &AwsSettings) -> StorageResult<Self> {
        if settings.bucket.trim().is_empty() {
            return Err(StorageError::RequiredField("aws.bucket"));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint_url {
            // S3-compatible services generally need path-style addressing.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        Ok(Self::with_client(
            client,
            settings.bucket.trim(),
            settings.key_prefix.clone(),
        ))
    }

    /// Create from an existing SDK client.
    pub fn with_client(client: Client, bucket: impl Into<String>, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            key_prefix: key_prefix.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Accept either a bare key or `s3://<bucket>/<key>` for this bucket.
    fn object_key<'a>(&self, resource_id: &'a str) -> &'a str {
        resource_id
            .strip_prefix("s3://")
            .and_then(|rest| rest.strip_prefix(self.bucket.as_str()))
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(resource_id)
    }

    async fn put(&self, key: String, body: Vec<u8>, content_type: &str) -> StorageResult<String> {
        debug!(bucket = %self.bucket, key = %key, size = body.len(), "putting S3 object");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::backend(format!("failed to store S3 object {key}"), e))?;

        info!(bucket = %self.bucket, key = %key, "S3 object stored");
        Ok(key)
    }
}

#[async_trait]
impl Storage for AwsStorage {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Aws
    }

    async fn get_data(&self, resource_id: &str) -> StorageResult<Box<dyn Resource>> {
        let key = self.object_key(resource_id);
        debug!(bucket = %self.bucket, key = %key, "fetching S3 object");

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::backend(format!("failed to fetch S3 object {key}"), e))?;
        Ok(Box::new(AwsResource::new(output.body)))
    }

    async fn store_file(&self, path: &Path) -> StorageResult<String> {
        let body = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or(StorageError::RequiredField("file_name"))?;
        let key = format!("{}{file_name}", self.key_prefix);
        self.put(key, body, content_type_for(path)).await
    }

    async fn store_metadata(&self, properties: &serde_json::Value) -> StorageResult<String> {
        let body = metadata_json(properties)?;
        let key = format!("{}metadata/{}.json", self.key_prefix, uuid::Uuid::new_v4());
        self.put(key, body, "application/json").await
    }
}

/// MIME type guessed from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("json") => "application/json",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_storage() -> AwsStorage {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        AwsStorage::with_client(Client::from_conf(config), "nft-assets", "collection/")
    }

    #[tokio::test]
    async fn aws_resource_reads_whole_body() {
        let resource = AwsResource::new(ByteStream::from_static(b"hello!"));
        assert_eq!(resource.string_data().await.unwrap(), "hello!");
        assert_eq!(resource.base64_data().await.unwrap(), "aGVsbG8h");
    }

    #[tokio::test]
    async fn aws_resource_json_view() {
        let resource = AwsResource::new(ByteStream::from(br#"{"name":"RD"}"#.to_vec()));
        let json = resource.json_data().await.unwrap();
        assert_eq!(json["name"], "RD");
    }

    #[tokio::test]
    async fn new_requires_bucket() {
        let err = AwsStorage::new(&AwsSettings::default()).await.err().unwrap();
        assert!(matches!(err, StorageError::RequiredField("aws.bucket")));
    }

    #[test]
    fn object_key_accepts_s3_uri_for_own_bucket() {
        let storage = offline_storage();
        assert_eq!(storage.object_key("s3://nft-assets/collection/1.json"), "collection/1.json");
        assert_eq!(storage.object_key("collection/1.json"), "collection/1.json");
        assert_eq!(
            storage.object_key("s3://other-bucket/1.json"),
            "s3://other-bucket/1.json"
        );
    }

    #[tokio::test]
    async fn base64_images_are_not_supported() {
        let err = offline_storage().store_base64_image("aGVsbG8h").await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::NotImplemented { backend: StorageBackend::Aws, .. }
        ));
    }

    #[tokio::test]
    async fn store_file_reports_missing_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = offline_storage()
            .store_file(&dir.path().join("missing.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for(Path::new("a/b.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("meta.json")), "application/json");
        assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
    }
}
