//! Lazily materialized view over one fetched payload.
//!
//! A [`Resource`] wraps backend-native data (a byte buffer, a chunk stream, an
//! S3 body) and turns it into a single [`Bytes`] buffer the first time any
//! view is requested. Every later view derives from that same buffer.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use tokio::sync::OnceCell;

use crate::error::{StorageError, StorageResult};

/// Materialized bytes of a resource. Set at most once.
pub type ParsedData = OnceCell<Bytes>;

#[async_trait]
pub trait Resource: Send + Sync {
    /// The at-most-once cell holding the materialized bytes.
    fn parsed_data(&self) -> &ParsedData;

    /// Backend-specific extraction of the raw payload into one buffer.
    ///
    /// Called through [`Resource::set_parsed_data`]; calling it directly
    /// bypasses the cell.
    async fn parse_data(&self) -> StorageResult<Bytes>;

    /// Populate [`Resource::parsed_data`] unless it is already set.
    ///
    /// Concurrent first-time callers wait on the same initialization, so
    /// `parse_data` runs once per successful materialization.
    async fn set_parsed_data(&self) -> StorageResult<()> {
        self.parsed_data()
            .get_or_try_init(|| self.parse_data())
            .await?;
        Ok(())
    }

    /// Whether the payload has been materialized.
    fn is_parsed(&self) -> bool {
        self.parsed_data().initialized()
    }

    async fn bytes_data(&self) -> StorageResult<Bytes> {
        self.set_parsed_data().await?;
        self.parsed_data().get().cloned().ok_or_else(|| {
            StorageError::backend(
                "resource has no materialized bytes",
                "set_parsed_data returned without filling the cell",
            )
        })
    }

    /// UTF-8 view. Invalid sequences become U+FFFD.
    async fn string_data(&self) -> StorageResult<String> {
        let bytes = self.bytes_data().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn json_data(&self) -> StorageResult<serde_json::Value> {
        let text = self.string_data().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Standard padded base64 view.
    async fn base64_data(&self) -> StorageResult<String> {
        let bytes = self.bytes_data().await?;
        Ok(STANDARD.encode(&bytes))
    }
}
