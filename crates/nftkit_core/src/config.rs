use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chain::Chain;

const DEFAULT_IPFS_API_URL: &str = "http://127.0.0.1:5001";
const DEFAULT_IPFS_GATEWAY_URL: &str = "https://ipfs.io";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Storage backend selection
// ---------------------------------------------------------------------------

/// Which off-chain storage backend a [`StorageConfig`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Http,
    #[default]
    Ipfs,
    Aws,
    CloudMetadata,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Http => "http",
            StorageBackend::Ipfs => "ipfs",
            StorageBackend::Aws => "aws",
            StorageBackend::CloudMetadata => "cloud_metadata",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(StorageBackend::Http),
            "ipfs" => Ok(StorageBackend::Ipfs),
            "aws" | "s3" => Ok(StorageBackend::Aws),
            "cloud_metadata" | "cloud-metadata" | "metadata" => Ok(StorageBackend::CloudMetadata),
            other => anyhow::bail!("unknown storage backend: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage sections
// ---------------------------------------------------------------------------

/// IPFS node endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpfsSettings {
    /// Kubo RPC API base URL, e.g. `http://127.0.0.1:5001`.
    pub api_url: String,
    /// Public gateway used to build browsable links.
    pub gateway_url: String,
}

impl Default for IpfsSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_IPFS_API_URL.into(),
            gateway_url: DEFAULT_IPFS_GATEWAY_URL.into(),
        }
    }
}

/// S3 bucket settings. Credentials come from the standard AWS provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsSettings {
    pub bucket: String,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services (Minio, R2, ...).
    pub endpoint_url: Option<String>,
    /// Prepended to every key written by the SDK.
    pub key_prefix: String,
}

/// Cloud metadata API settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    pub endpoint: String,
    /// Never written to disk; supplied through `NFTKIT_METADATA_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

/// Everything needed to construct a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Total per-request timeout for HTTP-based backends; 0 disables it.
    pub http_timeout_secs: u64,
    pub ipfs: IpfsSettings,
    pub aws: AwsSettings,
    pub metadata: MetadataSettings,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            ipfs: IpfsSettings::default(),
            aws: AwsSettings::default(),
            metadata: MetadataSettings::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// NftKitConfig
// ---------------------------------------------------------------------------

/// SDK configuration stored at `~/.nftkit/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NftKitConfig {
    pub storage: StorageConfig,
    pub chain: Chain,
    /// Overrides the chain's default RPC endpoint when set.
    pub rpc_url: Option<String>,
    pub log_level: String,
}

impl Default for NftKitConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            chain: Chain::Sepolia,
            rpc_url: None,
            log_level: "info".into(),
        }
    }
}

impl NftKitConfig {
    /// Returns the base config directory: `~/.nftkit/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".nftkit"))
    }

    /// Returns the config file path: `~/.nftkit/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.nftkit/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Loads config from disk (creating the default file if missing), then
    /// applies environment overrides.
    pub fn load() -> Result<Self> {
        let base = Self::base_dir()?;
        std::fs::create_dir_all(&base)
            .with_context(|| format!("Failed to create directory: {}", base.display()))?;
        let mut config = Self::load_from_path(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// Load config from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Self =
                serde_json::from_str(&content).with_context(|| "Failed to parse config.json")?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Saves config to disk (the metadata API key is excluded via `#[serde(skip)]`).
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Save config to a specific file path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Apply `NFTKIT_*` environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored and
    /// unparseable values are logged and skipped.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get("NFTKIT_STORAGE_BACKEND") {
            match raw.parse() {
                Ok(backend) => self.storage.backend = backend,
                Err(e) => warn!("ignoring NFTKIT_STORAGE_BACKEND: {e}"),
            }
        }
        if let Some(v) = get("NFTKIT_IPFS_API_URL") {
            self.storage.ipfs.api_url = v;
        }
        if let Some(v) = get("NFTKIT_IPFS_GATEWAY_URL") {
            self.storage.ipfs.gateway_url = v;
        }
        if let Some(v) = get("NFTKIT_AWS_BUCKET") {
            self.storage.aws.bucket = v;
        }
        if let Some(v) = get("NFTKIT_AWS_REGION") {
            self.storage.aws.region = Some(v);
        }
        if let Some(v) = get("NFTKIT_AWS_ENDPOINT_URL") {
            self.storage.aws.endpoint_url = Some(v);
        }
        if let Some(v) = get("NFTKIT_METADATA_ENDPOINT") {
            self.storage.metadata.endpoint = v;
        }
        if let Some(v) = get("NFTKIT_METADATA_API_KEY") {
            self.storage.metadata.api_key = Some(v);
        }
        if let Some(raw) = get("NFTKIT_CHAIN") {
            match raw.parse() {
                Ok(chain) => self.chain = chain,
                Err(e) => warn!("ignoring NFTKIT_CHAIN: {e}"),
            }
        }
        if let Some(v) = get("NFTKIT_RPC_URL") {
            self.rpc_url = Some(v);
        }
        if let Some(v) = get("NFTKIT_LOG_LEVEL") {
            self.log_level = v;
        }
    }
}
