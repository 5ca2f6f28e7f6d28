pub mod chain;
pub mod config;
pub mod logging;

pub use chain::Chain;
pub use config::{
    AwsSettings, IpfsSettings, MetadataSettings, NftKitConfig, StorageBackend, StorageConfig,
};
pub use logging::{init_logging, init_logging_from_config, init_logging_to_dir};
