use std::path::Path;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::config::NftKitConfig;

const LOG_FILE_PREFIX: &str = "nftkit";

/// Daily-rolling, non-ANSI file layer writing `nftkit.<date>` files in `dir`.
fn file_layer<S>(dir: &Path) -> Result<(impl Layer<S>, WorkerGuard)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);
    Ok((layer, guard))
}

/// `RUST_LOG` wins over `fallback`.
fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// File logging under `~/.nftkit/logs` plus compact console output.
///
/// Keep the returned guard alive for the life of the process or buffered
/// lines are lost.
pub fn init_logging(default_filter: &str) -> Result<WorkerGuard> {
    let (file, guard) = file_layer(&NftKitConfig::logs_dir()?)?;
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(file)
        .with(fmt::layer().with_target(false).compact())
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(guard)
}

/// [`init_logging`] with the level from `config.log_level`.
pub fn init_logging_from_config(config: &NftKitConfig) -> Result<WorkerGuard> {
    init_logging(&config.log_level)
}

/// File-only logging into `logs_dir`, for tests and embedders.
pub fn init_logging_to_dir(logs_dir: &Path, filter: &str) -> Result<WorkerGuard> {
    let (file, guard) = file_layer(logs_dir)?;
    tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(file)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(guard)
}
