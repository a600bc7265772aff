//! Logging init for programs embedding this crate.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,phedex=debug";

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG`
/// (default `info,phedex=debug`).
///
/// Fails if a global subscriber is already set.
pub fn init_logging() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    tracing::debug!("phedex logging initialized");
    Ok(())
}
