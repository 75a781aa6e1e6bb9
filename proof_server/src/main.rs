//! Serves inclusion proofs for the outgoing message accumulator of the message bridge.

use std::{fs, path::Path, sync::Arc};

use anyhow::Context;
use clap::Parser;
use serde::de::DeserializeOwned;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, trace, warn};

use crate::{config::Config, logging::LoggerConfig, server::SharedMmr};

mod args;
mod config;
mod errors;
mod logging;
mod server;
mod source;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(LoggerConfig::new("proof-server"));

    let cli = args::Cli::parse();
    let config = parse_toml::<Config>(&cli.config)?;
    config.validate().context("invalid configuration")?;

    let mmr: SharedMmr = Arc::new(RwLock::new(Default::default()));
    match source::refresh(&config.leaves_path, &mmr).await {
        Ok(loaded) => info!(%loaded, "loaded accumulator leaves"),
        Err(e) => warn!(%e, "starting with an empty accumulator"),
    }

    tokio::spawn(source::run(
        config.leaves_path.clone(),
        mmr.clone(),
        config.refresh_interval(),
    ));

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "proof server listening");

    axum::serve(listener, server::router(mmr))
        .await
        .context("proof server stopped")?;

    Ok(())
}

/// Reads and parses a TOML file from the given path into the given type `T`.
fn parse_toml<T>(path: impl AsRef<Path>) -> anyhow::Result<T>
where
    T: std::fmt::Debug + DeserializeOwned,
{
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read TOML file {}", path.display()))?;
    trace!(?contents, "read file");

    let parsed = toml::from_str::<T>(&contents)
        .with_context(|| format!("failed to parse TOML file {}", path.display()))?;
    debug!(?parsed, "parsed TOML file");

    Ok(parsed)
}
