//! Bridge process entrypoint.
//!
//! Loads configuration, builds the shared [`bridge_core::Context`], and hands
//! off to [`bridge_core::supervisor::run`] to spawn the worker loops this
//! process is configured for, returning only after a shutdown signal has
//! drained every loop.
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `CONFIG` (or `--config`) names the JSON configuration file
//! - `OTEL_*` variables enable tracing export when built with `telemetry`

use dotenvy::dotenv;

use bridge_core::config::Config;
use bridge_core::util::SigDown;
use bridge_core::{Context, supervisor};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    rustls::crypto::CryptoProvider::install_default(rustls::crypto::ring::default_provider())
        .expect("Failed to initialize rustls crypto provider");

    dotenv().ok();

    let config = Config::load()?;
    tracing::info!(
        signer_identity = %config.signer_identity,
        is_leader = config.is_leader,
        "bridge: configuration loaded"
    );

    let ctx = Context::build(config).await?;
    let sig_down = SigDown::try_new()?;
    let cancel = sig_down.cancellation_token();

    supervisor::run(ctx, cancel).await?;
    Ok(())
}
