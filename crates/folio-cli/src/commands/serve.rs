//! Serve command - run the recompute endpoint and manifest proxy

use crate::Settings;
use anyhow::Result;
use clap::Args;
use std::net::SocketAddr;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding the settings file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

/// Execute the serve command; runs until Ctrl-C
///
/// # Errors
///
/// Bind or serve failures.
pub async fn execute(args: ServeArgs, settings: &Settings) -> Result<()> {
    let mut config = settings.recompute();
    if let Some(bind) = args.bind {
        config = config.with_bind(bind);
    }
    if config.webhook_secret.is_none() {
        tracing::warn!("No webhook secret configured; recompute requests will be refused");
    }

    folio_recompute::serve(config, async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutting down");
    })
    .await?;
    Ok(())
}
