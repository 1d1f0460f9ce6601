//! Sync command - reconcile cached content against the live manifest

use crate::{Context, OutputFormat, Settings};
use anyhow::Result;
use clap::Args;
use folio_cms::CmsClient;
use folio_gate::{GateState, LaunchOptions, ReachabilityGuard, VersionGate};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the sync command
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Directory holding the persisted manifest and content snapshot
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Wipe persisted caches before reconciling
    #[arg(long)]
    pub clear_cache: bool,

    /// Ignore the refetch cooldown
    #[arg(long)]
    pub bypass_cooldown: bool,

    /// Keep running and refetch every N seconds
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,

    /// Skip the reachability probe
    #[arg(long)]
    pub no_probe: bool,
}

impl SyncArgs {
    /// Launch options these flags stand for
    #[must_use]
    pub fn launch_options(&self, ctx: &Context) -> LaunchOptions {
        LaunchOptions::default()
            .with_debug(ctx.debug)
            .with_clear_cache(self.clear_cache)
            .with_bypass_cooldown(self.bypass_cooldown)
    }
}

/// Execute the sync command
///
/// # Errors
///
/// Fails when the CMS is unreachable, or when the first reconciliation
/// fails and no `--watch` loop was requested.
pub async fn execute(args: SyncArgs, settings: &Settings, ctx: &Context) -> Result<()> {
    let client = super::client(settings)?;
    let state_dir = args.state_dir.clone().or_else(|| settings.state_dir.clone());
    let store = super::open_store(state_dir.as_deref())?;
    let gate = super::gate(&client, store, settings, args.launch_options(ctx));
    let guard = ReachabilityGuard::new(Arc::clone(&client));

    if !args.no_probe && !guard.check().await {
        anyhow::bail!(
            "CMS at {} is unreachable",
            settings.cms.base().unwrap_or("<unset>")
        );
    }

    let ok = gate.start().await;
    report(&gate, ctx)?;

    match args.watch {
        Some(secs) => watch(&gate, &guard, Duration::from_secs(secs.max(1)), ctx).await,
        None if ok => Ok(()),
        None => anyhow::bail!("{}", failure(&gate.state())),
    }
}

async fn watch(gate: &VersionGate, guard: &ReachabilityGuard<Arc<CmsClient>>, every: Duration, ctx: &Context) -> Result<()> {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    tracing::info!("Watching for content changes every {}s", every.as_secs());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if guard.is_down() && !guard.retry().await {
                    continue;
                }
                gate.refetch().await;
                report(gate, ctx)?;
            }
            _ = tokio::signal::ctrl_c() => {
                gate.unmount();
                tracing::info!("Stopping watch");
                return Ok(());
            }
        }
    }
}

fn failure(state: &GateState) -> String {
    state
        .error
        .as_ref()
        .map_or_else(|| "Reconciliation failed".to_string(), |e| format!("Reconciliation failed: {e}"))
}

fn report(gate: &VersionGate, ctx: &Context) -> Result<()> {
    let state = gate.state();
    let cached: Vec<String> = gate
        .cache()
        .snapshot()
        .iter()
        .map(|content| content.key().to_string())
        .collect();
    let persistence = format!("{:?}", gate.persistence()).to_lowercase();
    let global = state.manifest.as_ref().map(|m| m.global_version.clone());

    match ctx.format {
        OutputFormat::Json => {
            let line = json!({
                "phase": state.phase.to_string(),
                "ok": state.ok,
                "globalVersion": global,
                "persistence": persistence,
                "cached": cached,
                "error": state.error.as_ref().map(ToString::to_string),
            });
            println!("{}", serde_json::to_string(&line)?);
        }
        OutputFormat::Text => {
            println!("phase:       {}", state.phase);
            println!("manifest:    {}", global.as_deref().unwrap_or("-"));
            println!("persistence: {persistence}");
            println!("cached:      {}", if cached.is_empty() { "-".to_string() } else { cached.join(", ") });
            if let Some(error) = &state.error {
                println!("error:       {error}");
            }
        }
    }
    Ok(())
}
