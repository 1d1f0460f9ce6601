//! Show command - print one content block

use crate::{Context, Settings};
use anyhow::{Context as _, Result};
use clap::Args;
use folio_cms::ContentKey;
use folio_gate::LaunchOptions;
use std::path::PathBuf;

/// Arguments for the show command
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Content block (home, about, contact, skills, experience, testimonials, projects, socials)
    pub key: ContentKey,

    /// Directory holding the persisted manifest and content snapshot
    #[arg(long)]
    pub state_dir: Option<PathBuf>,
}

/// Execute the show command
///
/// Reconciles first so tracked sections come from a fresh cache; untracked
/// blocks are fetched on demand.
///
/// # Errors
///
/// Fails when the block cannot be loaded.
pub async fn execute(args: ShowArgs, settings: &Settings, ctx: &Context) -> Result<()> {
    let client = super::client(settings)?;
    let state_dir = args.state_dir.or_else(|| settings.state_dir.clone());
    let store = super::open_store(state_dir.as_deref())?;
    let gate = super::gate(&client, store, settings, LaunchOptions::default().with_debug(ctx.debug));

    if !gate.start().await {
        tracing::warn!("Manifest check failed, content may be stale");
    }

    let content = gate
        .content(args.key)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Cannot load '{}'", args.key))?;

    println!("{}", serde_json::to_string_pretty(&*content)?);
    Ok(())
}
