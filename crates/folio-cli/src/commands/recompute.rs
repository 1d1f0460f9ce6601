//! Recompute command - recompute the manifest without running a server

use crate::{Context, OutputFormat, Settings};
use anyhow::Result;
use chrono::Utc;

/// Execute the recompute command
///
/// # Errors
///
/// Missing configuration, unresolvable sections or a rejected write.
pub async fn execute(settings: &Settings, ctx: &Context) -> Result<()> {
    let client = super::client(settings)?;
    let outcome = folio_recompute::recompute(&client, Utc::now()).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => {
            println!("globalVersion: {}", outcome.global_version);
            let manifest = folio_manifest::VersionManifest::from(outcome.updated);
            for (key, token) in manifest.sections.iter() {
                println!("  {:<13} {}", key.version_field(), token.unwrap_or("-"));
            }
        }
    }
    Ok(())
}
