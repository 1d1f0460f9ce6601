//! Probe command - check whether the CMS origin answers

use crate::{Context, OutputFormat, Settings};
use anyhow::Result;
use folio_gate::ReachabilityGuard;
use serde_json::json;

/// Execute the probe command
///
/// # Errors
///
/// Fails when the origin is down, so the exit status can be scripted.
pub async fn execute(settings: &Settings, ctx: &Context) -> Result<()> {
    let client = super::client(settings)?;
    let guard = ReachabilityGuard::new(client);
    let up = guard.check().await;
    let base = settings.cms.base().unwrap_or("<unset>");

    match ctx.format {
        OutputFormat::Json => println!("{}", json!({ "base": base, "up": up })),
        OutputFormat::Text => println!("{base}: {}", if up { "up" } else { "down" }),
    }

    if up {
        Ok(())
    } else {
        anyhow::bail!("CMS at {base} is unreachable")
    }
}
