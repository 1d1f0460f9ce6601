//! # folio-cli
//!
//! Command-line front end for folio.
//!
//! ## Commands
//!
//! - `folio sync` - reconcile the local content cache against the live manifest
//! - `folio show <key>` - print one content block
//! - `folio probe` - check whether the CMS answers
//! - `folio recompute` - recompute and store the manifest
//! - `folio serve` - run the recompute / manifest-proxy server
//!
//! ## Configuration
//!
//! Settings come from an optional TOML file (`--config`), then from the
//! environment for anything the file leaves unset:
//!
//! - `CMS_URL`, `CMS_TOKEN`, `CMS_MANIFEST_TOKEN`
//! - `CMS_WEBHOOK_SECRET`
//! - `RUST_LOG`

#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![allow(clippy::print_stdout)]

pub mod commands;
pub mod logging;
pub mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use settings::Settings;

/// folio command-line interface
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// CMS origin, overriding file and environment
    #[arg(long, global = true)]
    pub cms_url: Option<String>,

    /// Verbose diagnostics for the reconciliation steps
    #[arg(long, global = true)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load settings and apply command-line overrides
    ///
    /// # Errors
    ///
    /// Fails if the settings file cannot be read or parsed.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(url) = &self.cms_url {
            settings.cms = settings.cms.with_base_url(url);
        }
        Ok(settings)
    }

    /// Flags shared by every command
    #[must_use]
    pub fn context(&self) -> Context {
        Context {
            debug: self.debug,
            format: self.format,
        }
    }
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconcile cached content against the live manifest
    Sync(commands::sync::SyncArgs),
    /// Print one content block
    Show(commands::show::ShowArgs),
    /// Check whether the CMS origin answers
    Probe,
    /// Recompute the manifest from CMS timestamps and store it
    Recompute,
    /// Serve the recompute endpoint and the manifest proxy
    Serve(commands::serve::ServeArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Flags shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    /// `--debug` was given
    pub debug: bool,
    /// Output format
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_cms::ContentKey;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from([
            "folio",
            "sync",
            "--state-dir",
            "/tmp/folio",
            "--clear-cache",
            "--debug",
            "--format",
            "json",
        ]);

        assert!(cli.debug);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Sync(args) => {
                assert!(args.clear_cache);
                assert!(!args.bypass_cooldown);
                assert_eq!(args.state_dir, Some(PathBuf::from("/tmp/folio")));
                assert_eq!(args.watch, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_parses_content_key() {
        let cli = Cli::parse_from(["folio", "show", "projects"]);
        match cli.command {
            Commands::Show(args) => assert_eq!(args.key, ContentKey::Projects),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_rejects_unknown_key() {
        assert!(Cli::try_parse_from(["folio", "show", "blog"]).is_err());
    }

    #[test]
    fn cms_url_flag_overrides_settings() {
        let cli = Cli::parse_from(["folio", "--cms-url", "http://cms.local:1337/", "probe"]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.cms.base(), Some("http://cms.local:1337"));
    }
}
