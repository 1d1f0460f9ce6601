//! `folio` binary entry point

use anyhow::Result;
use clap::Parser;
use folio_cli::{logging, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug, cli.json_logs);

    let settings = cli.settings()?;
    let ctx = cli.context();

    match cli.command {
        Commands::Sync(args) => folio_cli::commands::sync::execute(args, &settings, &ctx).await,
        Commands::Show(args) => folio_cli::commands::show::execute(args, &settings, &ctx).await,
        Commands::Probe => folio_cli::commands::probe::execute(&settings, &ctx).await,
        Commands::Recompute => folio_cli::commands::recompute::execute(&settings, &ctx).await,
        Commands::Serve(args) => folio_cli::commands::serve::execute(args, &settings).await,
    }
}
