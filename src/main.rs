mod cli;
mod commands;
mod config;
mod error;
mod metadata;
mod tidy;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Scan {
            path,
            folder_format,
            file_format,
            json,
            save,
            tree,
        } => {
            commands::scan::run(
                config,
                path.as_ref(),
                folder_format,
                file_format,
                json,
                save.as_deref(),
                tree,
                cli.quiet,
            )?;
        }
        Commands::Apply {
            path,
            plan,
            only,
            folder_format,
            file_format,
            no_dry_run,
        } => {
            commands::apply::run(
                config,
                path.as_ref(),
                plan.as_deref(),
                only.as_deref(),
                folder_format,
                file_format,
                no_dry_run,
                cli.quiet,
            )?;
        }
        Commands::Check { path } => {
            commands::check::run(&path)?;
        }
        Commands::Formats => {
            commands::formats::run()?;
        }
        Commands::Init { library, force } => {
            commands::init::run(config, library.as_deref(), force)?;
        }
    }

    Ok(())
}
