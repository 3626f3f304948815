// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Resolve {
            input,
            scan,
            manifest,
            lockfile,
        } => commands::cmd_resolve(
            input.as_deref(),
            &scan,
            manifest.as_deref(),
            lockfile.as_deref(),
        ),
        Commands::Compat { input, descriptor } => {
            commands::cmd_compat(&input, descriptor.as_deref())
        }
        Commands::Why { lockfile, package } => commands::cmd_why(&lockfile, &package),
        Commands::Orphaned { lockfile, packages } => commands::cmd_orphaned(&lockfile, &packages),
    }
}
