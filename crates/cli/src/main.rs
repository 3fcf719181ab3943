// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let output = match cli.command {
        Commands::Compile { dialect, file } => {
            let input = commands::read_input(file.as_deref())?;
            commands::compile_statement(dialect, &input)?
        }
        Commands::Fingerprint {
            dialect,
            sql,
            params,
        } => commands::fingerprint(dialect, &sql, &params)?,
        Commands::Tables { sql } => commands::tables(&sql),
    };

    println!("{output}");
    Ok(())
}
