// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use unified_sql_query_ir::Dialect;

#[derive(Parser)]
#[command(name = "usq")]
#[command(about = "usq - compile dialect-neutral statements to SQL and inspect cache keys")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a JSON-encoded statement and print SQL, params and diagnostics
    Compile {
        /// Target dialect (postgresql, mysql, sqlite, mssql, or an alias)
        #[arg(short, long)]
        dialect: Dialect,

        /// Read the statement from a file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the cache fingerprint of a SQL statement
    Fingerprint {
        #[arg(short, long)]
        dialect: Dialect,

        /// SQL text as it would be executed
        #[arg(short, long)]
        sql: String,

        /// Parameters as a JSON array
        #[arg(short, long, default_value = "[]")]
        params: String,
    },

    /// Print the table names a SQL statement references
    Tables {
        #[arg(short, long)]
        sql: String,
    },
}
