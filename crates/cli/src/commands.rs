// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Subcommand implementations; each returns the text to print

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use unified_sql_query_cache::{Fingerprint, StatementKind, extract_tables};
use unified_sql_query_compiler::compile;
use unified_sql_query_ir::{Dialect, Statement, Value};

pub fn compile_statement(dialect: Dialect, input: &str) -> Result<String> {
    let statement: Statement =
        serde_json::from_str(input).context("input is not a valid statement")?;

    let compiled = compile(dialect, &statement)?;
    for stmt in &compiled {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "compiled");
    }

    Ok(serde_json::to_string_pretty(&compiled)?)
}

pub fn fingerprint(dialect: Dialect, sql: &str, params: &str) -> Result<String> {
    let params: Vec<Value> =
        serde_json::from_str(params).context("--params must be a JSON array")?;

    let fingerprint = Fingerprint::new(dialect, sql, &params);
    let kind = match StatementKind::classify(sql) {
        StatementKind::Read => "read",
        StatementKind::Write => "write",
    };

    Ok(format!("{fingerprint} ({kind})"))
}

pub fn tables(sql: &str) -> String {
    extract_tables(sql)
        .into_iter()
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}
