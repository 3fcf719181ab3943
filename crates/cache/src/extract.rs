// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Table name extraction and statement classification on raw SQL text
//!
//! Both functions work on rendered text rather than IR so that hand-written
//! statements are handled too. Extraction is a heuristic: an identifier that
//! is not really a table (e.g. `EXTRACT(YEAR FROM created_at)`) only causes
//! extra invalidation, never a stale read. Classification errs the same way:
//! a WITH statement mentioning any data-modifying keyword is a write.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

// "quoted" | `quoted` | [quoted] | bare, optionally dotted
const NAME: &str = r#"(?:"[^"]+"|`[^`]+`|\[[^\]]+\]|[A-Za-z_][\w$]*)(?:\s*\.\s*(?:"[^"]+"|`[^`]+`|\[[^\]]+\]|[A-Za-z_][\w$]*))*"#;
const ALIAS: &str = r#"(?:\s+(?:AS\s+)?[A-Za-z_][\w$]*)?"#;

// <keyword> [IF [NOT] EXISTS] <name>
static TABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:FROM|JOIN|INTO|UPDATE|TABLE)\s+(?:IF\s+(?:NOT\s+)?EXISTS\s+)?({NAME})"
    ))
    .expect("table pattern is a valid regex")
});

// FROM <name> [alias], <name> [alias], ...
static FROM_LIST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\bFROM\s+{NAME}{ALIAS}((?:\s*,\s*{NAME}{ALIAS})+)"
    ))
    .expect("from list pattern is a valid regex")
});

static LIST_ITEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i),\s*({NAME})")).expect("list item pattern is a valid regex")
});

// Data-modifying statement anywhere in the text, e.g. inside a CTE body
static WRITE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:INSERT|UPDATE|DELETE|MERGE)\b")
        .expect("write keyword pattern is a valid regex")
});

/// Words that can follow an anchor keyword without being a table
fn is_keyword(name: &str) -> bool {
    matches!(
        name,
        "select" | "lateral" | "only" | "unnest" | "values" | "set" | "where"
    )
}

/// Lower-cased, unqualified table names referenced by `sql`
pub fn extract_tables(sql: &str) -> BTreeSet<String> {
    let mut tables = BTreeSet::new();

    for captures in TABLE_PATTERN.captures_iter(sql) {
        if let Some(identifier) = captures.get(1) {
            insert_table(&mut tables, identifier.as_str());
        }
    }

    // `FROM a, b` joins implicitly; the anchored pattern only sees `a`
    for captures in FROM_LIST_PATTERN.captures_iter(sql) {
        let Some(rest) = captures.get(1) else {
            continue;
        };
        for item in LIST_ITEM_PATTERN.captures_iter(rest.as_str()) {
            if let Some(identifier) = item.get(1) {
                insert_table(&mut tables, identifier.as_str());
            }
        }
    }

    tables
}

fn insert_table(tables: &mut BTreeSet<String>, identifier: &str) {
    let Some(last) = identifier.rsplit('.').next() else {
        return;
    };

    let name = last
        .trim()
        .trim_matches(|c| matches!(c, '"' | '`' | '[' | ']'))
        .to_lowercase();

    if !name.is_empty() && !is_keyword(&name) {
        tables.insert(name);
    }
}

/// Whether a raw statement reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Write,
}

impl StatementKind {
    /// `Read` when the first keyword is SELECT, or WITH with no
    /// INSERT/UPDATE/DELETE/MERGE anywhere in the text; otherwise `Write`
    ///
    /// Leading whitespace, opening parentheses and `--` / `/* */` comments
    /// are skipped.
    pub fn classify(sql: &str) -> Self {
        let body = skip_preamble(sql);
        let keyword: String = body
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();

        if keyword.eq_ignore_ascii_case("select") {
            StatementKind::Read
        } else if keyword.eq_ignore_ascii_case("with") && !WRITE_KEYWORD.is_match(body) {
            StatementKind::Read
        } else {
            StatementKind::Write
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, StatementKind::Read)
    }
}

fn skip_preamble(mut sql: &str) -> &str {
    loop {
        let trimmed = sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(');

        if let Some(rest) = trimmed.strip_prefix("--") {
            sql = rest.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(rest) = trimmed.strip_prefix("/*") {
            sql = rest.split_once("*/").map_or("", |(_, after)| after);
        } else {
            return trimmed;
        }
    }
}
