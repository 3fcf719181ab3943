// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Compiled-statement assertions

use unified_sql_query_compiler::{CompiledStatement, DiagnosticKind};
use unified_sql_query_ir::{Dialect, PlaceholderStyle};

/// Custom assertion helpers for compiled SQL
pub struct SqlAssertions;

impl SqlAssertions {
    /// Number of placeholder tokens in `sql` for the dialect's placeholder style
    pub fn count_placeholders(dialect: Dialect, sql: &str) -> usize {
        match dialect.capabilities().placeholder {
            PlaceholderStyle::Positional => sql.matches('?').count(),
            PlaceholderStyle::Indexed => sql
                .match_indices('$')
                .filter(|(i, _)| {
                    sql[i + 1..]
                        .chars()
                        .next()
                        .is_some_and(|c| c.is_ascii_digit())
                })
                .count(),
            PlaceholderStyle::Named { prefix } => sql
                .match_indices(prefix)
                .filter(|(i, _)| sql[i + prefix.len_utf8()..].starts_with('p'))
                .count(),
        }
    }

    /// Assert that placeholders and params agree in number, and that indexed
    /// or named placeholders appear as 1..=n in text order
    pub fn assert_params_aligned(dialect: Dialect, statement: &CompiledStatement) {
        let n = statement.params.len();
        assert_eq!(
            Self::count_placeholders(dialect, &statement.sql),
            n,
            "placeholder count differs from params in: {}",
            statement.sql
        );

        let style = dialect.capabilities().placeholder;
        let token = |k: usize| match style {
            PlaceholderStyle::Named { prefix } => format!("{prefix}p{k}"),
            _ => format!("${k}"),
        };
        if style == PlaceholderStyle::Positional {
            return;
        }

        let mut from = 0;
        for k in 1..=n {
            let tok = token(k);
            let found = statement.sql[from..]
                .find(&tok)
                .unwrap_or_else(|| panic!("{tok} missing or out of order in: {}", statement.sql));
            from += found + tok.len();
        }

        if let PlaceholderStyle::Named { .. } = style {
            let expected: Vec<String> = (1..=n).map(|k| format!("p{k}")).collect();
            assert_eq!(statement.named_params, expected, "named params mismatch");
        }
    }

    /// Assert that a statement carries a diagnostic matching `predicate`
    pub fn assert_diagnostic(
        statement: &CompiledStatement,
        predicate: impl Fn(&DiagnosticKind) -> bool,
    ) {
        assert!(
            statement.diagnostics.iter().any(|d| predicate(&d.kind)),
            "expected diagnostic not found, got {:?}",
            statement.diagnostics
        );
    }

    /// Assert that a DDL statement has no parameters
    pub fn assert_no_params(statement: &CompiledStatement) {
        assert!(
            statement.params.is_empty(),
            "expected no params for: {}",
            statement.sql
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unified_sql_query_ir::Value;

    #[test]
    fn test_count_placeholders() {
        assert_eq!(SqlAssertions::count_placeholders(Dialect::MySQL, "a = ? AND b = ?"), 2);
        assert_eq!(
            SqlAssertions::count_placeholders(Dialect::PostgreSQL, "a = $1 AND b = '$x'"),
            1
        );
        assert_eq!(SqlAssertions::count_placeholders(Dialect::MsSql, "a = @p1"), 1);
    }

    #[test]
    fn test_assert_params_aligned() {
        let stmt = CompiledStatement::with_params(
            "SELECT * FROM t WHERE a = $1 LIMIT $2",
            vec![Value::Integer(1), Value::Integer(2)],
        );
        SqlAssertions::assert_params_aligned(Dialect::PostgreSQL, &stmt);
    }

    #[test]
    #[should_panic]
    fn test_assert_params_aligned_detects_mismatch() {
        let stmt = CompiledStatement::with_params("SELECT ?", vec![]);
        SqlAssertions::assert_params_aligned(Dialect::MySQL, &stmt);
    }
}
