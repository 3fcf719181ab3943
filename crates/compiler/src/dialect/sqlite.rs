// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SQLite compiler
//!
//! SQLite has the narrowest capability set of the supported dialects:
//! - RIGHT and FULL JOIN are downgraded to LEFT JOIN
//! - AUTOINCREMENT only exists as `INTEGER PRIMARY KEY AUTOINCREMENT`
//! - ALTER TABLE can add columns but not constraints, and an added NOT NULL
//!   column needs a default
//!
//! Each downgrade is reported as a diagnostic on the compiled statement.

use crate::{CompileContext, CompiledStatement, Compiler};
use unified_sql_query_ir::{Dialect, LogicalType, Value};

/// SQLite IR → SQL compiler
pub struct SQLiteCompiler;

impl Compiler for SQLiteCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    // SQLite type affinity: the declared name only selects a storage class
    fn map_type(&self, ty: &LogicalType) -> String {
        match ty {
            LogicalType::Integer | LogicalType::BigInteger => "INTEGER".to_string(),
            LogicalType::String { length } => format!("VARCHAR({length})"),
            LogicalType::Text | LogicalType::Json | LogicalType::Uuid => "TEXT".to_string(),
            LogicalType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            LogicalType::Float => "REAL".to_string(),
            LogicalType::Boolean => "BOOLEAN".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::DateTime | LogicalType::Timestamp => "DATETIME".to_string(),
            LogicalType::Binary => "BLOB".to_string(),
        }
    }

    fn compile_has_table(&self, ctx: &mut CompileContext, table: &str) -> CompiledStatement {
        let table = ctx.bind(&Value::from(table));
        ctx.finish(format!(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = {table}"
        ))
    }

    fn compile_has_column(
        &self,
        ctx: &mut CompileContext,
        table: &str,
        column: &str,
    ) -> CompiledStatement {
        let table = ctx.bind(&Value::from(table));
        let column = ctx.bind(&Value::from(column));
        ctx.finish(format!(
            "SELECT 1 FROM pragma_table_info({table}) WHERE name = {column}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_type_affinity() {
        let c = SQLiteCompiler;
        assert_eq!(c.map_type(&LogicalType::BigInteger), "INTEGER");
        assert_eq!(c.map_type(&LogicalType::Json), "TEXT");
        assert_eq!(c.map_type(&LogicalType::Float), "REAL");
    }

    #[test]
    fn test_has_column_uses_pragma() {
        let c = SQLiteCompiler;
        let mut ctx = CompileContext::new(Dialect::SQLite);
        let stmt = c.compile_has_column(&mut ctx, "users", "email");
        assert_eq!(
            stmt.sql,
            "SELECT 1 FROM pragma_table_info(?) WHERE name = ?"
        );
    }
}
