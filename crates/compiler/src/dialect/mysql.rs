// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! MySQL compiler
//!
//! MySQL renders `?` placeholders, `AUTO_INCREMENT` columns and inline
//! `INDEX` definitions inside CREATE TABLE. FULL JOIN is not available and is
//! downgraded to LEFT JOIN.

use crate::{CompileContext, CompiledStatement, Compiler};
use unified_sql_query_ir::{Dialect, LogicalType, Value};

/// MySQL IR → SQL compiler
pub struct MySQLCompiler;

impl Compiler for MySQLCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::MySQL
    }

    fn map_type(&self, ty: &LogicalType) -> String {
        match ty {
            LogicalType::Integer => "INT".to_string(),
            LogicalType::BigInteger => "BIGINT".to_string(),
            LogicalType::String { length } => format!("VARCHAR({length})"),
            LogicalType::Text => "TEXT".to_string(),
            LogicalType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            LogicalType::Float => "DOUBLE".to_string(),
            LogicalType::Boolean => "TINYINT(1)".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::DateTime => "DATETIME".to_string(),
            LogicalType::Timestamp => "TIMESTAMP".to_string(),
            LogicalType::Binary => "BLOB".to_string(),
            LogicalType::Json => "JSON".to_string(),
            LogicalType::Uuid => "CHAR(36)".to_string(),
        }
    }

    fn compile_has_table(&self, ctx: &mut CompileContext, table: &str) -> CompiledStatement {
        let table = ctx.bind(&Value::from(table));
        ctx.finish(format!(
            "SELECT 1 FROM information_schema.tables WHERE table_schema = DATABASE() AND table_name = {table}"
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
            "SELECT 1 FROM information_schema.columns WHERE table_schema = DATABASE() AND table_name = {table} AND column_name = {column}"
        ))
    }
}
