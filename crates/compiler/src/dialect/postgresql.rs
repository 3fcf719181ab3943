// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! PostgreSQL compiler
//!
//! - `$1`, `$2`, ... placeholders, numbered per statement
//! - `RETURNING *` on INSERT
//! - `SERIAL` / `BIGSERIAL` for auto-increment columns
//! - `JSONB` for JSON columns

use crate::dialect::shared;
use crate::{CompileContext, CompiledStatement, Compiler};
use unified_sql_query_ir::{Dialect, LogicalType, Value};

/// PostgreSQL IR → SQL compiler
pub struct PostgreSQLCompiler;

impl Compiler for PostgreSQLCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn map_type(&self, ty: &LogicalType) -> String {
        match ty {
            LogicalType::Integer => "INTEGER".to_string(),
            LogicalType::BigInteger => "BIGINT".to_string(),
            LogicalType::String { length } => format!("VARCHAR({length})"),
            LogicalType::Text => "TEXT".to_string(),
            LogicalType::Decimal { precision, scale } => format!("NUMERIC({precision},{scale})"),
            LogicalType::Float => "DOUBLE PRECISION".to_string(),
            LogicalType::Boolean => "BOOLEAN".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::DateTime => "TIMESTAMP".to_string(),
            LogicalType::Timestamp => "TIMESTAMPTZ".to_string(),
            LogicalType::Binary => "BYTEA".to_string(),
            LogicalType::Json => "JSONB".to_string(),
            LogicalType::Uuid => "UUID".to_string(),
        }
    }

    fn render_literal(&self, value: &Value) -> String {
        match value {
            Value::Bytes(bytes) => format!("'\\x{}'::bytea", hex::encode(bytes)),
            other => shared::render_literal(other, self.capabilities()),
        }
    }

    fn compile_has_table(&self, ctx: &mut CompileContext, table: &str) -> CompiledStatement {
        let table = ctx.bind(&Value::from(table));
        ctx.finish(format!(
            "SELECT 1 FROM information_schema.tables WHERE table_schema = current_schema() AND table_name = {table}"
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
            "SELECT 1 FROM information_schema.columns WHERE table_schema = current_schema() AND table_name = {table} AND column_name = {column}"
        ))
    }
}
