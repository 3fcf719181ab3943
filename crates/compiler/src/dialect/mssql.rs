// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SQL Server compiler
//!
//! SQL Server differs from the other dialects in a few places:
//! - Named placeholders `@p1`, `@p2`, ... with names recorded on the result
//! - `OUTPUT INSERTED.*` between the column list and `VALUES`
//! - `OFFSET m ROWS FETCH NEXT n ROWS ONLY` pagination, which requires an
//!   ORDER BY (`ORDER BY (SELECT NULL)` is written when none is given)
//! - `ALTER TABLE ... ADD` without the COLUMN keyword
//! - No `CREATE TABLE IF NOT EXISTS`; an `OBJECT_ID` guard is written instead,
//!   and a `sys.indexes` guard for the table's indexes

use crate::dialect::shared;
use crate::{CompileContext, CompiledStatement, Compiler};
use unified_sql_query_ir::{Dialect, IndexDef, LogicalType, TableSpec, Value};

/// SQL Server IR → SQL compiler
pub struct MsSqlCompiler;

impl Compiler for MsSqlCompiler {
    fn dialect(&self) -> Dialect {
        Dialect::MsSql
    }

    fn map_type(&self, ty: &LogicalType) -> String {
        match ty {
            LogicalType::Integer => "INT".to_string(),
            LogicalType::BigInteger => "BIGINT".to_string(),
            LogicalType::String { length } => format!("NVARCHAR({length})"),
            LogicalType::Text | LogicalType::Json => "NVARCHAR(MAX)".to_string(),
            LogicalType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
            LogicalType::Float => "FLOAT".to_string(),
            LogicalType::Boolean => "BIT".to_string(),
            LogicalType::Date => "DATE".to_string(),
            LogicalType::DateTime => "DATETIME2".to_string(),
            LogicalType::Timestamp => "DATETIMEOFFSET".to_string(),
            LogicalType::Binary => "VARBINARY(MAX)".to_string(),
            LogicalType::Uuid => "UNIQUEIDENTIFIER".to_string(),
        }
    }

    fn render_literal(&self, value: &Value) -> String {
        match value {
            Value::Bytes(bytes) => format!("0x{}", hex::encode_upper(bytes)),
            other => shared::render_literal(other, self.capabilities()),
        }
    }

    fn add_column_clause(&self) -> &'static str {
        "ADD"
    }

    fn create_table_head(&self, spec: &TableSpec) -> String {
        if spec.if_not_exists {
            format!(
                "IF OBJECT_ID(N'{}', N'U') IS NULL CREATE TABLE {}",
                spec.name.replace('\'', "''"),
                spec.name
            )
        } else {
            format!("CREATE TABLE {}", spec.name)
        }
    }

    fn create_index(&self, table: &str, index: &IndexDef, if_not_exists: bool) -> String {
        let statement = shared::create_index(table, index, false);
        if if_not_exists {
            format!(
                "IF NOT EXISTS (SELECT 1 FROM sys.indexes WHERE name = N'{}' AND object_id = OBJECT_ID(N'{}')) {}",
                index.name_for(table).replace('\'', "''"),
                table.replace('\'', "''"),
                statement
            )
        } else {
            statement
        }
    }

    fn compile_has_table(&self, ctx: &mut CompileContext, table: &str) -> CompiledStatement {
        let table = ctx.bind(&Value::from(table));
        ctx.finish(format!(
            "SELECT 1 FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = {table}"
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
            "SELECT 1 FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_NAME = {table} AND COLUMN_NAME = {column}"
        ))
    }
}
