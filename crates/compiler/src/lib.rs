// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Unified SQL Query - Compiler
//!
//! This crate turns dialect-neutral statement IR into dialect-specific SQL
//! text plus an ordered parameter list.
//!
//! ## Overview
//!
//! ```text
//! Builder → IR (SelectSpec, InsertSpec, ...) → Compiler → (sql, params) → Executor
//! ```
//!
//! The compiler is responsible for:
//! - Rendering every clause in a fixed order, binding parameters as it goes
//! - Writing the dialect's placeholder syntax (`?`, `$k`, `@pk`)
//! - Downgrading unsupported constructs (RIGHT/FULL JOIN, ALTER restrictions)
//!   and reporting each downgrade as a [`Diagnostic`]
//! - Rejecting malformed input before any SQL is produced
//!
//! ## Parameter Order
//!
//! Parameters are appended strictly in rendering order:
//!
//! - SELECT: WHERE predicates, HAVING predicates, then LIMIT and OFFSET
//!   (SQL Server writes `OFFSET ... FETCH NEXT ...`, so its offset comes first)
//! - INSERT: column values row by row, in the first row's column order
//! - UPDATE: SET values in assignment order, then WHERE predicates
//! - DELETE: WHERE predicates
//!
//! DDL statements never carry parameters.
//!
//! ## Usage
//!
//! ```rust
//! use unified_sql_query_compiler::compiler_for;
//! use unified_sql_query_ir::{Dialect, Operator, Predicate, SelectSpec, Statement};
//!
//! let spec = SelectSpec::new("users")
//!     .with_where(Predicate::new("id", Operator::Eq, 1))
//!     .with_limit(1);
//!
//! let compiler = compiler_for(Dialect::MySQL).unwrap();
//! let compiled = compiler.compile(&Statement::Select(spec)).unwrap();
//!
//! assert_eq!(compiled[0].sql, "SELECT * FROM users WHERE id = ? LIMIT ?");
//! assert_eq!(compiled[0].params.len(), 2);
//! ```

pub mod context;
pub mod dialect;
pub mod error;
pub mod output;

pub use context::CompileContext;
pub use error::{CompileError, CompileResult, Diagnostic, DiagnosticKind, Severity};
pub use output::CompiledStatement;

use dialect::shared;
use unified_sql_query_ir::{
    AlterTableSpec, Capabilities, DeleteSpec, Dialect, DropTableSpec, IndexDef, InsertSpec,
    JoinKind, LogicalType, SelectSpec, Statement, TableSpec, UpdateSpec, Value,
};

/// Core trait for compiling IR to SQL
///
/// One implementation exists per supported dialect. The rendering algorithm is
/// shared through the provided methods and driven by the dialect's
/// [`Capabilities`]; implementations supply the type table and introspection
/// queries and override a provided method only where their syntax genuinely
/// differs.
///
/// # Error Handling
///
/// - **Malformed input** (empty INSERT, empty UPDATE, unknown type): return
///   `Err(CompileError)` before rendering anything
/// - **Unsupported construct**: render the documented fallback and record a
///   diagnostic with `ctx.diagnose()`
pub trait Compiler: Send + Sync {
    /// Get the dialect this compiler targets
    fn dialect(&self) -> Dialect;

    /// Map a logical column type to the dialect's native type
    fn map_type(&self, ty: &LogicalType) -> String;

    /// Query returning at least one row when `table` exists
    fn compile_has_table(&self, ctx: &mut CompileContext, table: &str) -> CompiledStatement;

    /// Query returning at least one row when `table.column` exists
    fn compile_has_column(
        &self,
        ctx: &mut CompileContext,
        table: &str,
        column: &str,
    ) -> CompiledStatement;

    /// The capability table for this dialect
    fn capabilities(&self) -> &'static Capabilities {
        self.dialect().capabilities()
    }

    /// Render a value inline (DEFAULT clauses only; DML always binds)
    fn render_literal(&self, value: &Value) -> String {
        shared::render_literal(value, self.capabilities())
    }

    /// Keyword(s) introducing a new column in ALTER TABLE
    fn add_column_clause(&self) -> &'static str {
        "ADD COLUMN"
    }

    /// `CREATE TABLE [IF NOT EXISTS] <name>`
    fn create_table_head(&self, spec: &TableSpec) -> String {
        if spec.if_not_exists {
            format!("CREATE TABLE IF NOT EXISTS {}", spec.name)
        } else {
            format!("CREATE TABLE {}", spec.name)
        }
    }

    /// `CREATE INDEX [IF NOT EXISTS] <name> ON <table> (<columns>)`
    fn create_index(&self, table: &str, index: &IndexDef, if_not_exists: bool) -> String {
        shared::create_index(table, index, if_not_exists)
    }

    /// Join kind to render, downgrading unsupported kinds to LEFT JOIN
    fn resolve_join_kind(&self, ctx: &mut CompileContext, kind: JoinKind) -> JoinKind {
        shared::resolve_join_kind(ctx, self.capabilities(), kind)
    }

    fn compile_select(
        &self,
        ctx: &mut CompileContext,
        spec: &SelectSpec,
    ) -> CompileResult<CompiledStatement> {
        shared::compile_select(self, ctx, spec)
    }

    fn compile_insert(
        &self,
        ctx: &mut CompileContext,
        spec: &InsertSpec,
    ) -> CompileResult<CompiledStatement> {
        shared::compile_insert(self, ctx, spec)
    }

    fn compile_update(
        &self,
        ctx: &mut CompileContext,
        spec: &UpdateSpec,
    ) -> CompileResult<CompiledStatement> {
        shared::compile_update(ctx, spec)
    }

    fn compile_delete(
        &self,
        ctx: &mut CompileContext,
        spec: &DeleteSpec,
    ) -> CompileResult<CompiledStatement> {
        shared::compile_delete(ctx, spec)
    }

    /// CREATE TABLE followed by any post-statements (e.g. CREATE INDEX)
    fn compile_create_table(
        &self,
        ctx: &mut CompileContext,
        spec: &TableSpec,
    ) -> CompileResult<Vec<CompiledStatement>> {
        shared::compile_create_table(self, ctx, spec)
    }

    /// One statement per added column, then one per added constraint or index
    fn compile_alter_table(
        &self,
        ctx: &mut CompileContext,
        spec: &AlterTableSpec,
    ) -> CompileResult<Vec<CompiledStatement>> {
        shared::compile_alter_table(self, ctx, spec)
    }

    fn compile_drop_table(
        &self,
        ctx: &mut CompileContext,
        spec: &DropTableSpec,
    ) -> CompiledStatement {
        let sql = if spec.if_exists {
            format!("DROP TABLE IF EXISTS {}", spec.table)
        } else {
            format!("DROP TABLE {}", spec.table)
        };
        ctx.finish(sql)
    }

    /// Compile any statement with a fresh context
    ///
    /// Diagnostics not attached to a statement by the time compilation ends
    /// are appended to the last statement produced.
    fn compile(&self, statement: &Statement) -> CompileResult<Vec<CompiledStatement>> {
        let mut ctx = CompileContext::new(self.dialect());
        let mut compiled = match statement {
            Statement::Select(spec) => vec![self.compile_select(&mut ctx, spec)?],
            Statement::Insert(spec) => vec![self.compile_insert(&mut ctx, spec)?],
            Statement::Update(spec) => vec![self.compile_update(&mut ctx, spec)?],
            Statement::Delete(spec) => vec![self.compile_delete(&mut ctx, spec)?],
            Statement::CreateTable(spec) => self.compile_create_table(&mut ctx, spec)?,
            Statement::AlterTable(spec) => self.compile_alter_table(&mut ctx, spec)?,
            Statement::DropTable(spec) => vec![self.compile_drop_table(&mut ctx, spec)],
        };

        if ctx.has_diagnostics()
            && let Some(last) = compiled.last_mut()
        {
            last.diagnostics.extend(ctx.take_diagnostics());
        }

        Ok(compiled)
    }
}

/// Get the compiler for a dialect
///
/// Fails with [`CompileError::UnsupportedDialect`] when the dialect's cargo
/// feature is disabled.
pub fn compiler_for(dialect: Dialect) -> CompileResult<&'static dyn Compiler> {
    match dialect {
        #[cfg(feature = "postgresql")]
        Dialect::PostgreSQL => Ok(&dialect::PostgreSQLCompiler),
        #[cfg(feature = "mysql")]
        Dialect::MySQL => Ok(&dialect::MySQLCompiler),
        #[cfg(feature = "sqlite")]
        Dialect::SQLite => Ok(&dialect::SQLiteCompiler),
        #[cfg(feature = "mssql")]
        Dialect::MsSql => Ok(&dialect::MsSqlCompiler),
        #[allow(unreachable_patterns)]
        other => Err(CompileError::UnsupportedDialect(other.to_string())),
    }
}

/// Compile a statement for a dialect
pub fn compile(dialect: Dialect, statement: &Statement) -> CompileResult<Vec<CompiledStatement>> {
    compiler_for(dialect)?.compile(statement)
}
