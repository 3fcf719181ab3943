// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Cache middleware at the statement-execution boundary
//!
//! - Reads: look up the fingerprint; on a hit execution is skipped, on a miss
//!   the result is stored under the tables extracted from the SQL text.
//! - Writes: executed first; on success every entry registered under the
//!   tables extracted from the write's own text is invalidated.
//! - Errors from the executor propagate unchanged and never touch the cache.
//!
//! The lock is never held across the `await`, so two concurrent misses on
//! the same fingerprint both execute and the last one to finish wins. A miss
//! whose tables are invalidated while it executes does not store its result.

use crate::config::{CacheConfig, ConfigError};
use crate::executor::{ExecuteResult, Executor, QueryResult};
use crate::extract::{StatementKind, extract_tables};
use crate::fingerprint::Fingerprint;
use crate::store::QueryCache;
use std::sync::Arc;
use tracing::{debug, instrument};
use unified_sql_query_compiler::{CompileContext, CompiledStatement, compiler_for};
use unified_sql_query_ir::{Dialect, Statement};

/// Executor wrapper that serves reads from a [`QueryCache`]
pub struct CachedExecutor<E> {
    inner: E,
    dialect: Dialect,
    cache: Arc<QueryCache<QueryResult>>,
}

impl<E: Executor> CachedExecutor<E> {
    /// Wrap an executor with a shared cache
    pub fn new(inner: E, dialect: Dialect, cache: Arc<QueryCache<QueryResult>>) -> Self {
        Self {
            inner,
            dialect,
            cache,
        }
    }

    /// Wrap an executor with a fresh cache built from `config`
    pub fn with_config(inner: E, dialect: Dialect, config: CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(inner, dialect, Arc::new(QueryCache::new(config)?)))
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn cache(&self) -> &Arc<QueryCache<QueryResult>> {
        &self.cache
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    fn enabled(&self) -> bool {
        self.cache.config().enabled
    }

    /// Execute a compiled statement, classifying it from its SQL text
    #[instrument(skip_all, fields(dialect = %self.dialect))]
    pub async fn execute(&self, statement: &CompiledStatement) -> ExecuteResult<QueryResult> {
        match StatementKind::classify(&statement.sql) {
            StatementKind::Read => self.execute_read(statement).await,
            StatementKind::Write => self.execute_write(statement).await,
        }
    }

    /// Compile a statement and execute every resulting SQL statement in order
    ///
    /// Returns one result per compiled statement.
    #[instrument(skip_all, fields(dialect = %self.dialect, table = statement.table()))]
    pub async fn run(&self, statement: &Statement) -> ExecuteResult<Vec<QueryResult>> {
        let compiled = compiler_for(self.dialect)?.compile(statement)?;

        let mut results = Vec::with_capacity(compiled.len());
        for stmt in &compiled {
            let result = if statement.is_read() {
                self.execute_read(stmt).await?
            } else {
                self.execute_write(stmt).await?
            };
            results.push(result);
        }

        Ok(results)
    }

    /// Check whether a table exists; never cached
    #[instrument(skip_all, fields(dialect = %self.dialect))]
    pub async fn has_table(&self, table: &str) -> ExecuteResult<bool> {
        let mut ctx = CompileContext::new(self.dialect);
        let statement = compiler_for(self.dialect)?.compile_has_table(&mut ctx, table);
        let result = self.inner.execute(&statement).await?;
        Ok(!result.rows.is_empty())
    }

    /// Check whether a column exists; never cached
    #[instrument(skip_all, fields(dialect = %self.dialect))]
    pub async fn has_column(&self, table: &str, column: &str) -> ExecuteResult<bool> {
        let mut ctx = CompileContext::new(self.dialect);
        let statement = compiler_for(self.dialect)?.compile_has_column(&mut ctx, table, column);
        let result = self.inner.execute(&statement).await?;
        Ok(!result.rows.is_empty())
    }

    async fn execute_read(&self, statement: &CompiledStatement) -> ExecuteResult<QueryResult> {
        if !self.enabled() {
            return self.inner.execute(statement).await;
        }

        let fingerprint = Fingerprint::of(self.dialect, statement);
        if let Some(hit) = self.cache.get(&fingerprint) {
            return Ok(hit);
        }

        let tables = extract_tables(&statement.sql);
        let generation = self.cache.generation(&tables);

        let result = self.inner.execute(statement).await?;
        self.cache
            .put_if_unchanged(fingerprint, result.clone(), &tables, generation);

        Ok(result)
    }

    async fn execute_write(&self, statement: &CompiledStatement) -> ExecuteResult<QueryResult> {
        let result = self.inner.execute(statement).await?;

        if self.enabled() {
            let tables = extract_tables(&statement.sql);
            let removed = self.cache.invalidate(&tables);
            debug!(?tables, removed, "write invalidated cached reads");
        }

        Ok(result)
    }
}
