// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Executor trait for statement execution
//!
//! The executor is the boundary to the database driver. Connections, pools
//! and transactions live behind it; this crate only needs "run this compiled
//! statement and give me rows".

use crate::store::Cacheable;
use serde::{Deserialize, Serialize};
use unified_sql_query_compiler::{CompileError, CompiledStatement};

/// Result type alias for execution
pub type ExecuteResult<T> = Result<T, ExecuteError>;

/// Rows and counters returned by a statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// One JSON object per row, keyed by column name
    #[serde(default)]
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,

    #[serde(default)]
    pub rows_affected: u64,

    /// Driver-reported id for dialects without a returning clause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<i64>,
}

impl QueryResult {
    pub fn from_rows(rows: Vec<serde_json::Map<String, serde_json::Value>>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }

    pub fn with_last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

// An empty row set is still a valid answer and is cached
impl Cacheable for QueryResult {
    fn is_cacheable(&self) -> bool {
        true
    }
}

/// Execution collaborator
///
/// # Examples
///
/// ```rust,ignore
/// use unified_sql_query_cache::{Executor, ExecuteResult, QueryResult};
///
/// struct Noop;
///
/// #[async_trait::async_trait]
/// impl Executor for Noop {
///     async fn execute(&self, _: &CompiledStatement) -> ExecuteResult<QueryResult> {
///         Ok(QueryResult::default())
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Executor: Send + Sync {
    /// Run one compiled statement
    ///
    /// # Errors
    ///
    /// Returns `ExecuteError::Connection` when the database is unreachable and
    /// `ExecuteError::Query` when the database rejects the statement.
    async fn execute(&self, statement: &CompiledStatement) -> ExecuteResult<QueryResult>;
}

/// Execution errors
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ExecuteError {
    /// The statement could not be compiled
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Database connection failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The database rejected the statement
    #[error("Query failed: {0}")]
    Query(String),
}
