// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock executor implementation for testing
//!
//! Records every statement it receives and answers from a table of
//! SQL-prefix → canned result. Statements matching no prefix get an empty
//! result.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use unified_sql_query_cache::{ExecuteError, ExecuteResult, Executor, QueryResult};
use unified_sql_query_compiler::CompiledStatement;

/// In-memory mock executor for testing
#[derive(Default)]
pub struct MockExecutor {
    responses: Vec<(String, QueryResult)>,
    failure: Option<ExecuteError>,
    calls: Mutex<Vec<CompiledStatement>>,
}

impl MockExecutor {
    /// Create a new mock executor with no canned responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer statements whose SQL starts with `prefix`; first match wins
    pub fn respond(mut self, prefix: impl Into<String>, result: QueryResult) -> Self {
        self.responses.push((prefix.into(), result));
        self
    }

    /// Answer statements starting with `prefix` with the given rows
    pub fn respond_rows(self, prefix: impl Into<String>, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect::<Vec<Map<String, Value>>>();
        self.respond(prefix, QueryResult::from_rows(rows))
    }

    /// Fail every statement with `error`
    pub fn failing(mut self, error: ExecuteError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Every statement executed so far, in order
    pub fn calls(&self) -> Vec<CompiledStatement> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// SQL text of every statement executed so far
    pub fn executed_sql(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.sql.clone()).collect()
    }
}

#[async_trait::async_trait]
impl Executor for MockExecutor {
    async fn execute(&self, statement: &CompiledStatement) -> ExecuteResult<QueryResult> {
        self.calls.lock().push(statement.clone());

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| statement.sql.starts_with(prefix.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_default())
    }
}
