// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Compile context: parameter sink and diagnostic side channel
//!
//! Every parameter enters a statement through [`CompileContext::bind`], which
//! appends the value and returns the placeholder to write at that exact
//! position. Text order and parameter order therefore cannot drift apart.

use crate::error::Diagnostic;
use crate::output::CompiledStatement;
use tracing::{trace, warn};
use unified_sql_query_ir::{Dialect, PlaceholderStyle, Value};

/// State accumulated while compiling one or more statements
pub struct CompileContext {
    /// Target SQL dialect
    dialect: Dialect,

    /// Parameters of the statement being rendered, in placeholder order
    params: Vec<Value>,

    /// Parameter names, parallel to `params` (named placeholder dialects only)
    named_params: Vec<String>,

    /// Diagnostics not yet attached to a statement
    diagnostics: Vec<Diagnostic>,

    /// Diagnostics already handed out with finished statements
    emitted: usize,
}

impl CompileContext {
    /// Create a new compile context
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            params: Vec::new(),
            named_params: Vec::new(),
            diagnostics: Vec::new(),
            emitted: 0,
        }
    }

    /// Get the target dialect
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Append a parameter and return its placeholder text
    ///
    /// - Positional: `?`
    /// - Indexed: `$k`, counting from 1 within the statement
    /// - Named: `<prefix>pk`, registering the name alongside the value
    pub fn bind(&mut self, value: &Value) -> String {
        self.params.push(value.clone());
        let index = self.params.len();

        match self.dialect.capabilities().placeholder {
            PlaceholderStyle::Positional => "?".to_string(),
            PlaceholderStyle::Indexed => format!("${index}"),
            PlaceholderStyle::Named { prefix } => {
                let name = format!("p{index}");
                let token = format!("{prefix}{name}");
                self.named_params.push(name);
                token
            }
        }
    }

    /// Number of parameters bound to the statement being rendered
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Record a capability downgrade
    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        warn!(dialect = %self.dialect, kind = ?diagnostic.kind, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    /// All diagnostics recorded so far, including ones already attached
    pub fn total_diagnostics(&self) -> usize {
        self.emitted + self.diagnostics.len()
    }

    /// Check if any diagnostics are waiting to be attached
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Take diagnostics that no statement has claimed
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.emitted += self.diagnostics.len();
        std::mem::take(&mut self.diagnostics)
    }

    /// Finish the current statement
    ///
    /// Moves the bound parameters and pending diagnostics into the result and
    /// resets the parameter numbering for the next statement.
    pub fn finish(&mut self, sql: String) -> CompiledStatement {
        trace!(dialect = %self.dialect, %sql, params = self.params.len(), "compiled statement");
        self.emitted += self.diagnostics.len();
        CompiledStatement {
            sql,
            params: std::mem::take(&mut self.params),
            named_params: std::mem::take(&mut self.named_params),
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }
}
