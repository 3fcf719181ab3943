// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Compiled statement

use crate::error::Diagnostic;
use serde::Serialize;
use unified_sql_query_ir::Value;

/// SQL text and its ordered parameters
///
/// `params[i]` belongs to the i-th placeholder in `sql`. For named
/// placeholder dialects `named_params[i]` is that placeholder's name (without
/// the prefix); otherwise `named_params` is empty. DDL statements never carry
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    pub sql: String,
    pub params: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub named_params: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledStatement {
    /// A statement with no parameters
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            named_params: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// A statement with positional parameters
    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            params,
            ..Self::raw(sql)
        }
    }

    /// Name/value pairs to register on a named-parameter execution request
    pub fn named(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.named_params
            .iter()
            .map(String::as_str)
            .zip(self.params.iter())
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
