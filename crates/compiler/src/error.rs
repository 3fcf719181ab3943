// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error and diagnostic types for the compiler
//!
//! Two outcomes are kept strictly apart:
//!
//! - [`CompileError`]: malformed input. Compilation aborts before any SQL is
//!   produced and the error reaches the caller unchanged.
//! - [`Diagnostic`]: a capability downgrade. Compilation continues with a
//!   documented fallback and the diagnostic travels next to the SQL.

use serde::Serialize;
use unified_sql_query_ir::{IrError, JoinKind};

/// Result type alias for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that abort compilation
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum CompileError {
    /// INSERT without rows, or whose first row has no columns
    #[error("INSERT into '{table}' has no rows or no columns")]
    EmptyInsert { table: String },

    /// A later INSERT row does not have the first row's column set
    #[error("INSERT into '{table}': row {row} does not match the columns of the first row ({expected})")]
    RowShapeMismatch {
        table: String,
        row: usize,
        expected: String,
    },

    /// UPDATE without assignments
    #[error("UPDATE of '{table}' has no columns to set")]
    EmptyUpdate { table: String },

    /// IS / IS NOT compared against something other than NULL
    #[error("Predicate on '{column}': {operator} only accepts NULL")]
    InvalidPredicate { column: String, operator: String },

    /// CREATE TABLE without columns
    #[error("CREATE TABLE '{table}' has no columns")]
    EmptyTable { table: String },

    /// The dialect is known but its compiler was disabled at build time
    #[error("No compiler available for dialect {0}")]
    UnsupportedDialect(String),

    /// Invalid IR (unknown logical type, unknown dialect name)
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Informational note (e.g., an ignored clause)
    Info,
    /// The rendered SQL may behave differently from the IR
    Warning,
}

/// What the compiler substituted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An unsupported join kind was rendered as another kind
    JoinDowngraded { from: JoinKind, to: JoinKind },

    /// An added NOT NULL column without a default was made nullable
    NullabilityDowngraded { column: String },

    /// A constraint could not be expressed and was left out
    ConstraintSkipped { constraint: String },

    /// An auto-increment attribute could not be expressed and was left out
    AutoIncrementDropped { column: String },

    /// OFFSET without LIMIT is not rendered
    OffsetIgnored,
}

/// Non-fatal note about a capability downgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Info,
            message: message.into(),
        }
    }
}
