// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Unified SQL Query - Intermediate Representation
//!
//! This crate provides the dialect-neutral Intermediate Representation (IR) for
//! SQL statements. The IR is designed to:
//! - Be dialect-agnostic (PostgreSQL, MySQL, SQLite, SQL Server)
//! - Be built once by a builder layer and consumed once by a compiler
//! - Carry parameter values separately from SQL text
//! - Describe dialect capabilities as data rather than scattered conditionals

pub mod dialect;
pub mod error;
pub mod schema;
pub mod statement;
pub mod value;

// Re-export commonly used types
pub use dialect::{
    AutoIncrementSyntax, BooleanStyle, Capabilities, Dialect, Feature, LimitStyle,
    PlaceholderStyle, ReturningClause,
};
pub use error::{IrError, IrResult};
pub use schema::{
    AlterTableSpec, ColumnDef, Constraints, DropTableSpec, ForeignKey, IndexDef, LogicalType,
    TableSpec,
};
pub use statement::{
    Assignments, Connective, DeleteSpec, InsertSpec, Join, JoinKind, OrderTerm, Operator,
    Predicate, Row, SelectSpec, SortDirection, Statement, UpdateSpec,
};
pub use value::Value;
