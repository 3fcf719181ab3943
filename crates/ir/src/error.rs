// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Error types for IR construction and interpretation

use serde::Serialize;
use thiserror::Error;

/// Result type alias for IR operations
pub type IrResult<T> = Result<T, IrError>;

/// Errors raised while interpreting IR values supplied by a builder
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum IrError {
    /// The dialect name does not match any supported database
    #[error("Unsupported dialect: '{0}'")]
    UnsupportedDialect(String),

    /// A column definition names a logical type with no mapping
    #[error("Unknown column type '{type_name}' for column '{column}'")]
    UnknownType { column: String, type_name: String },
}
