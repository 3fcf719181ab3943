// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Dialect-specific compiler implementations

pub(crate) mod shared;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgresql")]
pub mod postgresql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "mssql")]
pub use mssql::MsSqlCompiler;
#[cfg(feature = "mysql")]
pub use mysql::MySQLCompiler;
#[cfg(feature = "postgresql")]
pub use postgresql::PostgreSQLCompiler;
#[cfg(feature = "sqlite")]
pub use sqlite::SQLiteCompiler;
