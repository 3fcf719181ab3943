// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Support
//!
//! This module defines the supported SQL dialects and the capability table
//! that drives every dialect-specific rendering decision.
//!
//! ## Design
//!
//! Dialects form a closed set. Instead of branching on a dialect tag all over
//! the compiler, each dialect publishes a static [`Capabilities`] record:
//!
//! | Capability              | PostgreSQL | MySQL          | SQLite          | SQL Server   |
//! |-------------------------|------------|----------------|-----------------|--------------|
//! | Placeholder             | `$k`       | `?`            | `?`             | `@pk`        |
//! | Returning clause        | RETURNING  | -              | -               | OUTPUT       |
//! | Auto-increment          | SERIAL     | AUTO_INCREMENT | AUTOINCREMENT   | IDENTITY     |
//! | RIGHT JOIN              | yes        | yes            | no (LEFT)       | yes          |
//! | FULL JOIN               | yes        | no (LEFT)      | no (LEFT)       | yes          |
//! | Inline index            | no         | yes            | no              | no           |
//! | ALTER ADD CONSTRAINT    | yes        | yes            | no              | yes          |
//! | ADD NOT NULL, no default| yes        | yes            | no              | yes          |
//! | Pagination              | LIMIT/OFFSET | LIMIT/OFFSET | LIMIT/OFFSET    | OFFSET/FETCH |
//!
//! The compiler consults this table; a missing capability results in a
//! documented downgrade plus a diagnostic, never a silent rewrite.

use crate::error::IrError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// PostgreSQL (12+)
    PostgreSQL,
    /// MySQL (5.7, 8.0) and MariaDB
    MySQL,
    /// SQLite (3.x)
    SQLite,
    /// Microsoft SQL Server (2012+)
    MsSql,
}

impl Dialect {
    /// All supported dialects, in a stable order
    pub const ALL: [Dialect; 4] = [
        Dialect::PostgreSQL,
        Dialect::MySQL,
        Dialect::SQLite,
        Dialect::MsSql,
    ];

    /// Stable identifier used in fingerprints and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::PostgreSQL => "postgresql",
            Dialect::MySQL => "mysql",
            Dialect::SQLite => "sqlite",
            Dialect::MsSql => "mssql",
        }
    }

    /// The static capability table for this dialect
    pub fn capabilities(&self) -> &'static Capabilities {
        match self {
            Dialect::PostgreSQL => &POSTGRESQL,
            Dialect::MySQL => &MYSQL,
            Dialect::SQLite => &SQLITE,
            Dialect::MsSql => &MSSQL,
        }
    }

    /// Check if this dialect supports a specific feature
    pub fn supports(&self, feature: Feature) -> bool {
        let caps = self.capabilities();
        match feature {
            Feature::RightJoin => caps.right_join,
            Feature::FullJoin => caps.full_join,
            Feature::Returning => caps.returning != ReturningClause::None,
            Feature::InlineIndex => caps.inline_index,
            Feature::AlterAddConstraint => caps.alter_add_constraint,
            Feature::AddNotNullWithoutDefault => caps.add_not_null_without_default,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::PostgreSQL => "PostgreSQL",
            Dialect::MySQL => "MySQL",
            Dialect::SQLite => "SQLite",
            Dialect::MsSql => "SQL Server",
        };
        f.write_str(name)
    }
}

impl FromStr for Dialect {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::PostgreSQL),
            "mysql" | "mariadb" => Ok(Dialect::MySQL),
            "sqlite" | "sqlite3" => Ok(Dialect::SQLite),
            "mssql" | "sqlserver" => Ok(Dialect::MsSql),
            _ => Err(IrError::UnsupportedDialect(s.to_string())),
        }
    }
}

/// Features that vary across dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// RIGHT [OUTER] JOIN
    RightJoin,
    /// FULL [OUTER] JOIN
    FullJoin,
    /// A clause returning inserted rows (RETURNING, OUTPUT)
    Returning,
    /// `INDEX name (cols)` inside CREATE TABLE
    InlineIndex,
    /// `ALTER TABLE ... ADD CONSTRAINT`
    AlterAddConstraint,
    /// `ADD COLUMN ... NOT NULL` without a DEFAULT
    AddNotNullWithoutDefault,
}

/// How parameter placeholders are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceholderStyle {
    /// `?` for every parameter
    Positional,
    /// `$1`, `$2`, ... numbered per statement
    Indexed,
    /// A named token per parameter, e.g. `@p1`
    Named { prefix: char },
}

/// Clause used to return inserted rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturningClause {
    /// No such clause; the execution layer reports the last inserted id
    None,
    /// Trailing `RETURNING *`
    Returning,
    /// `OUTPUT INSERTED.*` before `VALUES`
    Output,
}

/// Syntax for auto-incrementing primary keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoIncrementSyntax {
    /// `SERIAL` / `BIGSERIAL` column types
    Serial,
    /// `AUTO_INCREMENT` column attribute
    AutoIncrement,
    /// `INTEGER PRIMARY KEY AUTOINCREMENT`
    IntegerPrimaryKeyAutoincrement,
    /// `IDENTITY(1,1)` column attribute
    Identity,
}

/// Pagination syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitStyle {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetch,
}

/// How boolean literals are written in DEFAULT clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanStyle {
    /// `TRUE` / `FALSE`
    Keyword,
    /// `1` / `0`
    Numeric,
}

/// Per-dialect capability table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub placeholder: PlaceholderStyle,
    pub returning: ReturningClause,
    pub auto_increment: AutoIncrementSyntax,
    pub right_join: bool,
    pub full_join: bool,
    pub inline_index: bool,
    pub alter_add_constraint: bool,
    pub add_not_null_without_default: bool,
    pub limit_style: LimitStyle,
    pub boolean_style: BooleanStyle,
}

const POSTGRESQL: Capabilities = Capabilities {
    placeholder: PlaceholderStyle::Indexed,
    returning: ReturningClause::Returning,
    auto_increment: AutoIncrementSyntax::Serial,
    right_join: true,
    full_join: true,
    inline_index: false,
    alter_add_constraint: true,
    add_not_null_without_default: true,
    limit_style: LimitStyle::LimitOffset,
    boolean_style: BooleanStyle::Keyword,
};

const MYSQL: Capabilities = Capabilities {
    placeholder: PlaceholderStyle::Positional,
    returning: ReturningClause::None,
    auto_increment: AutoIncrementSyntax::AutoIncrement,
    right_join: true,
    full_join: false,
    inline_index: true,
    alter_add_constraint: true,
    add_not_null_without_default: true,
    limit_style: LimitStyle::LimitOffset,
    boolean_style: BooleanStyle::Keyword,
};

const SQLITE: Capabilities = Capabilities {
    placeholder: PlaceholderStyle::Positional,
    returning: ReturningClause::None,
    auto_increment: AutoIncrementSyntax::IntegerPrimaryKeyAutoincrement,
    right_join: false,
    full_join: false,
    inline_index: false,
    alter_add_constraint: false,
    add_not_null_without_default: false,
    limit_style: LimitStyle::LimitOffset,
    boolean_style: BooleanStyle::Numeric,
};

const MSSQL: Capabilities = Capabilities {
    placeholder: PlaceholderStyle::Named { prefix: '@' },
    returning: ReturningClause::Output,
    auto_increment: AutoIncrementSyntax::Identity,
    right_join: true,
    full_join: true,
    inline_index: false,
    alter_add_constraint: true,
    add_not_null_without_default: true,
    limit_style: LimitStyle::OffsetFetch,
    boolean_style: BooleanStyle::Numeric,
};
