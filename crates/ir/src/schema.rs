// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema Representation
//!
//! DDL specs: CREATE TABLE ([`TableSpec`]), additive ALTER TABLE
//! ([`AlterTableSpec`]) and DROP TABLE ([`DropTableSpec`]).
//!
//! Column types are given by logical name (`integer`, `string`, `decimal`, ...)
//! and resolved to a [`LogicalType`] when compiled. Parametrized types read
//! their arguments either from the column's `length`/`precision`/`scale`
//! fields or inline from the name, so `string(64)` and
//! `{"type": "string", "length": 64}` are equivalent.

use crate::error::{IrError, IrResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Default VARCHAR length when none is given
pub const DEFAULT_STRING_LENGTH: u32 = 255;
/// Default DECIMAL precision when none is given
pub const DEFAULT_DECIMAL_PRECISION: u32 = 10;
/// Default DECIMAL scale when none is given
pub const DEFAULT_DECIMAL_SCALE: u32 = 2;

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub if_not_exists: bool,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Constraints::default(),
            if_not_exists: false,
        }
    }

    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.primary_key = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints
            .unique
            .push(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.constraints.foreign_keys.push(foreign_key);
        self
    }

    pub fn with_index(mut self, index: IndexDef) -> Self {
        self.constraints.indexes.push(index);
        self
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,

    /// Logical type name, resolved by [`LogicalType::resolve`]
    #[serde(rename = "type")]
    pub logical_type: String,

    #[serde(default = "default_nullable")]
    pub nullable: bool,

    #[serde(default)]
    pub default: Option<Value>,

    #[serde(default)]
    pub length: Option<u32>,

    #[serde(default)]
    pub precision: Option<u32>,

    #[serde(default)]
    pub scale: Option<u32>,

    #[serde(default)]
    pub auto_increment: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, logical_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logical_type: logical_type.into(),
            nullable: true,
            default: None,
            length: None,
            precision: None,
            scale: None,
            auto_increment: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self.nullable = false;
        self
    }
}

/// Table-level constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub primary_key: Option<Vec<String>>,

    /// Each entry is one UNIQUE group
    #[serde(default)]
    pub unique: Vec<Vec<String>>,

    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,

    #[serde(default)]
    pub indexes: Vec<IndexDef>,
}

/// FOREIGN KEY (column) REFERENCES ref_table (ref_column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

impl ForeignKey {
    pub fn new(
        column: impl Into<String>,
        ref_table: impl Into<String>,
        ref_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            ref_table: ref_table.into(),
            ref_column: ref_column.into(),
        }
    }
}

/// Secondary index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    pub columns: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl IndexDef {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Explicit name, or `idx_<table>_<col1>_<col2>...`
    pub fn name_for(&self, table: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("idx_{}_{}", table, self.columns.join("_")),
        }
    }
}

/// ALTER TABLE (additive only): new columns, then new constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTableSpec {
    pub table: String,

    #[serde(default)]
    pub add_columns: Vec<ColumnDef>,

    /// `primary_key` is ignored; tables keep the key they were created with
    #[serde(default)]
    pub add_constraints: Constraints,
}

impl AlterTableSpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            add_columns: Vec::new(),
            add_constraints: Constraints::default(),
        }
    }

    pub fn add_column(mut self, column: ColumnDef) -> Self {
        self.add_columns.push(column);
        self
    }

    pub fn add_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.add_constraints.foreign_keys.push(foreign_key);
        self
    }

    pub fn add_unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_constraints
            .unique
            .push(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn add_index(mut self, index: IndexDef) -> Self {
        self.add_constraints.indexes.push(index);
        self
    }
}

/// DROP TABLE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTableSpec {
    pub table: String,
    #[serde(default)]
    pub if_exists: bool,
}

/// Dialect-neutral column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    Integer,
    BigInteger,
    String { length: u32 },
    Text,
    Decimal { precision: u32, scale: u32 },
    Float,
    Boolean,
    Date,
    DateTime,
    Timestamp,
    Binary,
    Json,
    Uuid,
}

impl LogicalType {
    /// Resolve a column's logical type name and size arguments
    pub fn resolve(column: &ColumnDef) -> IrResult<Self> {
        let unknown = || IrError::UnknownType {
            column: column.name.clone(),
            type_name: column.logical_type.clone(),
        };

        let raw = column.logical_type.trim().to_ascii_lowercase();
        let (name, args) = match raw.split_once('(') {
            Some((name, rest)) => {
                let inner = rest.strip_suffix(')').ok_or_else(unknown)?;
                let args = inner
                    .split(',')
                    .map(|a| a.trim().parse::<u32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| unknown())?;
                (name.trim().to_string(), args)
            }
            None => (raw, Vec::new()),
        };

        let ty = match name.as_str() {
            "integer" | "int" => LogicalType::Integer,
            "bigint" | "biginteger" => LogicalType::BigInteger,
            "string" | "varchar" => LogicalType::String {
                length: args
                    .first()
                    .copied()
                    .or(column.length)
                    .unwrap_or(DEFAULT_STRING_LENGTH),
            },
            "text" => LogicalType::Text,
            "decimal" | "numeric" => LogicalType::Decimal {
                precision: args
                    .first()
                    .copied()
                    .or(column.precision)
                    .unwrap_or(DEFAULT_DECIMAL_PRECISION),
                scale: args
                    .get(1)
                    .copied()
                    .or(column.scale)
                    .unwrap_or(DEFAULT_DECIMAL_SCALE),
            },
            "float" | "double" => LogicalType::Float,
            "boolean" | "bool" => LogicalType::Boolean,
            "date" => LogicalType::Date,
            "datetime" => LogicalType::DateTime,
            "timestamp" => LogicalType::Timestamp,
            "binary" | "blob" => LogicalType::Binary,
            "json" => LogicalType::Json,
            "uuid" => LogicalType::Uuid,
            _ => return Err(unknown()),
        };

        Ok(ty)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, LogicalType::Integer | LogicalType::BigInteger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_plain_types() {
        let col = ColumnDef::new("id", "INTEGER");
        assert_eq!(LogicalType::resolve(&col).unwrap(), LogicalType::Integer);

        let col = ColumnDef::new("payload", "json");
        assert_eq!(LogicalType::resolve(&col).unwrap(), LogicalType::Json);
    }

    #[test]
    fn test_resolve_string_length() {
        let col = ColumnDef::new("name", "string");
        assert_eq!(
            LogicalType::resolve(&col).unwrap(),
            LogicalType::String { length: 255 }
        );

        let col = ColumnDef::new("name", "string").with_length(64);
        assert_eq!(
            LogicalType::resolve(&col).unwrap(),
            LogicalType::String { length: 64 }
        );

        let col = ColumnDef::new("name", "string(32)");
        assert_eq!(
            LogicalType::resolve(&col).unwrap(),
            LogicalType::String { length: 32 }
        );
    }

    #[test]
    fn test_resolve_decimal() {
        let col = ColumnDef::new("price", "decimal(12, 4)");
        assert_eq!(
            LogicalType::resolve(&col).unwrap(),
            LogicalType::Decimal {
                precision: 12,
                scale: 4
            }
        );

        let col = ColumnDef::new("price", "decimal");
        assert_eq!(
            LogicalType::resolve(&col).unwrap(),
            LogicalType::Decimal {
                precision: 10,
                scale: 2
            }
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let col = ColumnDef::new("shape", "geometry");
        let err = LogicalType::resolve(&col).unwrap_err();
        assert_eq!(
            err,
            IrError::UnknownType {
                column: "shape".to_string(),
                type_name: "geometry".to_string()
            }
        );

        let col = ColumnDef::new("name", "string(abc)");
        assert!(LogicalType::resolve(&col).is_err());
    }

    #[test]
    fn test_index_name() {
        let idx = IndexDef::new(["email", "tenant_id"]);
        assert_eq!(idx.name_for("users"), "idx_users_email_tenant_id");
        assert_eq!(idx.named("by_email").name_for("users"), "by_email");
    }
}
