// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement Representation
//!
//! This module represents DML statements in the IR.
//!
//! ## Design
//!
//! Each statement kind has its own spec struct. Specs are plain data: a
//! builder fills them in, a compiler reads them exactly once, and nothing
//! mutates them after compilation starts.
//!
//! - [`SelectSpec`]: projection, joins, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT/OFFSET
//! - [`InsertSpec`]: one or more [`Row`]s sharing the first row's column set
//! - [`UpdateSpec`]: ordered [`Assignments`] plus WHERE predicates
//! - [`DeleteSpec`]: WHERE predicates only
//!
//! ## Predicates
//!
//! WHERE and HAVING are flat, ordered [`Predicate`] lists. The connective of
//! the first predicate is never rendered; every later predicate is prefixed
//! by its own connective:
//!
//! ```sql
//! WHERE status = ? AND age >= ? OR is_admin = ?
//! ```
//!
//! A predicate whose `value` is `None` renders the literal `NULL` instead of a
//! placeholder, which is how `deleted_at IS NULL` is expressed.
//!
//! ## Example
//!
//! ```rust
//! use unified_sql_query_ir::{Operator, Predicate, SelectSpec};
//!
//! let spec = SelectSpec::new("users")
//!     .with_columns(["id", "name"])
//!     .with_where(Predicate::new("id", Operator::Eq, 1))
//!     .with_limit(1);
//!
//! assert_eq!(spec.where_clause.len(), 1);
//! ```

use crate::schema::{AlterTableSpec, DropTableSpec, TableSpec};
use crate::value::Value;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Any statement the compiler understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Select(SelectSpec),
    Insert(InsertSpec),
    Update(UpdateSpec),
    Delete(DeleteSpec),
    CreateTable(TableSpec),
    AlterTable(AlterTableSpec),
    DropTable(DropTableSpec),
}

impl Statement {
    /// Only SELECT statements are reads; everything else modifies data or schema
    pub fn is_read(&self) -> bool {
        matches!(self, Statement::Select(_))
    }

    /// The primary table this statement targets
    pub fn table(&self) -> &str {
        match self {
            Statement::Select(s) => &s.table,
            Statement::Insert(s) => &s.table,
            Statement::Update(s) => &s.table,
            Statement::Delete(s) => &s.table,
            Statement::CreateTable(s) => &s.name,
            Statement::AlterTable(s) => &s.table,
            Statement::DropTable(s) => &s.table,
        }
    }
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectSpec {
    /// Table in the FROM clause
    pub table: String,

    /// Projection list; empty renders as `*`
    #[serde(default)]
    pub columns: Vec<String>,

    /// SELECT DISTINCT
    #[serde(default)]
    pub distinct: bool,

    #[serde(default)]
    pub joins: Vec<Join>,

    #[serde(default, rename = "where")]
    pub where_clause: Vec<Predicate>,

    #[serde(default)]
    pub group_by: Vec<String>,

    #[serde(default)]
    pub having: Vec<Predicate>,

    #[serde(default)]
    pub order_by: Vec<OrderTerm>,

    #[serde(default)]
    pub limit: Option<u64>,

    /// Only rendered when `limit` is set
    #[serde(default)]
    pub offset: Option<u64>,
}

impl SelectSpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            distinct: false,
            joins: Vec::new(),
            where_clause: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn with_where(mut self, predicate: Predicate) -> Self {
        self.where_clause.push(predicate);
        self
    }

    pub fn with_group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_having(mut self, predicate: Predicate) -> Self {
        self.having.push(predicate);
        self
    }

    pub fn with_order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(OrderTerm {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// JOIN clause
///
/// Renders as `<kind> JOIN <table> ON <left> <operator> <right>`. Both sides
/// of the ON condition are column expressions, never parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub left: String,
    #[serde(default = "Operator::default_join")]
    pub operator: Operator,
    pub right: String,
}

impl Join {
    pub fn new(
        kind: JoinKind,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            table: table.into(),
            left: left.into(),
            operator: Operator::Eq,
            right: right.into(),
        }
    }
}

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
        }
    }
}

/// Boolean operator placed before a predicate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// Comparison operators allowed in predicates and join conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>", alias = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "LIKE", alias = "like")]
    Like,
    #[serde(rename = "NOT LIKE", alias = "not like")]
    NotLike,
    #[serde(rename = "IS", alias = "is")]
    Is,
    #[serde(rename = "IS NOT", alias = "is not")]
    IsNot,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
        }
    }

    fn default_join() -> Self {
        Operator::Eq
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One condition in a WHERE or HAVING list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,

    /// `None` renders the literal `NULL` instead of a placeholder
    #[serde(default)]
    pub value: Option<Value>,

    /// Ignored for the first predicate in a list
    #[serde(default)]
    pub connective: Connective,
}

impl Predicate {
    /// A predicate joined with AND
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: Some(value.into()),
            connective: Connective::And,
        }
    }

    /// A predicate joined with OR
    pub fn or(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            connective: Connective::Or,
            ..Self::new(column, operator, value)
        }
    }

    /// `<column> IS NULL`
    pub fn is_null(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator: Operator::Is,
            value: None,
            connective: Connective::And,
        }
    }

    /// `<column> IS NOT NULL`
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self {
            operator: Operator::IsNot,
            ..Self::is_null(column)
        }
    }

    pub fn with_connective(mut self, connective: Connective) -> Self {
        self.connective = connective;
        self
    }
}

/// ORDER BY item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTerm {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Ordered column → value mapping
///
/// Insertion order is preserved, including through JSON (de)serialization,
/// because it decides both the column list and the parameter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

/// SET clause of an UPDATE
pub type Assignments = Row;

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a column, replacing an existing value in place
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C, V> FromIterator<(C, V)> for Row
where
    C: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (C, V)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, value) in &self.entries {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
                let mut row = Row::new();
                while let Some((column, value)) = access.next_entry::<String, Value>()? {
                    row.set(column, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// INSERT statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertSpec {
    pub table: String,

    /// Must be non-empty; the first row's columns define the column list
    pub rows: Vec<Row>,
}

impl InsertSpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }
}

/// UPDATE statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSpec {
    pub table: String,

    /// Must be non-empty
    pub set: Assignments,

    #[serde(default, rename = "where")]
    pub where_clause: Vec<Predicate>,
}

impl UpdateSpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            set: Row::new(),
            where_clause: Vec::new(),
        }
    }

    pub fn with_set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.set(column, value);
        self
    }

    pub fn with_where(mut self, predicate: Predicate) -> Self {
        self.where_clause.push(predicate);
        self
    }
}

/// DELETE statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSpec {
    pub table: String,

    #[serde(default, rename = "where")]
    pub where_clause: Vec<Predicate>,
}

impl DeleteSpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: Vec::new(),
        }
    }

    pub fn with_where(mut self, predicate: Predicate) -> Self {
        self.where_clause.push(predicate);
        self
    }
}
