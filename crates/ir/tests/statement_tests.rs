// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Unit tests for the statement IR and its JSON form

use unified_sql_query_ir::{
    ColumnDef, Connective, Dialect, Feature, JoinKind, LogicalType, Operator, Predicate, Row,
    SelectSpec, SortDirection, Statement, TableSpec, Value,
};

// =============================================================================
// Builders
// =============================================================================

#[test]
fn test_select_builder() {
    let spec = SelectSpec::new("users")
        .with_columns(["id", "email"])
        .with_where(Predicate::new("active", Operator::Eq, true))
        .with_where(Predicate::or("role", Operator::Eq, "admin"))
        .with_order_by("created_at", SortDirection::Desc)
        .with_limit(10)
        .with_offset(20);

    assert_eq!(spec.table, "users");
    assert_eq!(spec.columns, vec!["id", "email"]);
    assert_eq!(spec.where_clause.len(), 2);
    assert_eq!(spec.where_clause[1].connective, Connective::Or);
    assert_eq!(spec.limit, Some(10));
    assert_eq!(spec.offset, Some(20));
}

#[test]
fn test_select_defaults() {
    let spec = SelectSpec::new("users");
    assert!(spec.columns.is_empty());
    assert!(spec.joins.is_empty());
    assert!(spec.limit.is_none());
    assert!(!spec.distinct);
}

#[test]
fn test_table_builder() {
    let spec = TableSpec::new("users")
        .with_column(ColumnDef::new("id", "integer").auto_increment())
        .with_column(ColumnDef::new("email", "string").with_length(120).not_null())
        .with_primary_key(["id"])
        .with_unique(["email"]);

    assert_eq!(spec.columns.len(), 2);
    assert!(!spec.columns[0].nullable);
    assert_eq!(spec.constraints.primary_key, Some(vec!["id".to_string()]));
    assert_eq!(
        LogicalType::resolve(&spec.columns[1]).unwrap(),
        LogicalType::String { length: 120 }
    );
}

// =============================================================================
// JSON input
// =============================================================================

#[test]
fn test_select_from_json() {
    let json = r#"{
        "kind": "select",
        "table": "users",
        "joins": [{"kind": "right", "table": "orders", "left": "users.id", "right": "orders.user_id"}],
        "where": [
            {"column": "id", "operator": "=", "value": 1},
            {"column": "deleted_at", "operator": "IS", "connective": "OR"}
        ],
        "order_by": [{"column": "id", "direction": "desc"}],
        "limit": 1
    }"#;

    let stmt: Statement = serde_json::from_str(json).unwrap();
    let Statement::Select(spec) = stmt else {
        panic!("Expected select statement");
    };

    assert_eq!(spec.joins[0].kind, JoinKind::Right);
    assert_eq!(spec.joins[0].operator, Operator::Eq);
    assert_eq!(spec.where_clause[0].value, Some(Value::Integer(1)));
    assert_eq!(spec.where_clause[1].connective, Connective::Or);
    assert!(spec.where_clause[1].value.is_none());
    assert_eq!(spec.order_by[0].direction, SortDirection::Desc);
}

#[test]
fn test_insert_from_json_keeps_column_order() {
    let json = r#"{"kind": "insert", "table": "users", "rows": [{"name": "a", "age": 3}]}"#;
    let stmt: Statement = serde_json::from_str(json).unwrap();
    let Statement::Insert(spec) = stmt else {
        panic!("Expected insert statement");
    };

    let expected = Row::new().with("name", "a").with("age", 3);
    assert_eq!(spec.rows, vec![expected]);
}

#[test]
fn test_statement_table() {
    let json = r#"{"kind": "drop_table", "table": "sessions", "if_exists": true}"#;
    let stmt: Statement = serde_json::from_str(json).unwrap();
    assert_eq!(stmt.table(), "sessions");
    assert!(!stmt.is_read());
}

// =============================================================================
// Dialects
// =============================================================================

#[test]
fn test_every_dialect_has_capabilities() {
    for dialect in Dialect::ALL {
        let caps = dialect.capabilities();
        assert_eq!(caps.right_join, dialect.supports(Feature::RightJoin));
        assert_eq!(caps.full_join, dialect.supports(Feature::FullJoin));
    }
}
