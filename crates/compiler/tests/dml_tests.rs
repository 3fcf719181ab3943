// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! DML compilation tests across all dialects

use unified_sql_query_compiler::{
    CompileError, CompiledStatement, DiagnosticKind, Severity, compile, compiler_for,
};
use unified_sql_query_ir::{
    DeleteSpec, Dialect, InsertSpec, Join, JoinKind, Operator, Predicate, Row, SelectSpec,
    SortDirection, Statement, UpdateSpec, Value,
};

fn compile_one(dialect: Dialect, statement: Statement) -> CompiledStatement {
    let mut compiled = compile(dialect, &statement).unwrap();
    assert_eq!(compiled.len(), 1);
    compiled.remove(0)
}

fn count_placeholders(dialect: Dialect, sql: &str) -> usize {
    match dialect {
        Dialect::MySQL | Dialect::SQLite => sql.matches('?').count(),
        Dialect::PostgreSQL => sql.matches('$').count(),
        Dialect::MsSql => sql.matches("@p").count(),
    }
}

// =============================================================================
// SELECT
// =============================================================================

#[test]
fn test_select_where_limit_mysql() {
    let spec = SelectSpec::new("users")
        .with_where(Predicate::new("id", Operator::Eq, 1))
        .with_limit(1);

    let stmt = compile_one(Dialect::MySQL, Statement::Select(spec));
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE id = ? LIMIT ?");
    assert_eq!(stmt.params, vec![Value::Integer(1), Value::Integer(1)]);
    assert!(stmt.diagnostics.is_empty());
}

#[test]
fn test_select_placeholder_styles() {
    let spec = SelectSpec::new("users")
        .with_columns(["id", "name"])
        .with_where(Predicate::new("status", Operator::Eq, "active"))
        .with_where(Predicate::or("age", Operator::GtEq, 18))
        .with_limit(10)
        .with_offset(20);

    let pg = compile_one(Dialect::PostgreSQL, Statement::Select(spec.clone()));
    assert_eq!(
        pg.sql,
        "SELECT id, name FROM users WHERE status = $1 OR age >= $2 LIMIT $3 OFFSET $4"
    );
    assert_eq!(
        pg.params,
        vec![
            Value::from("active"),
            Value::Integer(18),
            Value::Integer(10),
            Value::Integer(20)
        ]
    );

    let mssql = compile_one(Dialect::MsSql, Statement::Select(spec));
    assert_eq!(
        mssql.sql,
        "SELECT id, name FROM users WHERE status = @p1 OR age >= @p2 ORDER BY (SELECT NULL) OFFSET @p3 ROWS FETCH NEXT @p4 ROWS ONLY"
    );
    // offset is written before the limit
    assert_eq!(mssql.params[2], Value::Integer(20));
    assert_eq!(mssql.params[3], Value::Integer(10));
    assert_eq!(mssql.named_params, vec!["p1", "p2", "p3", "p4"]);
}

#[test]
fn test_select_k_predicates_plus_pagination() {
    for dialect in Dialect::ALL {
        for k in 0..5 {
            let mut spec = SelectSpec::new("events").with_limit(5).with_offset(10);
            for i in 0..k {
                spec = spec.with_where(Predicate::new(format!("c{i}"), Operator::Eq, i as i64));
            }

            let stmt = compile_one(dialect, Statement::Select(spec));
            assert_eq!(stmt.params.len(), k + 2, "{dialect} with {k} predicates");
            assert_eq!(count_placeholders(dialect, &stmt.sql), k + 2);
        }
    }
}

#[test]
fn test_select_null_predicate_binds_nothing() {
    let spec = SelectSpec::new("users")
        .with_where(Predicate::is_null("deleted_at"))
        .with_where(Predicate::new("id", Operator::Eq, 7));

    let stmt = compile_one(Dialect::PostgreSQL, Statement::Select(spec));
    assert_eq!(
        stmt.sql,
        "SELECT * FROM users WHERE deleted_at IS NULL AND id = $1"
    );
    assert_eq!(stmt.params, vec![Value::Integer(7)]);
}

#[test]
fn test_is_null_with_explicit_null_value_is_inlined() {
    let spec = DeleteSpec::new("sessions")
        .with_where(Predicate::new("user_id", Operator::IsNot, Value::Null))
        .with_where(Predicate::new("expired", Operator::Eq, true));

    let stmt = compile_one(Dialect::MySQL, Statement::Delete(spec));
    assert_eq!(
        stmt.sql,
        "DELETE FROM sessions WHERE user_id IS NOT NULL AND expired = ?"
    );
    assert_eq!(stmt.params, vec![Value::Boolean(true)]);
}

#[test]
fn test_is_with_non_null_value_fails() {
    let spec = SelectSpec::new("users").with_where(Predicate::new("active", Operator::Is, 1));

    let err = compile(Dialect::PostgreSQL, &Statement::Select(spec)).unwrap_err();
    assert_eq!(
        err,
        CompileError::InvalidPredicate {
            column: "active".to_string(),
            operator: "IS".to_string(),
        }
    );
}

#[test]
fn test_select_full_clause_order() {
    let spec = SelectSpec::new("orders")
        .with_distinct()
        .with_columns(["customer_id", "COUNT(*)"])
        .with_join(Join::new(
            JoinKind::Inner,
            "customers",
            "orders.customer_id",
            "customers.id",
        ))
        .with_where(Predicate::new("orders.status", Operator::Eq, "paid"))
        .with_group_by(["customer_id"])
        .with_having(Predicate::new("COUNT(*)", Operator::Gt, 3))
        .with_order_by("customer_id", SortDirection::Desc)
        .with_limit(50);

    let stmt = compile_one(Dialect::SQLite, Statement::Select(spec));
    assert_eq!(
        stmt.sql,
        "SELECT DISTINCT customer_id, COUNT(*) FROM orders \
         INNER JOIN customers ON orders.customer_id = customers.id \
         WHERE orders.status = ? GROUP BY customer_id HAVING COUNT(*) > ? \
         ORDER BY customer_id DESC LIMIT ?"
    );
    assert_eq!(
        stmt.params,
        vec![Value::from("paid"), Value::Integer(3), Value::Integer(50)]
    );
}

#[test]
fn test_mssql_order_by_kept_for_pagination() {
    let spec = SelectSpec::new("users")
        .with_order_by("id", SortDirection::Asc)
        .with_limit(5);

    let stmt = compile_one(Dialect::MsSql, Statement::Select(spec));
    assert_eq!(
        stmt.sql,
        "SELECT * FROM users ORDER BY id ASC OFFSET 0 ROWS FETCH NEXT @p1 ROWS ONLY"
    );
    assert_eq!(stmt.params, vec![Value::Integer(5)]);
}

#[test]
fn test_offset_without_limit_is_ignored() {
    let spec = SelectSpec::new("users").with_offset(10);

    let stmt = compile_one(Dialect::PostgreSQL, Statement::Select(spec));
    assert_eq!(stmt.sql, "SELECT * FROM users");
    assert!(stmt.params.is_empty());
    assert_eq!(stmt.diagnostics.len(), 1);
    assert_eq!(stmt.diagnostics[0].kind, DiagnosticKind::OffsetIgnored);
    assert_eq!(stmt.diagnostics[0].severity, Severity::Info);
}

#[test]
fn test_compile_is_deterministic() {
    let spec = SelectSpec::new("users")
        .with_where(Predicate::new("email", Operator::Like, "%@example.com"))
        .with_join(Join::new(JoinKind::Full, "profiles", "users.id", "profiles.user_id"))
        .with_limit(3);
    let statement = Statement::Select(spec);

    for dialect in Dialect::ALL {
        let first = compile(dialect, &statement).unwrap();
        let second = compile(dialect, &statement).unwrap();
        assert_eq!(first, second, "{dialect}");
    }
}

// =============================================================================
// JOIN downgrades
// =============================================================================

#[test]
fn test_right_join_downgraded_on_sqlite() {
    let spec = SelectSpec::new("users").with_join(Join::new(
        JoinKind::Right,
        "orders",
        "users.id",
        "orders.user_id",
    ));

    let stmt = compile_one(Dialect::SQLite, Statement::Select(spec));
    assert_eq!(
        stmt.sql,
        "SELECT * FROM users LEFT JOIN orders ON users.id = orders.user_id"
    );
    assert_eq!(stmt.diagnostics.len(), 1);
    assert_eq!(
        stmt.diagnostics[0].kind,
        DiagnosticKind::JoinDowngraded {
            from: JoinKind::Right,
            to: JoinKind::Left
        }
    );
    assert_eq!(stmt.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_full_join_support_by_dialect() {
    let spec = SelectSpec::new("a").with_join(Join::new(JoinKind::Full, "b", "a.id", "b.id"));
    let statement = Statement::Select(spec);

    let pg = compile_one(Dialect::PostgreSQL, statement.clone());
    assert!(pg.sql.contains("FULL JOIN b"));
    assert!(pg.diagnostics.is_empty());

    let mysql = compile_one(Dialect::MySQL, statement);
    assert!(mysql.sql.contains("LEFT JOIN b"));
    assert_eq!(mysql.diagnostics.len(), 1);
}

// =============================================================================
// INSERT
// =============================================================================

#[test]
fn test_insert_returning_per_dialect() {
    let spec = InsertSpec::new("users").with_row(Row::new().with("name", "Ada").with("age", 36));
    let statement = Statement::Insert(spec);

    let pg = compile_one(Dialect::PostgreSQL, statement.clone());
    assert_eq!(
        pg.sql,
        "INSERT INTO users (name, age) VALUES ($1, $2) RETURNING *"
    );

    let mysql = compile_one(Dialect::MySQL, statement.clone());
    assert_eq!(mysql.sql, "INSERT INTO users (name, age) VALUES (?, ?)");

    let mssql = compile_one(Dialect::MsSql, statement);
    assert_eq!(
        mssql.sql,
        "INSERT INTO users (name, age) OUTPUT INSERTED.* VALUES (@p1, @p2)"
    );
    assert_eq!(mssql.params, vec![Value::from("Ada"), Value::Integer(36)]);
}

#[test]
fn test_insert_multi_row_follows_first_row_order() {
    let spec = InsertSpec::new("tags")
        .with_row(Row::new().with("name", "a").with("weight", 1))
        .with_row(Row::new().with("weight", 2).with("name", "b"));

    let stmt = compile_one(Dialect::SQLite, Statement::Insert(spec));
    assert_eq!(stmt.sql, "INSERT INTO tags (name, weight) VALUES (?, ?), (?, ?)");
    assert_eq!(
        stmt.params,
        vec![
            Value::from("a"),
            Value::Integer(1),
            Value::from("b"),
            Value::Integer(2)
        ]
    );
}

#[test]
fn test_insert_empty_rows_fails() {
    let spec = InsertSpec::new("users");
    let err = compile(Dialect::MySQL, &Statement::Insert(spec)).unwrap_err();
    assert_eq!(
        err,
        CompileError::EmptyInsert {
            table: "users".to_string()
        }
    );

    let spec = InsertSpec::new("users").with_row(Row::new());
    let err = compile(Dialect::PostgreSQL, &Statement::Insert(spec)).unwrap_err();
    assert!(matches!(err, CompileError::EmptyInsert { .. }));
}

#[test]
fn test_insert_row_shape_mismatch_fails() {
    let spec = InsertSpec::new("users")
        .with_row(Row::new().with("name", "a").with("age", 1))
        .with_row(Row::new().with("name", "b"));

    let err = compile(Dialect::MySQL, &Statement::Insert(spec)).unwrap_err();
    assert!(matches!(err, CompileError::RowShapeMismatch { row: 1, .. }));
}

// =============================================================================
// UPDATE / DELETE
// =============================================================================

#[test]
fn test_update_params_set_then_where() {
    let spec = UpdateSpec::new("orders")
        .with_set("status", "shipped")
        .with_set("updated_by", 9)
        .with_where(Predicate::new("id", Operator::Eq, 42));

    let stmt = compile_one(Dialect::PostgreSQL, Statement::Update(spec));
    assert_eq!(
        stmt.sql,
        "UPDATE orders SET status = $1, updated_by = $2 WHERE id = $3"
    );
    assert_eq!(
        stmt.params,
        vec![Value::from("shipped"), Value::Integer(9), Value::Integer(42)]
    );
}

#[test]
fn test_update_without_assignments_fails() {
    let spec = UpdateSpec::new("orders").with_where(Predicate::new("id", Operator::Eq, 1));
    let err = compile(Dialect::SQLite, &Statement::Update(spec)).unwrap_err();
    assert_eq!(
        err,
        CompileError::EmptyUpdate {
            table: "orders".to_string()
        }
    );
}

#[test]
fn test_delete_with_and_without_where() {
    let all = compile_one(Dialect::MySQL, Statement::Delete(DeleteSpec::new("sessions")));
    assert_eq!(all.sql, "DELETE FROM sessions");
    assert!(all.params.is_empty());

    let spec = DeleteSpec::new("sessions").with_where(Predicate::new(
        "expires_at",
        Operator::Lt,
        "2025-01-01",
    ));
    let stmt = compile_one(Dialect::MsSql, Statement::Delete(spec));
    assert_eq!(stmt.sql, "DELETE FROM sessions WHERE expires_at < @p1");
}

#[test]
fn test_compiler_for_every_dialect() {
    for dialect in Dialect::ALL {
        let compiler = compiler_for(dialect).unwrap();
        assert_eq!(compiler.dialect(), dialect);
    }
}
