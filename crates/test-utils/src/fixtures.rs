// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures: ready-made statement IR

use unified_sql_query_ir::{
    ColumnDef, ForeignKey, IndexDef, InsertSpec, Join, JoinKind, Operator, Predicate, Row,
    SelectSpec, SortDirection, TableSpec, UpdateSpec,
};

/// Sample statements for testing
pub struct IrFixtures;

impl IrFixtures {
    // ===== SELECT =====

    /// `SELECT * FROM users WHERE id = 1 LIMIT 1`
    pub fn user_by_id(id: i64) -> SelectSpec {
        SelectSpec::new("users")
            .with_where(Predicate::new("id", Operator::Eq, id))
            .with_limit(1)
    }

    /// Active users, newest first, paginated
    pub fn active_users_page(limit: u64, offset: u64) -> SelectSpec {
        SelectSpec::new("users")
            .with_columns(["id", "email", "name"])
            .with_where(Predicate::new("active", Operator::Eq, true))
            .with_where(Predicate::is_null("deleted_at"))
            .with_order_by("created_at", SortDirection::Desc)
            .with_limit(limit)
            .with_offset(offset)
    }

    /// Orders joined to their customer
    pub fn orders_with_customers(kind: JoinKind) -> SelectSpec {
        SelectSpec::new("orders")
            .with_columns(["orders.id", "customers.name"])
            .with_join(Join::new(
                kind,
                "customers",
                "orders.customer_id",
                "customers.id",
            ))
            .with_where(Predicate::new("orders.status", Operator::Eq, "paid"))
    }

    /// All products, no predicates
    pub fn all_products() -> SelectSpec {
        SelectSpec::new("products")
    }

    // ===== DML =====

    pub fn insert_users() -> InsertSpec {
        InsertSpec::new("users")
            .with_row(Row::new().with("email", "ada@example.com").with("name", "Ada"))
            .with_row(Row::new().with("email", "alan@example.com").with("name", "Alan"))
    }

    pub fn ship_order(id: i64) -> UpdateSpec {
        UpdateSpec::new("orders")
            .with_set("status", "shipped")
            .with_where(Predicate::new("id", Operator::Eq, id))
    }

    // ===== DDL =====

    pub fn users_table() -> TableSpec {
        TableSpec::new("users")
            .with_column(ColumnDef::new("id", "integer").auto_increment())
            .with_column(ColumnDef::new("email", "string").not_null())
            .with_column(ColumnDef::new("name", "string(100)"))
            .with_column(ColumnDef::new("active", "boolean").with_default(true))
            .with_column(ColumnDef::new("created_at", "timestamp"))
            .with_primary_key(["id"])
            .with_unique(["email"])
    }

    pub fn orders_table() -> TableSpec {
        TableSpec::new("orders")
            .with_column(ColumnDef::new("id", "bigint").auto_increment())
            .with_column(ColumnDef::new("customer_id", "integer").not_null())
            .with_column(ColumnDef::new("total", "decimal(12, 2)").with_default(0))
            .with_column(ColumnDef::new("status", "string(20)").with_default("new"))
            .with_primary_key(["id"])
            .with_foreign_key(ForeignKey::new("customer_id", "customers", "id"))
            .with_index(IndexDef::new(["status"]))
    }
}
