// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Shared compilation logic for all SQL dialects
//!
//! Every statement is rendered by one algorithm here. Dialect differences are
//! read from the [`Capabilities`] table or requested from the [`Compiler`]
//! hooks (`map_type`, `render_literal`, `add_column_clause`, ...), so the
//! clause order and parameter order are identical for every dialect.
//!
//! ## Error Handling
//!
//! Inputs are validated completely before the first clause is written:
//! - Malformed input → `Err(CompileError)`, nothing rendered
//! - Unsupported construct → fallback rendered, `Diagnostic` recorded

use crate::{CompileContext, CompileError, CompileResult, CompiledStatement, Compiler};
use crate::{Diagnostic, DiagnosticKind};
use unified_sql_query_ir::{
    AlterTableSpec, AutoIncrementSyntax, BooleanStyle, Capabilities, ColumnDef, DeleteSpec,
    ForeignKey, IndexDef, InsertSpec, JoinKind, LimitStyle, LogicalType, Operator,
    Predicate, ReturningClause, SelectSpec, TableSpec, UpdateSpec, Value,
};

// =============================================================================
// DML
// =============================================================================

pub(crate) fn compile_select<C: Compiler + ?Sized>(
    compiler: &C,
    ctx: &mut CompileContext,
    spec: &SelectSpec,
) -> CompileResult<CompiledStatement> {
    let mut sql = String::from("SELECT ");
    if spec.distinct {
        sql.push_str("DISTINCT ");
    }

    if spec.columns.is_empty() {
        sql.push('*');
    } else {
        sql.push_str(&spec.columns.join(", "));
    }

    sql.push_str(" FROM ");
    sql.push_str(&spec.table);

    for join in &spec.joins {
        let kind = compiler.resolve_join_kind(ctx, join.kind);
        sql.push_str(&format!(
            " {} {} ON {} {} {}",
            kind.as_sql(),
            join.table,
            join.left,
            join.operator.as_sql(),
            join.right
        ));
    }

    render_predicates(ctx, &mut sql, "WHERE", &spec.where_clause)?;

    if !spec.group_by.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&spec.group_by.join(", "));
    }

    render_predicates(ctx, &mut sql, "HAVING", &spec.having)?;

    if !spec.order_by.is_empty() {
        let terms: Vec<String> = spec
            .order_by
            .iter()
            .map(|term| format!("{} {}", term.column, term.direction.as_sql()))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&terms.join(", "));
    }

    render_pagination(ctx, compiler.capabilities(), &mut sql, spec);

    Ok(ctx.finish(sql))
}

pub(crate) fn compile_insert<C: Compiler + ?Sized>(
    compiler: &C,
    ctx: &mut CompileContext,
    spec: &InsertSpec,
) -> CompileResult<CompiledStatement> {
    let columns: Vec<&str> = match spec.rows.first() {
        Some(first) if !first.is_empty() => first.columns().collect(),
        _ => {
            return Err(CompileError::EmptyInsert {
                table: spec.table.clone(),
            });
        }
    };

    for (index, row) in spec.rows.iter().enumerate().skip(1) {
        let same_shape =
            row.len() == columns.len() && columns.iter().all(|c| row.get(c).is_some());
        if !same_shape {
            return Err(CompileError::RowShapeMismatch {
                table: spec.table.clone(),
                row: index,
                expected: columns.join(", "),
            });
        }
    }

    let caps = compiler.capabilities();
    let mut sql = format!("INSERT INTO {} ({})", spec.table, columns.join(", "));

    if caps.returning == ReturningClause::Output {
        sql.push_str(" OUTPUT INSERTED.*");
    }

    sql.push_str(" VALUES ");
    for (index, row) in spec.rows.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        let mut placeholders = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = row.get(column).unwrap_or(&Value::Null);
            placeholders.push(ctx.bind(value));
        }
        sql.push('(');
        sql.push_str(&placeholders.join(", "));
        sql.push(')');
    }

    if caps.returning == ReturningClause::Returning {
        sql.push_str(" RETURNING *");
    }

    Ok(ctx.finish(sql))
}

pub(crate) fn compile_update(
    ctx: &mut CompileContext,
    spec: &UpdateSpec,
) -> CompileResult<CompiledStatement> {
    if spec.set.is_empty() {
        return Err(CompileError::EmptyUpdate {
            table: spec.table.clone(),
        });
    }

    let mut assignments = Vec::with_capacity(spec.set.len());
    for (column, value) in spec.set.iter() {
        let placeholder = ctx.bind(value);
        assignments.push(format!("{column} = {placeholder}"));
    }

    let mut sql = format!("UPDATE {} SET {}", spec.table, assignments.join(", "));
    render_predicates(ctx, &mut sql, "WHERE", &spec.where_clause)?;

    Ok(ctx.finish(sql))
}

pub(crate) fn compile_delete(
    ctx: &mut CompileContext,
    spec: &DeleteSpec,
) -> CompileResult<CompiledStatement> {
    let mut sql = format!("DELETE FROM {}", spec.table);
    render_predicates(ctx, &mut sql, "WHERE", &spec.where_clause)?;

    Ok(ctx.finish(sql))
}

/// Append ` <keyword> p1 <conn> p2 ...`; nothing when the list is empty
///
/// IS / IS NOT only accept NULL, which is written inline rather than bound.
fn render_predicates(
    ctx: &mut CompileContext,
    sql: &mut String,
    keyword: &str,
    predicates: &[Predicate],
) -> CompileResult<()> {
    if predicates.is_empty() {
        return Ok(());
    }

    if let Some(predicate) = predicates.iter().find(|p| {
        matches!(p.operator, Operator::Is | Operator::IsNot)
            && p.value.as_ref().is_some_and(|v| !v.is_null())
    }) {
        return Err(CompileError::InvalidPredicate {
            column: predicate.column.clone(),
            operator: predicate.operator.as_sql().to_string(),
        });
    }

    sql.push(' ');
    sql.push_str(keyword);

    for (index, predicate) in predicates.iter().enumerate() {
        sql.push(' ');
        if index > 0 {
            sql.push_str(predicate.connective.as_sql());
            sql.push(' ');
        }

        let rhs = match &predicate.value {
            Some(value) if !matches!(predicate.operator, Operator::Is | Operator::IsNot) => {
                ctx.bind(value)
            }
            _ => "NULL".to_string(),
        };
        sql.push_str(&format!(
            "{} {} {}",
            predicate.column,
            predicate.operator.as_sql(),
            rhs
        ));
    }

    Ok(())
}

fn render_pagination(
    ctx: &mut CompileContext,
    caps: &Capabilities,
    sql: &mut String,
    spec: &SelectSpec,
) {
    let Some(limit) = spec.limit else {
        if spec.offset.is_some() {
            ctx.diagnose(Diagnostic::info(
                DiagnosticKind::OffsetIgnored,
                "OFFSET without LIMIT is not rendered",
            ));
        }
        return;
    };

    match caps.limit_style {
        LimitStyle::LimitOffset => {
            let limit = ctx.bind(&count_value(limit));
            sql.push_str(&format!(" LIMIT {limit}"));
            if let Some(offset) = spec.offset {
                let offset = ctx.bind(&count_value(offset));
                sql.push_str(&format!(" OFFSET {offset}"));
            }
        }
        LimitStyle::OffsetFetch => {
            // OFFSET/FETCH is only valid after ORDER BY
            if spec.order_by.is_empty() {
                sql.push_str(" ORDER BY (SELECT NULL)");
            }
            match spec.offset {
                Some(offset) => {
                    let offset = ctx.bind(&count_value(offset));
                    sql.push_str(&format!(" OFFSET {offset} ROWS"));
                }
                None => sql.push_str(" OFFSET 0 ROWS"),
            }
            let limit = ctx.bind(&count_value(limit));
            sql.push_str(&format!(" FETCH NEXT {limit} ROWS ONLY"));
        }
    }
}

fn count_value(n: u64) -> Value {
    Value::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}

pub(crate) fn resolve_join_kind(
    ctx: &mut CompileContext,
    caps: &Capabilities,
    kind: JoinKind,
) -> JoinKind {
    let supported = match kind {
        JoinKind::Right => caps.right_join,
        JoinKind::Full => caps.full_join,
        JoinKind::Inner | JoinKind::Left => true,
    };
    if supported {
        return kind;
    }

    let dialect = ctx.dialect();
    ctx.diagnose(Diagnostic::warning(
        DiagnosticKind::JoinDowngraded {
            from: kind,
            to: JoinKind::Left,
        },
        format!(
            "{dialect} does not support {}; rendered as LEFT JOIN with the same operand order, rows may differ",
            kind.as_sql()
        ),
    ));
    JoinKind::Left
}

// =============================================================================
// DDL
// =============================================================================

pub(crate) fn compile_create_table<C: Compiler + ?Sized>(
    compiler: &C,
    ctx: &mut CompileContext,
    spec: &TableSpec,
) -> CompileResult<Vec<CompiledStatement>> {
    if spec.columns.is_empty() {
        return Err(CompileError::EmptyTable {
            table: spec.name.clone(),
        });
    }

    let types = resolve_types(&spec.columns)?;
    let caps = compiler.capabilities();

    let primary_key = spec.constraints.primary_key.as_deref();
    let inline_pk = match primary_key {
        Some([only]) => spec
            .columns
            .iter()
            .find(|c| c.name == *only && c.auto_increment),
        None => spec.columns.iter().find(|c| c.auto_increment),
        Some(_) => None,
    }
    .map(|c| c.name.as_str());

    let mut definitions = Vec::with_capacity(spec.columns.len());
    for (column, ty) in spec.columns.iter().zip(&types) {
        let inline = inline_pk == Some(column.name.as_str());
        definitions.push(column_definition(compiler, ctx, column, ty, inline));
    }

    if let Some(columns) = primary_key
        && inline_pk.is_none()
        && !columns.is_empty()
    {
        definitions.push(format!("PRIMARY KEY ({})", columns.join(", ")));
    }

    for group in &spec.constraints.unique {
        definitions.push(format!("UNIQUE ({})", group.join(", ")));
    }

    for foreign_key in &spec.constraints.foreign_keys {
        definitions.push(foreign_key_clause(foreign_key));
    }

    let mut post_statements = Vec::new();
    for index in &spec.constraints.indexes {
        let name = index.name_for(&spec.name);
        if caps.inline_index {
            definitions.push(format!("INDEX {} ({})", name, index.columns.join(", ")));
        } else {
            post_statements.push(compiler.create_index(&spec.name, index, spec.if_not_exists));
        }
    }

    let sql = format!(
        "{} ({})",
        compiler.create_table_head(spec),
        definitions.join(", ")
    );

    let mut compiled = vec![ctx.finish(sql)];
    compiled.extend(post_statements.into_iter().map(|sql| ctx.finish(sql)));
    Ok(compiled)
}

pub(crate) fn compile_alter_table<C: Compiler + ?Sized>(
    compiler: &C,
    ctx: &mut CompileContext,
    spec: &AlterTableSpec,
) -> CompileResult<Vec<CompiledStatement>> {
    let types = resolve_types(&spec.add_columns)?;
    let caps = compiler.capabilities();
    let mut compiled = Vec::new();

    for (column, ty) in spec.add_columns.iter().zip(&types) {
        let mut column = column.clone();

        if column.auto_increment && !caps.alter_add_constraint {
            ctx.diagnose(Diagnostic::warning(
                DiagnosticKind::AutoIncrementDropped {
                    column: column.name.clone(),
                },
                format!(
                    "{} cannot add an auto-increment column to an existing table; '{}' added as a plain column",
                    ctx.dialect(),
                    column.name
                ),
            ));
            column.auto_increment = false;
        }

        if !column.nullable && column.default.is_none() && !caps.add_not_null_without_default {
            ctx.diagnose(Diagnostic::warning(
                DiagnosticKind::NullabilityDowngraded {
                    column: column.name.clone(),
                },
                format!(
                    "{} cannot add a NOT NULL column without a default; '{}' added as nullable",
                    ctx.dialect(),
                    column.name
                ),
            ));
            column.nullable = true;
        }

        let definition = column_definition(compiler, ctx, &column, ty, false);
        let sql = format!(
            "ALTER TABLE {} {} {}",
            spec.table,
            compiler.add_column_clause(),
            definition
        );
        compiled.push(ctx.finish(sql));
    }

    let constraints = &spec.add_constraints;

    if let Some(columns) = &constraints.primary_key {
        ctx.diagnose(Diagnostic::info(
            DiagnosticKind::ConstraintSkipped {
                constraint: format!("PRIMARY KEY ({})", columns.join(", ")),
            },
            "primary keys cannot be added by ALTER TABLE; the table keeps its original key",
        ));
    }

    for group in &constraints.unique {
        let clause = format!("UNIQUE ({})", group.join(", "));
        if caps.alter_add_constraint {
            let sql = format!(
                "ALTER TABLE {} ADD CONSTRAINT uq_{}_{} {}",
                spec.table,
                spec.table,
                group.join("_"),
                clause
            );
            compiled.push(ctx.finish(sql));
        } else {
            skip_constraint(ctx, clause);
        }
    }

    for foreign_key in &constraints.foreign_keys {
        let clause = foreign_key_clause(foreign_key);
        if caps.alter_add_constraint {
            let sql = format!(
                "ALTER TABLE {} ADD CONSTRAINT fk_{}_{} {}",
                spec.table, spec.table, foreign_key.column, clause
            );
            compiled.push(ctx.finish(sql));
        } else {
            skip_constraint(ctx, clause);
        }
    }

    for index in &constraints.indexes {
        compiled.push(ctx.finish(compiler.create_index(&spec.table, index, false)));
    }

    Ok(compiled)
}

fn skip_constraint(ctx: &mut CompileContext, clause: String) {
    let message = format!(
        "{} cannot add constraints to an existing table; skipped {}",
        ctx.dialect(),
        clause
    );
    ctx.diagnose(Diagnostic::warning(
        DiagnosticKind::ConstraintSkipped { constraint: clause },
        message,
    ));
}

/// Resolve every column type up front so an unknown type fails before rendering
fn resolve_types(columns: &[ColumnDef]) -> CompileResult<Vec<LogicalType>> {
    columns
        .iter()
        .map(|column| LogicalType::resolve(column).map_err(CompileError::from))
        .collect()
}

fn foreign_key_clause(foreign_key: &ForeignKey) -> String {
    format!(
        "FOREIGN KEY ({}) REFERENCES {} ({})",
        foreign_key.column, foreign_key.ref_table, foreign_key.ref_column
    )
}

pub(crate) fn create_index(table: &str, index: &IndexDef, if_not_exists: bool) -> String {
    format!(
        "CREATE INDEX {}{} ON {} ({})",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        index.name_for(table),
        table,
        index.columns.join(", ")
    )
}

/// `<name> <type> [modifiers]` for CREATE TABLE and ALTER TABLE ADD
fn column_definition<C: Compiler + ?Sized>(
    compiler: &C,
    ctx: &mut CompileContext,
    column: &ColumnDef,
    ty: &LogicalType,
    inline_pk: bool,
) -> String {
    let caps = compiler.capabilities();
    let mut parts = vec![column.name.clone()];

    if column.auto_increment {
        match caps.auto_increment {
            AutoIncrementSyntax::Serial => {
                let serial = if *ty == LogicalType::BigInteger {
                    "BIGSERIAL"
                } else {
                    "SERIAL"
                };
                parts.push(serial.to_string());
                if inline_pk {
                    parts.push("PRIMARY KEY".to_string());
                }
                return parts.join(" ");
            }
            AutoIncrementSyntax::IntegerPrimaryKeyAutoincrement if inline_pk => {
                parts.push("INTEGER PRIMARY KEY AUTOINCREMENT".to_string());
                return parts.join(" ");
            }
            AutoIncrementSyntax::IntegerPrimaryKeyAutoincrement => {
                ctx.diagnose(Diagnostic::warning(
                    DiagnosticKind::AutoIncrementDropped {
                        column: column.name.clone(),
                    },
                    format!(
                        "{} only supports AUTOINCREMENT on a single INTEGER PRIMARY KEY; '{}' rendered without it",
                        ctx.dialect(),
                        column.name
                    ),
                ));
            }
            AutoIncrementSyntax::AutoIncrement => {
                parts.push(compiler.map_type(ty));
                parts.push("NOT NULL AUTO_INCREMENT".to_string());
                if inline_pk {
                    parts.push("PRIMARY KEY".to_string());
                }
                return parts.join(" ");
            }
            AutoIncrementSyntax::Identity => {
                parts.push(compiler.map_type(ty));
                parts.push("IDENTITY(1,1) NOT NULL".to_string());
                if inline_pk {
                    parts.push("PRIMARY KEY".to_string());
                }
                return parts.join(" ");
            }
        }
    }

    parts.push(compiler.map_type(ty));
    if !column.nullable {
        parts.push("NOT NULL".to_string());
    }
    if let Some(default) = &column.default {
        parts.push(format!("DEFAULT {}", compiler.render_literal(default)));
    }
    if inline_pk {
        parts.push("PRIMARY KEY".to_string());
    }

    parts.join(" ")
}

// =============================================================================
// Literals
// =============================================================================

/// Inline literal for DEFAULT clauses
pub(crate) fn render_literal(value: &Value, caps: &Capabilities) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Boolean(b) => match (caps.boolean_style, b) {
            (BooleanStyle::Keyword, true) => "TRUE".to_string(),
            (BooleanStyle::Keyword, false) => "FALSE".to_string(),
            (BooleanStyle::Numeric, true) => "1".to_string(),
            (BooleanStyle::Numeric, false) => "0".to_string(),
        },
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => quote(s),
        Value::Json(json) => quote(&json.to_string()),
        Value::Bytes(bytes) => format!("X'{}'", hex::encode_upper(bytes)),
    }
}

/// Single-quoted string with embedded quotes doubled
pub(crate) fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
