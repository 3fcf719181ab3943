// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for QueryCache: invalidation scenarios and the
//! store/index invariant under concurrent access

use serde_json::json;
use std::sync::Arc;
use unified_sql_query_cache::{CacheConfig, Fingerprint, QueryCache, extract_tables};
use unified_sql_query_ir::{Dialect, Value};

fn fingerprint(sql: &str, id: i64) -> Fingerprint {
    Fingerprint::new(Dialect::PostgreSQL, sql, &[Value::Integer(id)])
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_put_then_invalidate_then_miss() {
    let cache = QueryCache::new(CacheConfig::default()).unwrap();
    let fp1 = fingerprint("SELECT * FROM users WHERE id = $1", 1);

    cache.put(fp1.clone(), json!([{"id": 1}]), ["users"]);
    assert!(cache.contains(&fp1));

    assert_eq!(cache.invalidate(["users"]), 1);
    assert!(cache.get(&fp1).is_none());

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.invalidations, 1);
    assert_eq!(stats.size, 0);
}

#[test]
fn test_update_invalidates_only_its_table() {
    let cache = QueryCache::new(CacheConfig::default()).unwrap();

    let orders_sql = "SELECT * FROM orders WHERE status = $1";
    let join_sql = "SELECT * FROM orders o JOIN customers c ON o.customer_id = c.id WHERE c.id = $1";
    let users_sql = "SELECT * FROM users WHERE id = $1";

    for sql in [orders_sql, join_sql, users_sql] {
        cache.put(fingerprint(sql, 1), json!([{"n": 1}]), extract_tables(sql));
    }

    let update = "UPDATE orders SET status = $1 WHERE id = $2";
    let tables = extract_tables(update);
    assert_eq!(tables.iter().collect::<Vec<_>>(), vec!["orders"]);

    assert_eq!(cache.invalidate(&tables), 2);
    assert!(!cache.contains(&fingerprint(orders_sql, 1)));
    assert!(!cache.contains(&fingerprint(join_sql, 1)));
    assert!(cache.contains(&fingerprint(users_sql, 1)));

    // the join entry's customers registration is gone too
    assert!(cache.fingerprints_for("customers").is_empty());
    assert!(cache.is_consistent());
}

#[test]
fn test_invalidate_unknown_table_is_noop() {
    let cache = QueryCache::new(CacheConfig::default()).unwrap();
    cache.put(fingerprint("q", 1), json!(1), ["users"]);

    assert_eq!(cache.invalidate(["nothing"]), 0);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_put_if_unchanged_after_invalidation() {
    let cache = QueryCache::new(CacheConfig::default()).unwrap();
    let sql = "SELECT * FROM orders o JOIN customers c ON o.customer_id = c.id";
    let tables = extract_tables(sql);

    let stale = cache.generation(&tables);
    cache.invalidate(["customers"]);
    assert!(!cache.put_if_unchanged(fingerprint(sql, 1), json!([1]), &tables, stale));
    assert!(cache.is_empty());

    // invalidating a table nothing reads from leaves the generation alone
    let current = cache.generation(&tables);
    cache.invalidate(["users"]);
    assert!(cache.put_if_unchanged(fingerprint(sql, 1), json!([1]), &tables, current));
    assert!(cache.contains(&fingerprint(sql, 1)));
    assert!(cache.is_consistent());
}

#[test]
fn test_update_age_on_get_keeps_hot_entry() {
    let config = CacheConfig {
        update_age_on_get: true,
        ..CacheConfig::default()
    }
    .with_ttl(std::time::Duration::from_millis(60));
    let cache = QueryCache::new(config).unwrap();
    let fp = fingerprint("q", 1);
    cache.put(fp.clone(), json!(1), ["users"]);

    for _ in 0..3 {
        std::thread::sleep(std::time::Duration::from_millis(30));
        assert!(cache.get(&fp).is_some());
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_invariant_under_concurrent_access() {
    let config = CacheConfig::default().with_max(32);
    let cache = Arc::new(QueryCache::new(config).unwrap());
    let tables = ["users", "orders", "products", "customers"];

    std::thread::scope(|scope| {
        for worker in 0..8i64 {
            let cache = Arc::clone(&cache);
            scope.spawn(move || {
                for i in 0..500i64 {
                    let fp = fingerprint("SELECT * FROM t WHERE id = $1", worker * 1_000 + i % 50);
                    let first = tables[(i % 4) as usize];
                    let second = tables[((i + worker) % 4) as usize];

                    match i % 5 {
                        0 => {
                            cache.invalidate([first]);
                        }
                        1 | 2 => {
                            cache.get(&fp);
                        }
                        _ => {
                            cache.put(fp, json!({"i": i}), [first, second]);
                        }
                    }
                }
            });
        }
    });

    assert!(cache.is_consistent());
    assert!(cache.len() <= 32);

    let stats = cache.stats();
    assert_eq!(stats.size, cache.len());
    assert_eq!(stats.max_size, 32);
}
