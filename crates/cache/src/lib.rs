// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Unified SQL Query - Cache
//!
//! Result cache for read statements with table-keyed invalidation.
//!
//! ## Overview
//!
//! ```text
//! CompiledStatement ─┬─ read ──→ Fingerprint ──→ QueryCache::get ──hit──→ result
//!                    │                              │ miss
//!                    │                              ↓
//!                    │                          Executor ──→ QueryCache::put(tables)
//!                    └─ write ─→ Executor ──ok──→ QueryCache::invalidate(tables)
//! ```
//!
//! - [`Fingerprint`]: SHA-256 digest of (dialect, SQL text, ordered params)
//! - [`extract_tables`]: regex heuristic SQL text → referenced table names
//! - [`QueryCache`]: LRU store with TTL plus a table → fingerprints index
//! - [`CachedExecutor`]: middleware wiring the cache around an [`Executor`]
//!
//! ## Invariant
//!
//! A fingerprint reachable through the table index is always present in the
//! primary store, and a fingerprint removed from the store (TTL, capacity
//! eviction, invalidation, overwrite) is removed from every index set in the
//! same critical section.

pub mod config;
pub mod executor;
pub mod extract;
pub mod fingerprint;
pub mod middleware;
pub mod stats;
pub mod store;

pub use config::{CacheConfig, ConfigError};
pub use executor::{ExecuteError, ExecuteResult, Executor, QueryResult};
pub use extract::{StatementKind, extract_tables};
pub use fingerprint::Fingerprint;
pub use middleware::CachedExecutor;
pub use stats::CacheStats;
pub use store::{Cacheable, QueryCache};
