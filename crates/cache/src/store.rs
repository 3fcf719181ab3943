// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! LRU/TTL result store with a table → fingerprint index
//!
//! ## Thread Safety
//!
//! The primary store, the table index and the counters live in one
//! [`CacheState`] behind a single `parking_lot::Mutex`. Every public
//! operation takes the lock once, so no thread can observe a fingerprint
//! that is in the store but not indexed, or indexed but not stored.
//!
//! Share the cache with `Arc<QueryCache<R>>`.
//!
//! ## Expiry
//!
//! Entries are not swept in the background. An expired entry is dropped when
//! it is read, when [`QueryCache::purge_expired`] runs, or when LRU pressure
//! evicts it; each path prunes the index.
//!
//! ## Generations
//!
//! Every table carries a counter bumped by each [`QueryCache::invalidate`]
//! naming it. A read that snapshots [`QueryCache::generation`] before
//! executing and stores with [`QueryCache::put_if_unchanged`] cannot
//! re-insert a result computed before a concurrent write.

use crate::config::{CacheConfig, ConfigError};
use crate::fingerprint::Fingerprint;
use crate::stats::CacheStats;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Results that may be stored
///
/// "Falsy" results (null, false, zero, empty string) are never cached.
pub trait Cacheable {
    fn is_cacheable(&self) -> bool;
}

impl<T: Cacheable> Cacheable for Option<T> {
    fn is_cacheable(&self) -> bool {
        self.as_ref().is_some_and(Cacheable::is_cacheable)
    }
}

impl Cacheable for serde_json::Value {
    fn is_cacheable(&self) -> bool {
        match self {
            serde_json::Value::Null => false,
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            serde_json::Value::String(s) => !s.is_empty(),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
        }
    }
}

struct Entry<R> {
    value: R,
    tables: Vec<String>,
    stored_at: Instant,
}

impl<R> Entry<R> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) > ttl
    }
}

struct CacheState<R> {
    entries: LruCache<Fingerprint, Entry<R>>,
    index: HashMap<String, HashSet<Fingerprint>>,
    generations: HashMap<String, u64>,
    hits: u64,
    misses: u64,
    sets: u64,
    invalidations: u64,
}

impl<R> CacheState<R> {
    /// Remove an entry from the store and from every index set naming it
    fn remove(&mut self, fingerprint: &Fingerprint) -> Option<Entry<R>> {
        let entry = self.entries.pop(fingerprint)?;
        self.unindex(fingerprint, &entry.tables);
        Some(entry)
    }

    /// Sum of the generations of `tables`; changes whenever any of them is invalidated
    fn generation(&self, tables: &[String]) -> u64 {
        tables
            .iter()
            .filter_map(|table| self.generations.get(table))
            .fold(0, |sum, generation| sum.wrapping_add(*generation))
    }

    fn insert(&mut self, fingerprint: Fingerprint, value: R, tables: Vec<String>) {
        self.remove(&fingerprint);

        for table in &tables {
            self.index
                .entry(table.clone())
                .or_default()
                .insert(fingerprint.clone());
        }

        let entry = Entry {
            value,
            tables,
            stored_at: Instant::now(),
        };

        if let Some((evicted, old)) = self.entries.push(fingerprint, entry) {
            self.unindex(&evicted, &old.tables);
            debug!(fingerprint = %evicted, "cache evict (capacity)");
        }

        self.sets += 1;
    }

    fn unindex(&mut self, fingerprint: &Fingerprint, tables: &[String]) {
        for table in tables {
            if let Some(set) = self.index.get_mut(table) {
                set.remove(fingerprint);
                if set.is_empty() {
                    self.index.remove(table);
                }
            }
        }
    }
}

fn normalize<I, S>(tables: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tables: Vec<String> = tables
        .into_iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect();
    tables.sort();
    tables.dedup();
    tables
}

/// Bounded, TTL-based cache of read results keyed by [`Fingerprint`]
pub struct QueryCache<R> {
    state: Mutex<CacheState<R>>,
    config: CacheConfig,
}

impl<R: Cacheable + Clone> QueryCache<R> {
    /// Create a cache, validating the configuration first
    pub fn new(config: CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.max).ok_or(ConfigError::InvalidCapacity)?;

        Ok(Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                index: HashMap::new(),
                generations: HashMap::new(),
                hits: 0,
                misses: 0,
                sets: 0,
                invalidations: 0,
            }),
            config,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a result
    ///
    /// A hit promotes the entry in LRU order and, with `update_age_on_get`,
    /// restarts its TTL. An expired entry is dropped; with `allow_stale` its
    /// value is returned one last time.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<R> {
        let now = Instant::now();
        let ttl = self.config.ttl();
        let mut state = self.state.lock();

        let expired = match state.entries.peek(fingerprint) {
            Some(entry) => entry.is_expired(now, ttl),
            None => {
                state.misses += 1;
                debug!(%fingerprint, "cache miss");
                return None;
            }
        };

        if expired {
            let entry = state.remove(fingerprint)?;
            if self.config.allow_stale {
                state.hits += 1;
                debug!(%fingerprint, "cache hit (stale)");
                return Some(entry.value);
            }
            state.misses += 1;
            debug!(%fingerprint, "cache miss (expired)");
            return None;
        }

        let update_age = self.config.update_age_on_get;
        let entry = state.entries.get_mut(fingerprint)?;
        if update_age {
            entry.stored_at = now;
        }
        let value = entry.value.clone();

        state.hits += 1;
        debug!(%fingerprint, "cache hit");
        Some(value)
    }

    /// Store a result and register it under every table in `tables`
    ///
    /// Returns false (and stores nothing) for results that are not
    /// cacheable. An existing entry for the same fingerprint is replaced
    /// together with its index registrations.
    pub fn put<I, S>(&self, fingerprint: Fingerprint, value: R, tables: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !value.is_cacheable() {
            debug!(%fingerprint, "result not cacheable");
            return false;
        }

        let tables = normalize(tables);
        self.state.lock().insert(fingerprint, value, tables);
        true
    }

    /// Current generation of a table set, to pass to [`QueryCache::put_if_unchanged`]
    pub fn generation<I, S>(&self, tables: I) -> u64
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tables = normalize(tables);
        self.state.lock().generation(&tables)
    }

    /// Like [`QueryCache::put`], but stores nothing if any of `tables` was
    /// invalidated since `generation` was taken
    pub fn put_if_unchanged<I, S>(
        &self,
        fingerprint: Fingerprint,
        value: R,
        tables: I,
        generation: u64,
    ) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !value.is_cacheable() {
            debug!(%fingerprint, "result not cacheable");
            return false;
        }

        let tables = normalize(tables);
        let mut state = self.state.lock();
        if state.generation(&tables) != generation {
            debug!(%fingerprint, "result superseded by a write");
            return false;
        }

        state.insert(fingerprint, value, tables);
        true
    }

    /// Drop every result registered under any of `tables`
    ///
    /// Returns the number of entries removed.
    pub fn invalidate<I, S>(&self, tables: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.state.lock();
        let mut removed = 0;

        for table in tables {
            let table = table.as_ref().to_lowercase();
            *state.generations.entry(table.clone()).or_default() += 1;

            let Some(fingerprints) = state.index.remove(&table) else {
                continue;
            };

            for fingerprint in fingerprints {
                if state.remove(&fingerprint).is_some() {
                    removed += 1;
                }
            }
        }

        state.invalidations += removed as u64;
        if removed > 0 {
            debug!(removed, "cache invalidate");
        }
        removed
    }

    /// Sweep TTL-expired entries without reading them
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.config.ttl();
        let mut state = self.state.lock();

        let expired: Vec<Fingerprint> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(fingerprint, _)| fingerprint.clone())
            .collect();

        for fingerprint in &expired {
            state.remove(fingerprint);
        }

        if !expired.is_empty() {
            debug!(purged = expired.len(), "cache purge");
        }
        expired.len()
    }

    /// Remove all entries; counters are kept
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.index.clear();
    }

    pub fn reset_stats(&self) {
        let mut state = self.state.lock();
        state.hits = 0;
        state.misses = 0;
        state.sets = 0;
        state.invalidations = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats::new(
            state.hits,
            state.misses,
            state.sets,
            state.invalidations,
            state.entries.len(),
            state.entries.cap().get(),
        )
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().entries.cap().get()
    }

    /// Whether an unexpired entry exists; does not touch counters or LRU order
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        let now = Instant::now();
        let ttl = self.config.ttl();
        self.state
            .lock()
            .entries
            .peek(fingerprint)
            .is_some_and(|entry| !entry.is_expired(now, ttl))
    }

    /// Tables an entry is registered under
    pub fn tables_for(&self, fingerprint: &Fingerprint) -> Option<Vec<String>> {
        self.state
            .lock()
            .entries
            .peek(fingerprint)
            .map(|entry| entry.tables.clone())
    }

    /// Fingerprints registered under a table
    pub fn fingerprints_for(&self, table: &str) -> Vec<Fingerprint> {
        self.state
            .lock()
            .index
            .get(&table.to_lowercase())
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Check that the store and the table index agree
    ///
    /// Every indexed fingerprint must be stored and list that table, and
    /// every stored entry must be indexed under each of its tables.
    pub fn is_consistent(&self) -> bool {
        let state = self.state.lock();

        let indexed_are_stored = state.index.iter().all(|(table, set)| {
            !set.is_empty()
                && set.iter().all(|fingerprint| {
                    state
                        .entries
                        .peek(fingerprint)
                        .is_some_and(|entry| entry.tables.contains(table))
                })
        });

        let stored_are_indexed = state.entries.iter().all(|(fingerprint, entry)| {
            entry.tables.iter().all(|table| {
                state
                    .index
                    .get(table)
                    .is_some_and(|set| set.contains(fingerprint))
            })
        });

        indexed_are_stored && stored_are_indexed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unified_sql_query_ir::{Dialect, Value};

    fn fp(sql: &str) -> Fingerprint {
        Fingerprint::new(Dialect::SQLite, sql, &[Value::Integer(1)])
    }

    fn cache(max: usize) -> QueryCache<serde_json::Value> {
        QueryCache::new(CacheConfig::default().with_max(max)).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = QueryCache::<serde_json::Value>::new(CacheConfig::default().with_max(0));
        assert!(matches!(result, Err(ConfigError::InvalidCapacity)));
    }

    #[test]
    fn test_get_put_counts() {
        let cache = cache(10);
        assert!(cache.get(&fp("a")).is_none());

        assert!(cache.put(fp("a"), json!([{"id": 1}]), ["users"]));
        assert_eq!(cache.get(&fp("a")), Some(json!([{"id": 1}])));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.hit_rate, 50.0);
    }

    #[test]
    fn test_falsy_results_rejected() {
        let cache = cache(10);
        assert!(!cache.put(fp("a"), json!(null), ["users"]));
        assert!(!cache.put(fp("b"), json!(0), ["users"]));
        assert!(!cache.put(fp("c"), json!(""), ["users"]));
        assert!(cache.put(fp("d"), json!([]), ["users"]));
        assert_eq!(cache.len(), 1);
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_overwrite_replaces_registrations() {
        let cache = cache(10);
        cache.put(fp("a"), json!(1), ["users"]);
        cache.put(fp("a"), json!(2), ["orders"]);

        assert!(cache.fingerprints_for("users").is_empty());
        assert_eq!(cache.fingerprints_for("orders"), vec![fp("a")]);
        assert_eq!(cache.get(&fp("a")), Some(json!(2)));
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_capacity_eviction_prunes_index() {
        let cache = cache(2);
        cache.put(fp("a"), json!(1), ["users"]);
        cache.put(fp("b"), json!(2), ["users", "orders"]);
        cache.put(fp("c"), json!(3), ["orders"]);

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&fp("a")));
        assert_eq!(cache.fingerprints_for("users"), vec![fp("b")]);
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_invalidate_removes_from_all_tables() {
        let cache = cache(10);
        cache.put(fp("a"), json!(1), ["users", "orders"]);
        cache.put(fp("b"), json!(2), ["orders"]);
        cache.put(fp("c"), json!(3), ["products"]);

        assert_eq!(cache.invalidate(["Users"]), 1);
        assert!(!cache.contains(&fp("a")));
        assert_eq!(cache.fingerprints_for("orders"), vec![fp("b")]);
        assert!(cache.contains(&fp("c")));
        assert_eq!(cache.stats().invalidations, 1);
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_ttl_expiry() {
        let config = CacheConfig::default().with_ttl(Duration::from_millis(20));
        let cache = QueryCache::new(config).unwrap();
        cache.put(fp("a"), json!(1), ["users"]);

        std::thread::sleep(Duration::from_millis(40));
        assert!(!cache.contains(&fp("a")));
        assert!(cache.get(&fp("a")).is_none());
        assert!(cache.is_empty());
        assert!(cache.fingerprints_for("users").is_empty());
    }

    #[test]
    fn test_allow_stale_returns_once() {
        let mut config = CacheConfig::default().with_ttl(Duration::from_millis(20));
        config.allow_stale = true;
        let cache = QueryCache::new(config).unwrap();
        cache.put(fp("a"), json!(1), ["users"]);

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&fp("a")), Some(json!(1)));
        assert!(cache.get(&fp("a")).is_none());
    }

    #[test]
    fn test_purge_expired() {
        let config = CacheConfig::default().with_ttl(Duration::from_millis(20));
        let cache = QueryCache::new(config).unwrap();
        cache.put(fp("a"), json!(1), ["users"]);
        cache.put(fp("b"), json!(2), ["orders"]);

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.purge_expired(), 2);
        assert!(cache.is_empty());
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_clear_keeps_counters() {
        let cache = cache(10);
        cache.put(fp("a"), json!(1), ["users"]);
        cache.get(&fp("a"));
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 1);

        cache.reset_stats();
        assert_eq!(cache.stats().total, 0);
    }
}
