// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Cache statistics snapshot

use serde::{Deserialize, Serialize};

/// Point-in-time cache statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    /// Entries removed by table invalidation
    pub invalidations: u64,
    /// hits + misses
    pub total: u64,
    /// Percentage of lookups that hit, rounded to two decimals
    pub hit_rate: f64,
    pub size: usize,
    pub max_size: usize,
}

impl CacheStats {
    pub fn new(
        hits: u64,
        misses: u64,
        sets: u64,
        invalidations: u64,
        size: usize,
        max_size: usize,
    ) -> Self {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64 * 10_000.0).round() / 100.0
        };

        Self {
            hits,
            misses,
            sets,
            invalidations,
            total,
            hit_rate,
            size,
            max_size,
        }
    }
}
