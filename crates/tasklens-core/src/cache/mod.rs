//! # Result Cache
//!
//! Short-lived cache of fully ranked search results, keyed by the exact
//! search inputs. The TTL is deliberately tiny: it only has to absorb
//! bursts of identical queries (UI re-renders, repeated hotkey presses)
//! while staying blind to index edits, which the 2 second window makes
//! harmless in practice.

use crate::pipeline::ScoredTask;
use crate::provider::SourceQuery;
use crate::query::TaskFilter;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Distinct searches remembered before LRU eviction kicks in
pub const RESULT_CACHE_CAPACITY: usize = 64;

/// How long a cached result stays valid
pub const RESULT_CACHE_TTL: Duration = Duration::from_secs(2);

// ============================================================================
// CACHE
// ============================================================================

/// One remembered search result.
#[derive(Debug, Clone)]
pub struct CachedResults {
    pub tasks: Vec<ScoredTask>,
    /// Candidates that survived filtering before the display limit
    pub total_candidates: usize,
}

#[derive(Debug)]
struct CacheEntry {
    results: CachedResults,
    inserted_at: Instant,
}

impl CacheEntry {
    fn expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.inserted_at) >= ttl
    }
}

/// TTL-bounded LRU of ranked results.
///
/// Expired entries are swept opportunistically on every lookup, so the
/// cache never needs its own timer.
#[derive(Debug)]
pub struct ResultCache {
    entries: LruCache<String, CacheEntry>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        // Capacity is clamped so the LRU constructor cannot fail.
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("clamped to at least 1");
        ResultCache {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Look up a result, sweeping out anything expired first.
    pub fn get(&mut self, key: &str) -> Option<CachedResults> {
        self.sweep_expired();
        self.entries.get(key).map(|entry| entry.results.clone())
    }

    pub fn insert(&mut self, key: String, results: CachedResults) {
        self.entries.put(
            key,
            CacheEntry {
                results,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every entry older than the TTL.
    pub fn sweep_expired(&mut self) {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.expired(now, self.ttl))
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            self.entries.pop(&key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        ResultCache::new(RESULT_CACHE_CAPACITY, RESULT_CACHE_TTL)
    }
}

// ============================================================================
// CACHE KEY
// ============================================================================

/// Cache key covering every input that can change a result: the backend,
/// the whole normalized filter (keywords included) and the source scope.
pub fn derive_key(backend: &str, filter: &TaskFilter, source: &SourceQuery) -> String {
    // Serializing plain data structures cannot fail.
    let filter_json = serde_json::to_string(filter).unwrap_or_default();
    let source_json = serde_json::to_string(source).unwrap_or_default();
    format!("{backend}|{filter_json}|{source_json}")
}

// ============================================================================
// TESTS
// ============================================================================
