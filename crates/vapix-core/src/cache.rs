// ── Bounded TTL response cache ──
//
// Key → value store with a per-entry size limit, an aggregate size limit,
// an entry-count limit and a fixed lifetime per entry. Eviction is FIFO by
// insertion; reads never reorder entries. Expiry is checked lazily on read.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace, warn};
use url::form_urlencoded::byte_serialize;

// ── Limits ───────────────────────────────────────────────────────

/// Size, count and lifetime bounds for a [`TtlCache`].
///
/// Sizes are measured as the length of the value's JSON serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLimits {
    pub ttl: Duration,
    pub max_entries: usize,
    pub max_object_size: usize,
    pub max_total_size: usize,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            max_entries: 64,
            max_object_size: 1024 * 1024,
            max_total_size: 8 * 1024 * 1024,
        }
    }
}

// ── Keys ─────────────────────────────────────────────────────────

/// Cache key: an operation name plus every parameter that changes its result.
///
/// Components are form-urlencoded, so `("a&b", "c")` and `("a", "b&c")`
/// never produce the same key. An absent optional parameter is left out
/// entirely, which keeps `None` distinct from `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    key: String,
    has_params: bool,
}

impl CacheKey {
    pub fn new(operation: &str) -> Self {
        Self {
            key: byte_serialize(operation.as_bytes()).collect(),
            has_params: false,
        }
    }

    pub fn with(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.key.push(if self.has_params { '&' } else { '?' });
        self.has_params = true;
        self.key.extend(byte_serialize(name.as_bytes()));
        self.key.push('=');
        self.key.extend(byte_serialize(value.to_string().as_bytes()));
        self
    }

    pub fn with_opt(self, name: &str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

// ── Stats ────────────────────────────────────────────────────────

/// Counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Values that were too large (or unserializable) to store.
    pub rejected: u64,
}

// ── Cache ────────────────────────────────────────────────────────

struct Entry<V> {
    value: V,
    size: usize,
    stored_at: Instant,
}

struct Inner<V> {
    /// Insertion order doubles as eviction order.
    entries: IndexMap<String, Entry<V>>,
    total_size: usize,
    stats: CacheStats,
}

impl<V> Inner<V> {
    fn remove(&mut self, key: &str) {
        if let Some(entry) = self.entries.shift_remove(key) {
            self.total_size -= entry.size;
        }
    }

    fn evict_oldest(&mut self) {
        if let Some((key, entry)) = self.entries.shift_remove_index(0) {
            self.total_size -= entry.size;
            self.stats.evictions += 1;
            trace!(%key, size = entry.size, "evicted");
        }
    }
}

/// Thread-safe bounded cache with per-entry expiry.
///
/// The lock only guards bookkeeping; producers passed to
/// [`fetch`](Self::fetch) run with it released, so concurrent misses on
/// the same key may each run their producer. The last one to finish wins.
pub struct TtlCache<V> {
    limits: CacheLimits,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone + Serialize> TtlCache<V> {
    pub fn new(limits: CacheLimits) -> Self {
        Self {
            limits,
            inner: Mutex::new(Inner {
                entries: IndexMap::new(),
                total_size: 0,
                stats: CacheStats::default(),
            }),
        }
    }

    pub fn limits(&self) -> CacheLimits {
        self.limits
    }

    /// Return the live value for `key`, or run `produce` and offer its
    /// result for storage. Producer errors pass through untouched.
    pub fn fetch<E>(&self, key: &CacheKey, produce: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        if let Some(value) = self.get(key) {
            trace!(%key, "cache hit");
            return Ok(value);
        }
        trace!(%key, "cache miss");
        let value = produce()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Live value for `key`. Expired entries are dropped on the way.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let ttl = self.limits.ttl;

        let lookup = inner
            .entries
            .get(key.as_str())
            .map(|entry| (entry.stored_at.elapsed() < ttl).then(|| entry.value.clone()));

        match lookup {
            Some(Some(value)) => {
                inner.stats.hits += 1;
                Some(value)
            }
            Some(None) => {
                inner.remove(key.as_str());
                inner.stats.misses += 1;
                trace!(%key, "expired");
                None
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    /// Store `value`, evicting oldest entries until it fits.
    ///
    /// Returns `false` when the value is too large to cache; the cache is
    /// then left unchanged.
    pub fn insert(&self, key: &CacheKey, value: V) -> bool {
        let size = match serde_json::to_vec(&value) {
            Ok(bytes) => bytes.len(),
            Err(e) => {
                warn!(%key, error = %e, "value not serializable, not caching");
                self.lock().stats.rejected += 1;
                return false;
            }
        };

        let limit = self.limits.max_object_size.min(self.limits.max_total_size);
        if size > limit || self.limits.max_entries == 0 {
            debug!(%key, size, limit, "too large to cache");
            self.lock().stats.rejected += 1;
            return false;
        }

        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.remove(key.as_str());
        while !inner.entries.is_empty()
            && (inner.entries.len() >= self.limits.max_entries
                || inner.total_size + size > self.limits.max_total_size)
        {
            inner.evict_oldest();
        }

        inner.entries.insert(
            key.as_str().to_owned(),
            Entry {
                value,
                size,
                stored_at: Instant::now(),
            },
        );
        inner.total_size += size;
        trace!(%key, size, total = inner.total_size, "stored");
        true
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Sum of the sizes of all stored entries, expired ones included.
    pub fn total_size(&self) -> usize {
        self.lock().total_size
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.total_size = 0;
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        // Producers run unlocked, so a poisoned guard still holds whole entries.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;

    fn limits() -> CacheLimits {
        CacheLimits {
            ttl: Duration::from_secs(60),
            max_entries: 8,
            max_object_size: 64,
            max_total_size: 256,
        }
    }

    fn ok(value: &str) -> Result<String, Infallible> {
        Ok(value.to_owned())
    }

    /// JSON size of a string is its length plus two quotes.
    fn sized(n: usize) -> String {
        "x".repeat(n - 2)
    }

    #[test]
    fn hit_does_not_rerun_producer() {
        let cache = TtlCache::new(limits());
        let key = CacheKey::new("report");
        let calls = AtomicUsize::new(0);

        for _ in 0..5 {
            let value = cache
                .fetch(&key, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    ok("first")
                })
                .unwrap();
            assert_eq!(value, "first");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits, 4);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn expired_entry_reruns_producer() {
        let cache = TtlCache::new(CacheLimits {
            ttl: Duration::from_millis(30),
            ..limits()
        });
        let key = CacheKey::new("report");

        assert_eq!(cache.fetch(&key, || ok("old")).unwrap(), "old");
        assert_eq!(cache.fetch(&key, || ok("unused")).unwrap(), "old");

        thread::sleep(Duration::from_millis(80));

        assert_eq!(cache.fetch(&key, || ok("new")).unwrap(), "new");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_size(), "\"new\"".len());
    }

    #[test]
    fn producer_error_leaves_cache_unchanged() {
        let cache: TtlCache<String> = TtlCache::new(limits());
        let key = CacheKey::new("report");

        let result: Result<String, &str> = cache.fetch(&key, || Err("device busy"));
        assert_eq!(result, Err("device busy"));
        assert!(cache.is_empty());

        assert_eq!(cache.fetch(&key, || ok("later")).unwrap(), "later");
    }

    #[test]
    fn oversized_value_is_returned_but_not_stored() {
        let cache = TtlCache::new(limits());
        let key = CacheKey::new("big");
        let big = sized(65);

        assert_eq!(cache.fetch(&key, || ok(&big)).unwrap(), big);
        assert!(cache.is_empty());
        assert_eq!(cache.total_size(), 0);
        assert_eq!(cache.stats().rejected, 1);

        // Exactly at the limit is fine.
        assert!(cache.insert(&CacheKey::new("edge"), sized(64)));
    }

    #[test]
    fn aggregate_limit_evicts_oldest_first() {
        let cache = TtlCache::new(limits());
        for name in ["a", "b", "c", "d"] {
            assert!(cache.insert(&CacheKey::new(name), sized(60)));
        }
        assert_eq!(cache.total_size(), 240);

        // Reads do not protect an entry from eviction.
        assert!(cache.get(&CacheKey::new("a")).is_some());

        assert!(cache.insert(&CacheKey::new("e"), sized(40)));
        assert!(cache.get(&CacheKey::new("a")).is_none());
        assert!(cache.get(&CacheKey::new("b")).is_some());
        assert_eq!(cache.total_size(), 220);

        assert!(cache.insert(&CacheKey::new("f"), sized(64)));
        assert!(cache.get(&CacheKey::new("b")).is_none());
        assert!(cache.get(&CacheKey::new("c")).is_some());
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.total_size(), 224);
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn entry_count_limit_evicts_oldest_first() {
        let cache = TtlCache::new(CacheLimits {
            max_entries: 2,
            ..limits()
        });
        cache.insert(&CacheKey::new("a"), "1".to_owned());
        cache.insert(&CacheKey::new("b"), "2".to_owned());
        cache.insert(&CacheKey::new("c"), "3".to_owned());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&CacheKey::new("a")).is_none());
        assert_eq!(cache.get(&CacheKey::new("c")).as_deref(), Some("3"));
    }

    #[test]
    fn reinsert_replaces_and_moves_to_back() {
        let cache = TtlCache::new(CacheLimits {
            max_entries: 2,
            ..limits()
        });
        cache.insert(&CacheKey::new("a"), "1".to_owned());
        cache.insert(&CacheKey::new("b"), "2".to_owned());
        cache.insert(&CacheKey::new("a"), "one".to_owned());
        cache.insert(&CacheKey::new("c"), "3".to_owned());

        assert_eq!(cache.get(&CacheKey::new("a")).as_deref(), Some("one"));
        assert!(cache.get(&CacheKey::new("b")).is_none());
        assert_eq!(cache.total_size(), "\"one\"".len() + "\"3\"".len());
    }

    #[test]
    fn keys_capture_every_parameter() {
        let all = CacheKey::new("parameters").with("level", "admin");
        let grouped = CacheKey::new("parameters")
            .with_opt("group", Some("Network"))
            .with("level", "admin");
        let empty_group = CacheKey::new("parameters")
            .with_opt("group", Some(""))
            .with("level", "admin");
        let viewer = CacheKey::new("parameters")
            .with_opt("group", Some("Network"))
            .with("level", "viewer");

        let keys = [&all, &grouped, &empty_group, &viewer];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(grouped.as_str(), "parameters?group=Network&level=admin");
        assert_ne!(
            CacheKey::new("p").with("a&b", "c"),
            CacheKey::new("p").with("a", "b&c")
        );
    }

    #[test]
    fn clear_empties_cache() {
        let cache = TtlCache::new(limits());
        cache.insert(&CacheKey::new("a"), "1".to_owned());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_size(), 0);
    }

    #[test]
    fn concurrent_fetches_keep_accounting_consistent() {
        let cache = TtlCache::new(CacheLimits {
            max_entries: 16,
            max_object_size: 64,
            max_total_size: 400,
            ttl: Duration::from_secs(60),
        });
        let calls = AtomicUsize::new(0);

        thread::scope(|s| {
            for t in 0..8 {
                let cache = &cache;
                let calls = &calls;
                s.spawn(move || {
                    for i in 0..50 {
                        let key = CacheKey::new("k").with("n", (t * 7 + i) % 24);
                        let value = cache
                            .fetch(&key, || {
                                calls.fetch_add(1, Ordering::SeqCst);
                                ok(&sized(20 + (i % 30)))
                            })
                            .unwrap();
                        assert!(!value.is_empty());
                    }
                });
            }
        });

        let inner = cache.lock();
        let sum: usize = inner.entries.values().map(|e| e.size).sum();
        assert_eq!(sum, inner.total_size);
        assert!(inner.total_size <= 400);
        assert!(inner.entries.len() <= 16);
        assert!(calls.load(Ordering::SeqCst) >= 24);
    }

    #[test]
    fn same_key_herd_stays_consistent() {
        let cache = TtlCache::new(limits());
        let key = CacheKey::new("report");

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| cache.fetch(&key, || ok("same")).unwrap());
            }
        });

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_size(), "\"same\"".len());
    }
}
