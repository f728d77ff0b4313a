// Frequency-based side-cache used in front of the backing store.
// Bounded capacity, least-frequently-used eviction, manual invalidation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::debug;

// Counters for cache observability
#[derive(Debug, Default)]
struct CacheStats {
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
    insert_count: AtomicUsize,
    update_count: AtomicUsize,
    eviction_count: AtomicUsize,
}

// Point-in-time snapshot of the counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsReport {
    pub hit_count: usize,
    pub miss_count: usize,
    pub insert_count: usize,
    pub update_count: usize,
    pub eviction_count: usize,
}

struct Entry<V> {
    value: V,
    frequency: u64,
    // Monotonic insertion stamp; ties on frequency evict the oldest insert.
    inserted_at: u64,
}

struct Entries<V> {
    map: HashMap<String, Entry<V>>,
    next_seq: u64,
}

/// Bounded `String -> V` cache with least-frequently-used eviction.
///
/// Every entry carries an access counter, set to 1 on insertion and
/// incremented on each `get` hit and each `put` over an existing key. When a
/// `put` would exceed the fixed capacity, the entry with the lowest counter is
/// evicted; among equal counters the oldest-inserted entry loses.
///
/// A single coarse lock guards the entry map, so the read-plus-increment of
/// `get` and the evict-then-insert of `put` are each atomic with respect to
/// concurrent callers. All methods take `&self`; instances are shared as
/// process-wide singletons.
pub struct FrequencyCache<V> {
    capacity: usize,
    entries: Mutex<Entries<V>>,
    stats: CacheStats,
}

impl<V: Clone> FrequencyCache<V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; the `len <= capacity` invariant cannot
    /// hold for an empty bound.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            capacity,
            entries: Mutex::new(Entries {
                map: HashMap::new(),
                next_seq: 0,
            }),
            stats: CacheStats::default(),
        }
    }

    /// Returns the cached value for `key`, bumping its access frequency.
    ///
    /// A miss is a normal outcome for read-through callers, never an error.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.map.get_mut(key) {
            Some(entry) => {
                entry.frequency += 1;
                self.stats.hit_count.fetch_add(1, Ordering::Relaxed);
                debug!(key, frequency = entry.frequency, "cache hit");
                Some(entry.value.clone())
            }
            None => {
                self.stats.miss_count.fetch_add(1, Ordering::Relaxed);
                debug!(key, "cache miss");
                None
            }
        }
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// An update counts as an access, so recently written keys are protected
    /// from eviction the same way recently read ones are. Inserting a new key
    /// at capacity evicts exactly one least-frequently-used entry first.
    pub fn put(&self, key: &str, value: V) {
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.map.get_mut(key) {
            entry.value = value;
            entry.frequency += 1;
            self.stats.update_count.fetch_add(1, Ordering::Relaxed);
            debug!(key, frequency = entry.frequency, "cache entry updated");
            return;
        }

        if entries.map.len() >= self.capacity {
            self.evict_least_frequent(&mut entries.map);
        }

        let inserted_at = entries.next_seq;
        entries.next_seq += 1;
        entries.map.insert(
            key.to_string(),
            Entry {
                value,
                frequency: 1,
                inserted_at,
            },
        );
        self.stats.insert_count.fetch_add(1, Ordering::Relaxed);
        debug!(key, "cache entry added");
    }

    /// Deletes the entry for `key` if present; absent keys are a no-op.
    pub fn remove(&self, key: &str) {
        let mut entries = self.entries.lock();
        if entries.map.remove(key).is_some() {
            debug!(key, "cache entry removed");
        }
    }

    /// Drops all entries unconditionally.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.map.clear();
        debug!("cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Presence check that does not count as an access.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().map.contains_key(key)
    }

    /// Current access frequency of `key`, if resident. Does not count as an
    /// access.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.entries.lock().map.get(key).map(|entry| entry.frequency)
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            hit_count: self.stats.hit_count.load(Ordering::Relaxed),
            miss_count: self.stats.miss_count.load(Ordering::Relaxed),
            insert_count: self.stats.insert_count.load(Ordering::Relaxed),
            update_count: self.stats.update_count.load(Ordering::Relaxed),
            eviction_count: self.stats.eviction_count.load(Ordering::Relaxed),
        }
    }

    // Caller holds the entry lock, so the scan and the removal are atomic
    // with respect to concurrent get/put/remove.
    fn evict_least_frequent(&self, map: &mut HashMap<String, Entry<V>>) {
        let victim = map
            .iter()
            .min_by_key(|(_, entry)| (entry.frequency, entry.inserted_at))
            .map(|(key, entry)| (key.clone(), entry.frequency));

        if let Some((key, frequency)) = victim {
            map.remove(&key);
            self.stats.eviction_count.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, frequency, "evicted least frequently used entry");
        }
    }
}
