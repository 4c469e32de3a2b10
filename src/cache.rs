//! TTL cache

use std::hash::Hash;

use jiff::{SignedDuration, Timestamp};
use rustc_hash::FxHashMap;

use crate::clock::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Timestamp,
}

/// A cache service with an explicit time-to-live and an injected clock.
///
/// Constructed once per session and passed to consumers; there is no
/// module-level shared instance. Entries older than the TTL are evicted when
/// they are next read.
#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock> {
    entries: FxHashMap<K, CacheEntry<V>>,
    ttl: SignedDuration,
    clock: C,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    /// Create a cache backed by the system clock.
    #[must_use]
    pub fn new(ttl: SignedDuration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K: Eq + Hash, V, C: Clock> TtlCache<K, V, C> {
    /// Create a cache with the given TTL and clock.
    #[must_use]
    pub fn with_clock(ttl: SignedDuration, clock: C) -> Self {
        Self {
            entries: FxHashMap::default(),
            ttl,
            clock,
        }
    }

    /// Insert a value, stamping it with the clock's current time.
    ///
    /// Returns the previous value for the key, if it was still fresh.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let now = self.clock.now();
        let previous = self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
            },
        )?;

        self.is_fresh(&previous, now).then_some(previous.value)
    }

    /// Get the value for a key, evicting it first if it has expired.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(key)
            && !self.is_fresh(entry, now)
        {
            self.entries.remove(key);
        }

        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Drop every entry that has outlived the TTL.
    pub fn purge_expired(&mut self) {
        let now = self.clock.now();
        let ttl = self.ttl;

        self.entries
            .retain(|_, entry| now.duration_since(entry.stored_at) < ttl);
    }

    /// Drop every entry, fresh or not.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries currently held, including not-yet-evicted stale ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh<T>(&self, entry: &CacheEntry<T>, now: Timestamp) -> bool {
        now.duration_since(entry.stored_at) < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// A clock that only moves when told to.
    #[derive(Debug)]
    struct ManualClock(Cell<Timestamp>);

    impl ManualClock {
        fn new() -> Self {
            Self(Cell::new(Timestamp::UNIX_EPOCH))
        }

        fn advance(&self, duration: SignedDuration) {
            self.0.set(self.0.get() + duration);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            self.0.get()
        }
    }

    #[test]
    fn fresh_entries_are_returned() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(SignedDuration::from_secs(60), &clock);

        cache.insert("products", vec!["apples"]);

        assert_eq!(cache.get(&"products"), Some(&vec!["apples"]));
    }

    #[test]
    fn entries_expire_after_the_ttl() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(SignedDuration::from_secs(60), &clock);

        cache.insert("products", 1);
        clock.advance(SignedDuration::from_secs(61));

        assert_eq!(cache.get(&"products"), None);
        assert!(cache.is_empty(), "expired entry must be evicted on read");
    }

    #[test]
    fn entries_survive_up_to_the_ttl_boundary() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(SignedDuration::from_secs(60), &clock);

        cache.insert("products", 1);
        clock.advance(SignedDuration::from_secs(59));

        assert_eq!(cache.get(&"products"), Some(&1));
    }

    #[test]
    fn insert_refreshes_the_timestamp() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(SignedDuration::from_secs(60), &clock);

        cache.insert("products", 1);
        clock.advance(SignedDuration::from_secs(45));
        cache.insert("products", 2);
        clock.advance(SignedDuration::from_secs(45));

        assert_eq!(cache.get(&"products"), Some(&2));
    }

    #[test]
    fn insert_reports_stale_previous_value_as_absent() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(SignedDuration::from_secs(60), &clock);

        cache.insert("products", 1);
        clock.advance(SignedDuration::from_secs(120));

        assert_eq!(cache.insert("products", 2), None);
    }

    #[test]
    fn purge_expired_keeps_fresh_entries() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(SignedDuration::from_secs(60), &clock);

        cache.insert("old", 1);
        clock.advance(SignedDuration::from_secs(40));
        cache.insert("new", 2);
        clock.advance(SignedDuration::from_secs(30));

        cache.purge_expired();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"new"), Some(&2));
    }
}
