//! Small TTL cache over `DashMap`, bounded by entry count.

use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Cached<V> {
    value: V,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct TtlCache<K: Eq + Hash, V> {
    entries: DashMap<K, Cached<V>>,
    max_entries: usize,
    max_age: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub fn new(max_entries: usize, max_age: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
            max_age,
        }
    }

    /// Value for `key` if it was stored less than `max_age` ago.
    pub fn get_fresh(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.fetched_at.elapsed() <= self.max_age {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(
            key,
            Cached {
                value,
                fetched_at: Instant::now(),
            },
        );
        self.prune();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired entries, then the oldest ones until within `max_entries`.
    pub fn prune(&self) {
        let now = Instant::now();
        let mut stamps: Vec<(K, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().fetched_at))
            .collect();

        stamps.retain(|(key, fetched_at)| {
            if now.duration_since(*fetched_at) > self.max_age {
                self.entries.remove(key);
                false
            } else {
                true
            }
        });

        if self.entries.len() <= self.max_entries {
            return;
        }
        stamps.sort_by_key(|(_, fetched_at)| *fetched_at);
        for (key, _) in stamps {
            if self.entries.len() <= self.max_entries {
                break;
            }
            self.entries.remove(&key);
        }
    }
}
