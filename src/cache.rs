//! Time-bounded cache owned by the caller
//!
//! Entries expire `ttl` after insertion. Time is always passed in, so the
//! cache never reads the clock itself.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
  value: V,
  inserted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
  ttl: Duration,
  entries: HashMap<K, CacheEntry<V>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl,
      entries: HashMap::new(),
    }
  }

  fn is_fresh(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
    now - entry.inserted_at < self.ttl
  }

  /// Expired entries read as misses
  pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<&V> {
    self
      .entries
      .get(key)
      .filter(|entry| self.is_fresh(entry, now))
      .map(|entry| &entry.value)
  }

  pub fn insert(&mut self, key: K, value: V, now: DateTime<Utc>) {
    self.entries.insert(
      key,
      CacheEntry {
        value,
        inserted_at: now,
      },
    );
  }

  pub fn invalidate(&mut self, key: &K) -> Option<V> {
    self.entries.remove(key).map(|entry| entry.value)
  }

  /// Drop expired entries, returning how many were removed
  pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
    let ttl = self.ttl;
    let before = self.entries.len();
    self.entries.retain(|_, entry| now - entry.inserted_at < ttl);
    before - self.entries.len()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
