//! In-process expiring key/value store.
//!
//! Backs the verification-code lookup (`encrypted code -> user id`). Expiry is
//! evaluated lazily against an injected [`Clock`] so tests can move time
//! forward without sleeping.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use dashmap::DashMap;
use mockable::Clock;

use crate::types::Timestamp;

struct Entry<V> {
    value: V,
    expires_at: Timestamp,
}

/// A concurrent map whose entries vanish once their lifetime elapses.
///
/// An entry written at `t` with lifetime `ttl` is readable while
/// `now < t + ttl` and gone from then on.
pub struct TtlCache<V> {
    entries: DashMap<String, Entry<V>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        let now = self.clock.utc();
        let expires_at = now.checked_add_signed(ttl).unwrap_or(Timestamp::MAX_UTC);
        self.entries.insert(key.into(), Entry { value, expires_at });
    }

    /// Read a live entry. Expired entries are evicted on access.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.utc();
        let live = self.entries.get(key).and_then(|entry| {
            if entry.expires_at > now {
                Some(entry.value.clone())
            } else {
                None
            }
        });
        if live.is_none() {
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        live
    }

    /// Remove and return a live entry.
    pub fn take(&self, key: &str) -> Option<V> {
        let now = self.clock.utc();
        self.entries
            .remove(key)
            .and_then(|(_, entry)| (entry.expires_at > now).then_some(entry.value))
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.utc();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
