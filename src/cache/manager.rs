//! Namespaced TTL cache over a key-value substrate.
//!
//! Every operation is best-effort: substrate failures and corrupt entries
//! are logged and degraded to "absent"/no-op, never propagated. The cache
//! is a local mirror of API data, not a source of truth.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::store::KeyValueStore;

/// Namespace prefix separating cache entries from anything else sharing
/// the substrate.
pub const DEFAULT_PREFIX: &str = "citycache_";

/// A cached payload with its creation time and optional time-to-live.
/// An entry is expired once `now - created_at` exceeds its TTL; entries
/// without a TTL never expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub ttl_ms: Option<i64>,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, ttl: Option<Duration>) -> Self {
        Self {
            data,
            created_at: Utc::now(),
            ttl_ms: ttl.map(|d| d.as_millis() as i64),
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.ttl_ms {
            Some(ttl_ms) => (Utc::now() - self.created_at).num_milliseconds() > ttl_ms,
            None => false,
        }
    }
}

/// TTL-aware key-value cache under a fixed namespace prefix.
pub struct LocalCache<S: KeyValueStore> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> LocalCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, DEFAULT_PREFIX)
    }

    pub fn with_prefix(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// The underlying substrate, e.g. for sharing it with other components.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Write an entry. Best-effort: serialization or substrate failures are
    /// logged and swallowed.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, ttl);
        let serialized = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize cache entry");
                return;
            }
        };
        if let Err(e) = self.store.write(&self.full_key(key), &serialized) {
            warn!(key, error = %e, "Failed to write cache entry");
        }
    }

    /// Read an entry. Returns `None` when missing, corrupt, or expired.
    /// Corrupt and expired entries are deleted as a side effect.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let full_key = self.full_key(key);
        let raw = match self.store.read(&full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read cache entry");
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) if entry.is_expired() => {
                debug!(key, "Cache entry expired");
                self.delete_quiet(&full_key);
                None
            }
            Ok(entry) => Some(entry.data),
            Err(e) => {
                warn!(key, error = %e, "Removing corrupt cache entry");
                self.delete_quiet(&full_key);
                None
            }
        }
    }

    /// Delete an entry if present; no-op otherwise.
    pub fn remove(&self, key: &str) {
        self.delete_quiet(&self.full_key(key));
    }

    /// Whether `get` would return a present value. An existing-but-expired
    /// entry reports `false` (and is deleted, like any observed-expired entry).
    pub fn has(&self, key: &str) -> bool {
        self.get::<serde_json::Value>(key).is_some()
    }

    /// Sweep the namespace, deleting expired and corrupt entries and leaving
    /// valid ones (including TTL-less permanent entries) untouched.
    ///
    /// No background timer here: callers run this opportunistically, e.g.
    /// when connectivity is restored.
    pub fn clean_expired(&self) {
        for full_key in self.namespace_keys() {
            let raw = match self.store.read(&full_key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key = %full_key, error = %e, "Failed to read entry during sweep");
                    continue;
                }
            };
            match serde_json::from_str::<CacheEntry<serde_json::Value>>(&raw) {
                Ok(entry) if entry.is_expired() => {
                    debug!(key = %full_key, "Sweeping expired cache entry");
                    self.delete_quiet(&full_key);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(key = %full_key, error = %e, "Sweeping corrupt cache entry");
                    self.delete_quiet(&full_key);
                }
            }
        }
    }

    /// Delete every entry whose (un-prefixed) key contains `fragment`.
    /// Used for coarse invalidation when the exact keys are unknown.
    pub fn remove_matching(&self, fragment: &str) {
        for full_key in self.namespace_keys() {
            if full_key[self.prefix.len()..].contains(fragment) {
                self.delete_quiet(&full_key);
            }
        }
    }

    /// Delete every entry under the namespace unconditionally.
    pub fn clear(&self) {
        for full_key in self.namespace_keys() {
            self.delete_quiet(&full_key);
        }
    }

    /// Approximate total serialized byte length of all entries under the
    /// namespace. Informational only.
    pub fn size(&self) -> usize {
        let mut total = 0;
        for full_key in self.namespace_keys() {
            if let Ok(Some(raw)) = self.store.read(&full_key) {
                total += raw.len();
            }
        }
        total
    }

    fn namespace_keys(&self) -> Vec<String> {
        match self.store.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&self.prefix))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Failed to enumerate cache keys");
                Vec::new()
            }
        }
    }

    fn delete_quiet(&self, full_key: &str) {
        if let Err(e) = self.store.delete(full_key) {
            warn!(key = %full_key, error = %e, "Failed to delete cache entry");
        }
    }
}
