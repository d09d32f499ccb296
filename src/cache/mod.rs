//! Local caching module for offline data access.
//!
//! A namespaced, TTL-aware key-value cache over a pluggable storage
//! substrate. API services write fetched payloads here with
//! per-resource TTLs and read them back when the network is down or a
//! request fails.
//!
//! The substrate is deliberately dumb: a synchronous string store with
//! whole-entry overwrite semantics. Expiry is lazy (on read) plus an
//! explicit `clean_expired` sweep the caller schedules.

pub mod manager;
pub mod store;

pub use manager::{CacheEntry, LocalCache, DEFAULT_PREFIX};
pub use store::{FileStore, KeyValueStore, MemoryStore};
