//! TTL cache on top of a raw key/value store.
//!
//! Values are wrapped in a `{timestamp, data}` envelope. Expiry is checked
//! when an entry is read: a stale entry is deleted and reported as a miss.
//! Nothing in here ever fails the caller; storage and decoding problems are
//! logged and degrade to a miss.

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::CacheTtls;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub timestamp: DateTime<Utc>,
    pub data: T,
}

#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
    ttls: CacheTtls,
}

impl CacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>, ttls: CacheTtls) -> Self {
        Self { store, ttls }
    }

    /// Cached value for `key`, or `None` on miss, expiry or any failure.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now()).await
    }

    async fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "discarding undecodable cache entry");
                self.evict(key).await;
                return None;
            }
        };

        let ttl = self.ttls.ttl_for(key);
        let age = now.signed_duration_since(entry.timestamp);
        let expired = match chrono::Duration::from_std(ttl) {
            Ok(ttl) => age > ttl,
            Err(_) => false,
        };
        if expired {
            debug!(key, age_secs = age.num_seconds(), "cache entry expired");
            self.evict(key).await;
            return None;
        }

        Some(entry.data)
    }

    /// Store `value` under `key` stamped with the current time.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        let entry = CacheEntry {
            timestamp: Utc::now(),
            data: value,
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "cache value not serializable");
                return;
            }
        };
        if let Err(e) = self.store.set(key, raw).await {
            warn!(key, error = %e, "cache write failed");
        }
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            warn!(key, error = %e, "cache delete failed");
        }
    }
}
