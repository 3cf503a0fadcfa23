//! Client-side caching of slow-changing data.
//!
//! Values are stored as JSON envelopes `{ "value": ..., "stored_at": ... }`
//! in a string key/value [`Storage`], the same shape a browser's local
//! storage would hold. Entries older than the cache TTL read as missing and
//! are evicted on access.

pub mod menu;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FrontendError;

pub use menu::{MenuCache, MenuItem, MenuSource, SessionInfo};

/// String key/value persistence.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), FrontendError>;
    fn remove_item(&self, key: &str);
}

/// In-process storage with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: DashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes once keys plus values would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self { items: DashMap::new(), quota: Some(bytes) }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|entry| entry.key() != key)
            .map(|entry| entry.key().len() + entry.value().len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).map(|entry| entry.value().clone())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), FrontendError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(FrontendError::Storage(format!(
                    "quota exceeded writing {key} ({needed} of {quota} bytes)"
                )));
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.remove(key);
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T: Serialize> {
    value: &'a T,
    stored_at: DateTime<Utc>,
}

/// TTL cache over a shared [`Storage`]. Keys are namespaced with `prefix`.
pub struct TtlCache<S> {
    storage: Arc<S>,
    prefix: String,
    ttl: Duration,
}

impl<S: Storage> TtlCache<S> {
    pub fn new(storage: Arc<S>, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self { storage, prefix: prefix.into(), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// Reads `key` as of `now`. Expired or unreadable entries are removed.
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let full_key = self.full_key(key);
        let raw = self.storage.get_item(&full_key)?;

        let envelope: Envelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(key = %full_key, error = %err, "Discarding unreadable cache entry");
                self.storage.remove_item(&full_key);
                return None;
            }
        };

        let expired = match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => now.signed_duration_since(envelope.stored_at) >= ttl,
            Err(_) => false,
        };
        if expired {
            debug!(key = %full_key, stored_at = %envelope.stored_at, "Cache entry expired");
            self.storage.remove_item(&full_key);
            return None;
        }
        Some(envelope.value)
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), FrontendError> {
        self.put_at(key, value, Utc::now())
    }

    pub fn put_at<T: Serialize>(&self, key: &str, value: &T, now: DateTime<Utc>) -> Result<(), FrontendError> {
        let raw = serde_json::to_string(&EnvelopeRef { value, stored_at: now })?;
        self.storage.set_item(&self.full_key(key), &raw)
    }

    pub fn invalidate(&self, key: &str) {
        self.storage.remove_item(&self.full_key(key));
    }
}
