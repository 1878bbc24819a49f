//! Response cache for provider lookups
//!
//! Entries carry their own time-to-live; an expired entry is treated as a
//! miss and dropped on access. Capacity is bounded by LRU eviction.

use lru::LruCache;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Time-to-live per route family
pub mod ttl {
    use std::time::Duration;

    pub const SONGS: Duration = Duration::from_secs(300);
    pub const SEARCH: Duration = Duration::from_secs(180);
    pub const ARTISTS: Duration = Duration::from_secs(600);
}

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

pub struct ResponseCache {
    entries: Mutex<LruCache<String, Entry>>,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return serde_json::from_value(entry.value.clone()).ok();
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }

    pub fn insert<T: Serialize>(&self, key: impl Into<String>, value: &T, ttl: Duration) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key.into(), entry);
    }

    /// Return the cached value or fetch it. `None` results are not cached.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: String, ttl: Duration, fetch: F) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        if let Some(hit) = self.get(&key) {
            return Some(hit);
        }

        let value = fetch().await?;
        self.insert(key, &value, ttl);
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_before_expiry() {
        let cache = ResponseCache::new(4);
        cache.insert("song:1", &vec!["a".to_string()], Duration::from_secs(60));

        let hit: Option<Vec<String>> = cache.get("song:1");
        assert_eq!(hit, Some(vec!["a".to_string()]));
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = ResponseCache::new(4);
        cache.insert("song:1", &1_u32, Duration::ZERO);

        assert_eq!(cache.get::<u32>("song:1"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let cache = ResponseCache::new(2);
        cache.insert("a", &1_u32, Duration::from_secs(60));
        cache.insert("b", &2_u32, Duration::from_secs(60));
        assert_eq!(cache.get::<u32>("a"), Some(1));
        cache.insert("c", &3_u32, Duration::from_secs(60));

        assert_eq!(cache.get::<u32>("b"), None);
        assert_eq!(cache.get::<u32>("a"), Some(1));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let cache = ResponseCache::new(4);

        let miss: Option<u32> = cache
            .get_or_fetch("song:x".to_string(), ttl::SONGS, || async { None })
            .await;
        assert_eq!(miss, None);
        assert!(cache.is_empty());

        let fetched = cache
            .get_or_fetch("song:y".to_string(), ttl::SONGS, || async { Some(7_u32) })
            .await;
        assert_eq!(fetched, Some(7));

        // Served from cache: the fetcher would return something else
        let cached = cache
            .get_or_fetch("song:y".to_string(), ttl::SONGS, || async { Some(8_u32) })
            .await;
        assert_eq!(cached, Some(7));
    }
}
