//! TTL caching for screening results and sanctions decisions.
//!
//! Keys are always the canonical lowercase address form. Expiry is passive:
//! entries are dropped when a read finds them stale, and callers may run
//! [`TtlCache::purge_expired`] periodically. The worst outcome of any race
//! here is a harmless duplicate recomputation, so a plain read-write lock
//! around the map is sufficient; no lock is ever held across an await of
//! an external call.

use crate::types::ScreeningResult;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// A TTL-keyed in-memory store.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fetch a live entry. A stale entry is removed on the spot.
    pub async fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Stale: upgrade to a write lock and drop it.
        self.entries.write().await.remove(key);
        None
    }

    pub async fn insert(&self, key: String, value: V) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Point eviction. Returns true if the key was present (live or stale).
    pub async fn remove(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Drop every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Basic hit/miss/key-count statistics for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Read-through cache of completed screening results.
///
/// The `cached` flag on returned results is set here, never by the
/// aggregator: a hit is returned verbatim apart from that flag.
pub struct ScreeningCache {
    inner: TtlCache<ScreeningResult>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ScreeningCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: TtlCache::new(ttl),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(&self, key: &str) -> Option<ScreeningResult> {
        match self.inner.get(key).await {
            Some(mut result) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                result.cached = true;
                Some(result)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Write-through after a fresh pipeline run.
    pub async fn insert(&self, key: String, result: ScreeningResult) {
        self.inner.insert(key, result).await;
    }

    pub async fn remove(&self, key: &str) -> bool {
        self.inner.remove(key).await
    }

    pub async fn clear(&self) {
        self.inner.clear().await;
    }

    pub async fn purge_expired(&self) -> usize {
        self.inner.purge_expired().await
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.inner.len().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1).await;
        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("b").await, None);
    }

    #[tokio::test]
    async fn test_expiry_is_passive() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(30));
        cache.insert("a".to_string(), 1).await;
        assert_eq!(cache.get("a").await, Some(1));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.get("a").await, None);
        // The stale read evicted the entry
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_point_eviction_leaves_other_keys() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1).await;
        cache.insert("b".to_string(), 2).await;

        assert!(cache.remove("a").await);
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("b").await, Some(2));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(30));
        cache.insert("a".to_string(), 1).await;
        cache.insert("b".to_string(), 2).await;

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.purge_expired().await, 2);
        assert!(cache.is_empty().await);
    }
}
