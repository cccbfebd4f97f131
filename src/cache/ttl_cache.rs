use dashmap::DashMap;
use std::{hash::Hash, sync::Arc, time::Duration};
use tokio::time::Instant;
use tracing::debug;

/// Cache entry con TTL
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Concurrent key-value store whose entries disappear once their TTL elapses.
///
/// Clones share the same underlying map. Expired entries are dropped lazily
/// on [`TtlCache::get`] and eagerly by [`TtlCache::cleanup_expired`].
#[derive(Debug)]
pub struct TtlCache<K: Clone + Eq + Hash, V> {
    data: Arc<DashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// Inserts `value`, replacing any previous entry and restarting its TTL.
    pub fn set(&self, key: K, value: V, ttl: Duration) -> Option<V> {
        let entry = CacheEntry::new(value, ttl);
        self.data.insert(key, entry).map(|old| old.value)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.data.get(key) {
            if entry.is_expired(now) {
                drop(entry);
                // Another task may have re-set the key between the read and the remove.
                self.data.remove_if(key, |_, entry| entry.is_expired(now));
                None
            } else {
                Some(entry.value.clone())
            }
        } else {
            None
        }
    }

    /// Time left before `key` expires, if it is present and live.
    pub fn remaining_ttl(&self, key: &K) -> Option<Duration> {
        let now = Instant::now();
        self.data
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.expires_at - now)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.data
            .iter()
            .filter(|entry| !entry.value().is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Limpia entradas expiradas y retorna el número de elementos removidos
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.data.len();
        self.data.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.data.len());

        if removed > 0 {
            debug!("Limpiadas {} entradas expiradas del cache", removed);
        }

        removed
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for TtlCache<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl() {
        let cache: TtlCache<String, String> = TtlCache::new();
        cache.set("k".to_string(), "v".to_string(), HOUR);

        tokio::time::advance(HOUR - Duration::from_secs(1)).await;
        assert_eq!(cache.get(&"k".to_string()), Some("v".to_string()));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get(&"k".to_string()), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn set_restarts_ttl() {
        let cache: TtlCache<String, u32> = TtlCache::new();
        cache.set("k".to_string(), 1, HOUR);

        tokio::time::advance(Duration::from_secs(1800)).await;
        assert_eq!(cache.set("k".to_string(), 2, HOUR), Some(1));
        assert_eq!(cache.remaining_ttl(&"k".to_string()), Some(HOUR));

        tokio::time::advance(Duration::from_secs(2700)).await;
        assert_eq!(cache.get(&"k".to_string()), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_removes_only_expired() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new();
        cache.set("short", 1, Duration::from_secs(10));
        cache.set("long", 2, HOUR);

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"long"), Some(2));
    }

    #[test]
    fn clones_share_storage() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new();
        let other = cache.clone();
        other.set("k", 7, HOUR);
        assert_eq!(cache.get(&"k"), Some(7));
    }
}
