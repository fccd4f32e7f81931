use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Key/value cache with a per-entry deadline. Expired entries are never
/// returned and are dropped on the next read or purge.
pub struct TtlCache<K, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache { entries: DashMap::new(), ttl }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
        }

        // the entry may have been replaced since the guard was dropped
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.ttl);
    }

    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries.insert(key, Entry { value, expires_at });
    }

    pub fn invalidate(&self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let live = entry.expires_at > now;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("user-1/avatar.png".to_string(), "https://signed/1".to_string());

        assert_eq!(
            cache.get(&"user-1/avatar.png".to_string()),
            Some("https://signed/1".to_string())
        );
        assert_eq!(cache.get(&"user-2/avatar.png".to_string()), None);
    }

    #[test]
    fn test_expired_entries_are_not_returned() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert_with_ttl("key", 1, Duration::ZERO);

        assert_eq!(cache.get(&"key"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_read_keeps_a_fresh_replacement() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert_with_ttl("key", 1, Duration::ZERO);
        cache.insert("key", 2);

        assert_eq!(cache.get(&"key"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_purge_counts_only_removed_entries() {
        let cache: TtlCache<&str, i32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.purge_expired(), 0);

        cache.insert_with_ttl("stale", 1, Duration::ZERO);
        assert_eq!(cache.purge_expired(), 1);
        cache.insert("fresh", 2);
        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("key", 1);

        assert!(cache.invalidate(&"key"));
        assert!(!cache.invalidate(&"key"));
        assert_eq!(cache.get(&"key"), None);
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("live", 1);
        cache.insert_with_ttl("stale-a", 2, Duration::ZERO);
        cache.insert_with_ttl("stale-b", 3, Duration::ZERO);

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"live"), Some(1));
    }
}
