//! Bounded in-memory cache of rendered PNGs.
//!
//! Entries are keyed by a SHA-256 of the uploaded bytes and the resolved
//! render parameters, so the key doubles as a strong ETag.

use axum::body::Bytes;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A rendered result ready to be served
#[derive(Debug, Clone)]
pub struct CachedRender {
    /// Encoded PNG bytes
    pub png_bytes: Bytes,
    /// Palette the image was rendered with, as hex strings
    pub palette: Vec<String>,
    /// When this result was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

struct CacheState {
    entries: HashMap<String, CachedRender>,
    /// Keys by recency of use (least recent first)
    order: Vec<String>,
}

/// LRU cache for rendered results
pub struct ResultCache {
    state: Mutex<CacheState>,
    max_entries: usize,
}

impl ResultCache {
    /// A capacity of zero disables caching.
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: Vec::new(),
            }),
            max_entries,
        }
    }

    /// Compute the cache key for an input image and parameter fingerprint.
    pub fn key(input: &[u8], fingerprint: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(fingerprint.as_bytes());
        hasher.update(b"|");
        hasher.update(input);
        let result = hasher.finalize();
        // First 16 bytes of hash, encoded as 32 hex characters
        hex::encode(&result[..16])
    }

    /// Retrieve a cached result, marking it as recently used.
    pub async fn get(&self, key: &str) -> Option<CachedRender> {
        let mut state = self.state.lock().await;
        let entry = state.entries.get(key)?.clone();
        state.order.retain(|k| k != key);
        state.order.push(key.to_string());
        Some(entry)
    }

    /// Store a result, evicting the least recently used entries when full.
    pub async fn store(&self, key: String, render: CachedRender) {
        if self.max_entries == 0 {
            return;
        }
        let mut state = self.state.lock().await;
        if state.entries.contains_key(&key) {
            state.order.retain(|k| k != &key);
        } else {
            while state.entries.len() >= self.max_entries && !state.order.is_empty() {
                let oldest = state.order.remove(0);
                state.entries.remove(&oldest);
                tracing::debug!(
                    key = %oldest,
                    cache_size = state.entries.len(),
                    "Result cache: evicted oldest entry"
                );
            }
        }

        state.entries.insert(key.clone(), render);
        state.order.push(key);
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(tag: u8) -> CachedRender {
        CachedRender {
            png_bytes: Bytes::from(vec![tag]),
            palette: vec!["#000000".to_string()],
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_key_depends_on_input_and_params() {
        let a = ResultCache::key(b"image", "px=50");
        assert_eq!(a.len(), 32);
        assert_eq!(a, ResultCache::key(b"image", "px=50"));
        assert_ne!(a, ResultCache::key(b"image", "px=40"));
        assert_ne!(a, ResultCache::key(b"other", "px=50"));
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let cache = ResultCache::new(4);
        assert!(cache.get("k").await.is_none());

        cache.store("k".to_string(), render(7)).await;
        let hit = cache.get("k").await.unwrap();
        assert_eq!(hit.png_bytes.as_ref(), &[7]);
    }

    #[tokio::test]
    async fn test_evicts_least_recently_used() {
        let cache = ResultCache::new(2);
        cache.store("a".to_string(), render(1)).await;
        cache.store("b".to_string(), render(2)).await;

        // Touch "a" so "b" becomes the eviction candidate
        cache.get("a").await;
        cache.store("c".to_string(), render(3)).await;

        assert_eq!(cache.len().await, 2);
        assert!(cache.get("a").await.is_some());
        assert!(cache.get("b").await.is_none());
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn test_replacing_entry_does_not_evict() {
        let cache = ResultCache::new(2);
        cache.store("a".to_string(), render(1)).await;
        cache.store("b".to_string(), render(2)).await;
        cache.store("a".to_string(), render(9)).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("a").await.unwrap().png_bytes.as_ref(), &[9]);
    }

    #[tokio::test]
    async fn test_zero_capacity_disables_cache() {
        let cache = ResultCache::new(0);
        cache.store("a".to_string(), render(1)).await;
        assert!(cache.is_empty().await);
    }
}
