// src/portfolio/cache.rs

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
struct CacheEntry {
    data: Value,
    expires_at: DateTime<Utc>,
}

/// Process-wide response cache with real TTL enforcement: an entry past its
/// `expires_at` is never served, regardless of when it gets evicted.
#[derive(Clone, Default)]
pub struct TtlCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Utc::now() => Some(entry.data.clone()),
            _ => None,
        }
    }

    pub async fn set(&self, key: &str, value: Value, ttl_seconds: u64) {
        let expires_at = Utc::now() + Duration::seconds(ttl_seconds as i64);
        let mut entries = self.entries.write().await;
        // Piggyback eviction of dead entries on writes
        let now = Utc::now();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            CacheEntry {
                data: value,
                expires_at,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn entries_are_served_within_ttl() {
        let cache = TtlCache::new();
        cache.set("k", json!({"symbol": "TOK"}), 60).await;
        assert_eq!(cache.get("k").await, Some(json!({"symbol": "TOK"})));
    }

    #[tokio::test]
    async fn expired_entries_are_not_served() {
        let cache = TtlCache::new();
        cache.set("k", json!(1), 0).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn missing_keys_return_none() {
        let cache = TtlCache::new();
        assert_eq!(cache.get("absent").await, None);
    }
}
