use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::CacheConfig;

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.default_ttl))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            config.max_capacity, config.default_ttl
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String) {
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn cache() -> Arc<dyn ObjectCache> {
        Arc::new(MokaCacheWrapper::new(&CacheConfig {
            default_ttl: 60,
            max_capacity: 100,
        }))
    }

    #[tokio::test]
    async fn test_typed_round_trip_and_remove() {
        let cache = cache();
        cache.insert("answer".to_string(), &vec![4, 2]).await;
        assert_eq!(cache.get::<Vec<i32>>("answer").await, CacheResult::Found(vec![4, 2]));

        cache.remove("answer").await;
        assert_eq!(cache.get::<Vec<i32>>("answer").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_dropped() {
        let cache = cache();
        cache.insert_raw("user:x".to_string(), "not json".to_string()).await;
        assert_eq!(cache.get::<Vec<i32>>("user:x").await, CacheResult::NotFound);
        assert_eq!(cache.get_raw("user:x").await, CacheResult::NotFound);
    }
}
