use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored response, keyed by its request URL within a named cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub cached_at: DateTime<Utc>,
}

/// Named request→response caches, invalidated wholesale by deleting a cache.
///
/// Cache names are listed in creation order, and lookups without a cache name
/// search every cache in that order.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Create the named cache if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cache cannot be created.
    async fn open(&self, cache: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn cache_names(&self) -> Result<Vec<String>, StorageError>;

    /// Delete a cache and all of its entries. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete_cache(&self, cache: &str) -> Result<bool, StorageError>;

    /// Look up `url` across all caches.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn match_request(&self, url: &str) -> Result<Option<CachedResponse>, StorageError>;

    /// Look up `url` in one cache only.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn match_in(
        &self,
        cache: &str,
        url: &str,
    ) -> Result<Option<CachedResponse>, StorageError>;

    /// Store or replace one entry, creating the cache when needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be written.
    async fn put(&self, cache: &str, response: CachedResponse) -> Result<(), StorageError>;

    /// Store all entries or none of them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any entry cannot be written; nothing is kept then.
    async fn put_all(
        &self,
        cache: &str,
        responses: Vec<CachedResponse>,
    ) -> Result<(), StorageError>;
}

type Bucket = HashMap<String, CachedResponse>;

/// Simple in-memory cache store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryCacheStore {
    caches: Arc<Mutex<Vec<(String, Bucket)>>>,
}

impl InMemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            caches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_caches<T>(
        &self,
        f: impl FnOnce(&mut Vec<(String, Bucket)>) -> T,
    ) -> Result<T, StorageError> {
        let mut guard = self
            .caches
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(f(&mut guard))
    }
}

fn bucket_mut<'a>(caches: &'a mut Vec<(String, Bucket)>, cache: &str) -> &'a mut Bucket {
    let pos = match caches.iter().position(|(name, _)| name == cache) {
        Some(pos) => pos,
        None => {
            caches.push((cache.to_string(), HashMap::new()));
            caches.len() - 1
        }
    };
    &mut caches[pos].1
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn open(&self, cache: &str) -> Result<(), StorageError> {
        self.with_caches(|caches| {
            bucket_mut(caches, cache);
        })
    }

    async fn cache_names(&self) -> Result<Vec<String>, StorageError> {
        self.with_caches(|caches| caches.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn delete_cache(&self, cache: &str) -> Result<bool, StorageError> {
        self.with_caches(|caches| {
            let before = caches.len();
            caches.retain(|(name, _)| name != cache);
            caches.len() != before
        })
    }

    async fn match_request(&self, url: &str) -> Result<Option<CachedResponse>, StorageError> {
        self.with_caches(|caches| {
            caches
                .iter()
                .find_map(|(_, bucket)| bucket.get(url).cloned())
        })
    }

    async fn match_in(
        &self,
        cache: &str,
        url: &str,
    ) -> Result<Option<CachedResponse>, StorageError> {
        self.with_caches(|caches| {
            caches
                .iter()
                .find(|(name, _)| name == cache)
                .and_then(|(_, bucket)| bucket.get(url).cloned())
        })
    }

    async fn put(&self, cache: &str, response: CachedResponse) -> Result<(), StorageError> {
        self.with_caches(|caches| {
            bucket_mut(caches, cache).insert(response.url.clone(), response);
        })
    }

    async fn put_all(
        &self,
        cache: &str,
        responses: Vec<CachedResponse>,
    ) -> Result<(), StorageError> {
        // A single lock makes the batch atomic for readers.
        self.with_caches(|caches| {
            let bucket = bucket_mut(caches, cache);
            for response in responses {
                bucket.insert(response.url.clone(), response);
            }
        })
    }
}

/// Aggregates the storage backends behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub caches: Arc<dyn CacheStore>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn response(url: &str, body: &str) -> CachedResponse {
        CachedResponse {
            url: url.to_string(),
            status: 200,
            content_type: Some("text/plain".into()),
            body: body.as_bytes().to_vec(),
            cached_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn caches_are_listed_in_creation_order() {
        let store = InMemoryCacheStore::new();
        store.open("quiz-game-v1").await.unwrap();
        store.open("quiz-game-v2").await.unwrap();
        store.open("quiz-game-v1").await.unwrap();
        assert_eq!(
            store.cache_names().await.unwrap(),
            vec!["quiz-game-v1".to_string(), "quiz-game-v2".to_string()]
        );
    }

    #[tokio::test]
    async fn match_request_searches_every_cache() {
        let store = InMemoryCacheStore::new();
        store.put("old", response("http://h/a", "old")).await.unwrap();
        store.put("new", response("http://h/b", "new")).await.unwrap();

        let hit = store.match_request("http://h/b").await.unwrap().unwrap();
        assert_eq!(hit.body, b"new".to_vec());
        assert!(store.match_in("old", "http://h/b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_cache_drops_entries() {
        let store = InMemoryCacheStore::new();
        store
            .put_all(
                "v1",
                vec![response("http://h/a", "a"), response("http://h/b", "b")],
            )
            .await
            .unwrap();
        assert!(store.delete_cache("v1").await.unwrap());
        assert!(!store.delete_cache("v1").await.unwrap());
        assert!(store.match_request("http://h/a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_existing_entry() {
        let store = InMemoryCacheStore::new();
        store.put("v1", response("http://h/a", "one")).await.unwrap();
        store.put("v1", response("http://h/a", "two")).await.unwrap();
        let hit = store.match_in("v1", "http://h/a").await.unwrap().unwrap();
        assert_eq!(hit.body, b"two".to_vec());
    }
}
