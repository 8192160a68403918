use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by cache storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for one cached resource.
///
/// Entries live inside a named cache version and are keyed by resource path;
/// a put overwrites the previous entry for the same key atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResource {
    pub path: String,
    pub body: Vec<u8>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
    pub stored_at: DateTime<Utc>,
}

impl CachedResource {
    /// Interprets the body as UTF-8 text, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Repository contract for the versioned offline cache.
///
/// Each method is a single-key operation; there is no cross-key transaction
/// and callers tolerate last-writer-wins between concurrent put paths.
#[async_trait]
pub trait CacheRepository: Send + Sync {
    /// Store or overwrite one entry inside a cache version.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn put_entry(&self, version: &str, resource: &CachedResource)
    -> Result<(), StorageError>;

    /// Fetch one entry by version and path, `None` on miss.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures, never for a miss.
    async fn get_entry(
        &self,
        version: &str,
        path: &str,
    ) -> Result<Option<CachedResource>, StorageError>;

    /// List the names of every stored cache version.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn list_versions(&self) -> Result<Vec<String>, StorageError>;

    /// Delete a whole cache version, returning the number of removed entries.
    ///
    /// Deleting a version that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend failures.
    async fn delete_version(&self, version: &str) -> Result<u64, StorageError>;
}

/// Simple in-memory cache backend for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<(String, String), CachedResource>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl CacheRepository for InMemoryRepository {
    async fn put_entry(
        &self,
        version: &str,
        resource: &CachedResource,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            (version.to_owned(), resource.path.clone()),
            resource.clone(),
        );
        Ok(())
    }

    async fn get_entry(
        &self,
        version: &str,
        path: &str,
    ) -> Result<Option<CachedResource>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(version.to_owned(), path.to_owned())).cloned())
    }

    async fn list_versions(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut versions: Vec<String> = guard.keys().map(|(v, _)| v.clone()).collect();
        versions.sort();
        versions.dedup();
        Ok(versions)
    }

    async fn delete_version(&self, version: &str) -> Result<u64, StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|(v, _), _| v != version);
        Ok((before - guard.len()) as u64)
    }
}

/// Aggregates the cache repository behind a trait object for backend swapping.
#[derive(Clone)]
pub struct CacheStore {
    pub entries: Arc<dyn CacheRepository>,
}

impl CacheStore {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let entries: Arc<dyn CacheRepository> = Arc::new(repo);
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn resource(path: &str, body: &str, etag: Option<&str>) -> CachedResource {
        CachedResource {
            path: path.to_owned(),
            body: body.as_bytes().to_vec(),
            etag: etag.map(str::to_owned),
            content_type: Some("text/csv".to_owned()),
            stored_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn put_overwrites_entry_for_same_key() {
        let repo = InMemoryRepository::new();
        repo.put_entry("flashcard-v1", &resource("/vocab.csv", "old", Some("v1")))
            .await
            .unwrap();
        repo.put_entry("flashcard-v1", &resource("/vocab.csv", "new", Some("v2")))
            .await
            .unwrap();

        let fetched = repo
            .get_entry("flashcard-v1", "/vocab.csv")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.body_text(), "new");
        assert_eq!(fetched.etag.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn miss_is_none_not_an_error() {
        let repo = InMemoryRepository::new();
        let fetched = repo.get_entry("flashcard-v1", "/missing").await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn delete_version_removes_only_that_version() {
        let repo = InMemoryRepository::new();
        repo.put_entry("flashcard-v0", &resource("/index.html", "a", None))
            .await
            .unwrap();
        repo.put_entry("flashcard-v1", &resource("/index.html", "b", None))
            .await
            .unwrap();

        let removed = repo.delete_version("flashcard-v0").await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.list_versions().await.unwrap(), vec!["flashcard-v1"]);
        assert!(
            repo.get_entry("flashcard-v1", "/index.html")
                .await
                .unwrap()
                .is_some()
        );
    }
}
