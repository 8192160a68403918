use std::sync::Arc;

use storage::repository::{CacheRepository, CachedResource};
use vocab_core::Clock;

use crate::error::{CacheServiceError, FetchError};
use crate::fetcher::{FetchedResource, ResourceFetcher};

/// Name of the live cache version. Bump on deployment to force a refresh;
/// `activate` prunes everything else.
pub const CACHE_VERSION: &str = "flashcard-v1";

/// Root-relative path of the vocabulary data file. The only resource served
/// network-first.
pub const DATA_PATH: &str = "/vocab.csv";

/// Fixed manifest of cacheable assets, established at install time.
#[must_use]
pub fn default_manifest() -> Vec<String> {
    [
        "/",
        "/index.html",
        "/css/style.css",
        "/js/app.js",
        DATA_PATH,
        "/images/icon-192.png",
        "/images/icon-512.png",
        "/manifest.json",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// Where a served resource came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Network,
    Cache,
}

/// A resource handed to the caller, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedResource {
    pub resource: CachedResource,
    pub served_from: ServedFrom,
}

/// Versioned offline cache over a repository and a network fetcher.
///
/// All operations are best-effort: a failing cache read degrades to a miss
/// and a failing cache write is logged and dropped. The only failure a
/// caller of [`CacheManager::fetch`] can see is a resource that is reachable
/// neither online nor offline.
pub struct CacheManager {
    version: String,
    manifest: Vec<String>,
    entries: Arc<dyn CacheRepository>,
    fetcher: Arc<dyn ResourceFetcher>,
    clock: Clock,
}

impl CacheManager {
    #[must_use]
    pub fn new(
        entries: Arc<dyn CacheRepository>,
        fetcher: Arc<dyn ResourceFetcher>,
        clock: Clock,
    ) -> Self {
        Self {
            version: CACHE_VERSION.to_owned(),
            manifest: default_manifest(),
            entries,
            fetcher,
            clock,
        }
    }

    /// Override the cache version name.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Override the asset manifest.
    #[must_use]
    pub fn with_manifest(mut self, manifest: Vec<String>) -> Self {
        self.manifest = manifest;
        self
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn manifest(&self) -> &[String] {
        &self.manifest
    }

    /// Eagerly fetch and store the whole manifest into the current version.
    ///
    /// Returns the number of entries stored. Per-entry failures are logged
    /// and skipped; an unreachable network simply leaves the cache as it was.
    pub async fn install(&self) -> usize {
        let stored = self.store_manifest().await;
        tracing::info!(version = %self.version, stored, "cache install complete");
        stored
    }

    /// Delete every stored cache version other than the current one.
    ///
    /// Guarantees at most one live version; errors are logged and swallowed.
    pub async fn activate(&self) {
        let versions = match self.entries.list_versions().await {
            Ok(versions) => versions,
            Err(err) => {
                tracing::warn!(error = %err, "could not list cache versions");
                return;
            }
        };

        for stale in versions.iter().filter(|name| **name != self.version) {
            match self.entries.delete_version(stale).await {
                Ok(removed) => {
                    tracing::info!(version = %stale, removed, "pruned stale cache version");
                }
                Err(err) => {
                    tracing::warn!(version = %stale, error = %err, "could not prune cache version");
                }
            }
        }
    }

    /// Serve one resource according to its fetch policy.
    ///
    /// The data file is network-first: a network success is stored back
    /// (overwriting) and returned; a network failure falls back to whatever
    /// cached copy exists. Everything else is cache-first: a cached copy is
    /// returned as-is, a miss goes to the network without being stored back.
    ///
    /// # Errors
    ///
    /// Returns `CacheServiceError::Unavailable` when both the network and
    /// the cache come up empty.
    pub async fn fetch(&self, path: &str) -> Result<ServedResource, CacheServiceError> {
        if path == DATA_PATH {
            self.fetch_network_first(path).await
        } else {
            self.fetch_cache_first(path).await
        }
    }

    async fn fetch_network_first(&self, path: &str) -> Result<ServedResource, CacheServiceError> {
        match self.fetcher.fetch(path).await {
            Ok(fetched) => {
                let resource = self.to_cached(&fetched);
                self.store(&resource).await;
                Ok(ServedResource {
                    resource,
                    served_from: ServedFrom::Network,
                })
            }
            Err(err) => {
                tracing::warn!(path, error = %err, "network fetch failed, trying cache");
                match self.cached(path).await {
                    Some(resource) => Ok(ServedResource {
                        resource,
                        served_from: ServedFrom::Cache,
                    }),
                    None => Err(CacheServiceError::Unavailable {
                        path: path.to_owned(),
                        source: err,
                    }),
                }
            }
        }
    }

    async fn fetch_cache_first(&self, path: &str) -> Result<ServedResource, CacheServiceError> {
        if let Some(resource) = self.cached(path).await {
            return Ok(ServedResource {
                resource,
                served_from: ServedFrom::Cache,
            });
        }

        match self.fetcher.fetch(path).await {
            Ok(fetched) => Ok(ServedResource {
                resource: self.to_cached(&fetched),
                served_from: ServedFrom::Network,
            }),
            Err(err) => Err(CacheServiceError::Unavailable {
                path: path.to_owned(),
                source: err,
            }),
        }
    }

    /// Fetch the data file bypassing intermediate caches.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network failure; the result is not stored.
    pub async fn fetch_data_no_store(&self) -> Result<FetchedResource, FetchError> {
        self.fetcher.fetch_no_store(DATA_PATH).await
    }

    /// Read one cached entry; storage failures degrade to a miss.
    pub async fn cached(&self, path: &str) -> Option<CachedResource> {
        match self.entries.get_entry(&self.version, path).await {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(path, error = %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Store one entry; failures are logged and dropped.
    pub async fn store(&self, resource: &CachedResource) {
        if let Err(err) = self.entries.put_entry(&self.version, resource).await {
            tracing::warn!(path = %resource.path, error = %err, "cache write failed");
        }
    }

    /// Store a network response as a cache entry.
    pub async fn store_fetched(&self, fetched: &FetchedResource) {
        let resource = self.to_cached(fetched);
        self.store(&resource).await;
    }

    /// Unconditionally re-fetch and re-store the entire manifest.
    ///
    /// This is the out-of-band "update" instruction; entity tags are ignored.
    /// Returns the number of entries stored.
    pub async fn refresh_manifest(&self) -> usize {
        let stored = self.store_manifest().await;
        tracing::info!(version = %self.version, stored, "cache manually updated");
        stored
    }

    async fn store_manifest(&self) -> usize {
        let mut stored = 0;
        for path in &self.manifest {
            match self.fetcher.fetch(path).await {
                Ok(fetched) => {
                    self.store_fetched(&fetched).await;
                    stored += 1;
                }
                Err(err) => {
                    tracing::warn!(path, error = %err, "could not fetch manifest entry");
                }
            }
        }
        stored
    }

    fn to_cached(&self, fetched: &FetchedResource) -> CachedResource {
        CachedResource {
            path: fetched.path.clone(),
            body: fetched.body.clone(),
            etag: fetched.etag.clone(),
            content_type: fetched.content_type.clone(),
            stored_at: self.clock.now(),
        }
    }
}
