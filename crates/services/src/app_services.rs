use std::sync::Arc;

use storage::CacheStore;
use vocab_core::Clock;

use crate::cache::CacheManager;
use crate::error::{AppServicesError, UpdateCheckError};
use crate::fetcher::{HttpFetcher, ResourceFetcher};
use crate::loader::VocabLoader;
use crate::sessions::SessionService;
use crate::update::{UpdateOutcome, UpdateService};

/// Assembles the cache, loader and update services over one backing store.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    cache: Arc<CacheManager>,
    loader: Arc<VocabLoader>,
    updates: Arc<UpdateService>,
}

impl AppServices {
    /// Build services backed by `SQLite` cache storage and an HTTP fetcher.
    ///
    /// Installs the asset manifest (best-effort; an offline start serves
    /// from whatever was cached before) and prunes stale cache versions.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if cache storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        base_url: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let store = CacheStore::sqlite(db_url).await?;
        let fetcher: Arc<dyn ResourceFetcher> = Arc::new(HttpFetcher::new(base_url, clock));
        Ok(Self::assemble(store, fetcher, clock).await)
    }

    /// Build services over an explicit store and fetcher (tests, alternate
    /// backends). Performs the same install/activate pass as `new_sqlite`.
    pub async fn assemble(
        store: CacheStore,
        fetcher: Arc<dyn ResourceFetcher>,
        clock: Clock,
    ) -> Self {
        let cache = Arc::new(CacheManager::new(store.entries, fetcher, clock));
        cache.install().await;
        cache.activate().await;

        let loader = Arc::new(VocabLoader::new(Arc::clone(&cache)));
        let updates = Arc::new(UpdateService::new(
            Arc::clone(&cache),
            Arc::clone(&loader),
        ));

        Self {
            clock,
            cache,
            loader,
            updates,
        }
    }

    #[must_use]
    pub fn cache(&self) -> Arc<CacheManager> {
        Arc::clone(&self.cache)
    }

    #[must_use]
    pub fn loader(&self) -> Arc<VocabLoader> {
        Arc::clone(&self.loader)
    }

    #[must_use]
    pub fn updates(&self) -> Arc<UpdateService> {
        Arc::clone(&self.updates)
    }

    /// Load the data set and start a fresh session over it.
    pub async fn start_session(&self) -> SessionService {
        let records = self.loader.load().await;
        SessionService::new(records, self.clock)
    }

    /// Run the user-triggered update check.
    ///
    /// # Errors
    ///
    /// Returns `UpdateCheckError` for a failed or already-running check.
    pub async fn check_for_updates(&self) -> Result<UpdateOutcome, UpdateCheckError> {
        self.updates.check_for_update().await
    }

    /// Unconditionally re-fetch and re-store the whole asset manifest.
    ///
    /// Returns the number of entries refreshed.
    pub async fn refresh_cache(&self) -> usize {
        self.cache.refresh_manifest().await
    }
}
