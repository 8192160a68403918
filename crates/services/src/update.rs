use std::sync::Arc;

use tokio::sync::Mutex;

use vocab_core::model::VocabRecord;

use crate::cache::CacheManager;
use crate::error::UpdateCheckError;
use crate::loader::VocabLoader;

/// Successful result of an explicit update check.
///
/// Together with `UpdateCheckError::CheckFailed` this forms the three
/// disjoint user-visible outcomes: updated, already current, check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The data file changed; the cache entry was overwritten and the
    /// records reloaded. The session should be reset with these.
    Updated { records: Vec<VocabRecord> },
    /// Entity tags match; nothing was touched.
    AlreadyCurrent,
}

/// User-triggered staleness check for the vocabulary data file.
pub struct UpdateService {
    cache: Arc<CacheManager>,
    loader: Arc<VocabLoader>,
    // Held for the duration of a check; a second trigger is rejected rather
    // than queued, matching a disabled refresh control.
    pending: Mutex<()>,
}

impl UpdateService {
    #[must_use]
    pub fn new(cache: Arc<CacheManager>, loader: Arc<VocabLoader>) -> Self {
        Self {
            cache,
            loader,
            pending: Mutex::new(()),
        }
    }

    /// Compare the live data file's entity tag against the cached copy's.
    ///
    /// A differing tag, or the absence of any cached copy, triggers a full
    /// data reload and overwrites the cached entry with the fresh response.
    ///
    /// # Errors
    ///
    /// Returns `UpdateCheckError::CheckFailed` if the network fetch fails
    /// (never to be conflated with `AlreadyCurrent`), or
    /// `UpdateCheckError::AlreadyRunning` if a check is still in flight.
    pub async fn check_for_update(&self) -> Result<UpdateOutcome, UpdateCheckError> {
        let _guard = self
            .pending
            .try_lock()
            .map_err(|_| UpdateCheckError::AlreadyRunning)?;

        let fetched = self
            .cache
            .fetch_data_no_store()
            .await
            .map_err(UpdateCheckError::CheckFailed)?;

        let cached = self.cache.cached(&fetched.path).await;
        let current = match &cached {
            Some(entry) => entry.etag == fetched.etag,
            None => false,
        };

        if current {
            tracing::info!(etag = ?fetched.etag, "data file already current");
            return Ok(UpdateOutcome::AlreadyCurrent);
        }

        tracing::info!(
            old_etag = ?cached.and_then(|entry| entry.etag),
            new_etag = ?fetched.etag,
            "data file changed, reloading"
        );
        let records = self.loader.load().await;
        self.cache.store_fetched(&fetched).await;

        Ok(UpdateOutcome::Updated { records })
    }
}
