//! Shared error types for the services crate.

use thiserror::Error;

use storage::SqliteInitError;

/// Errors emitted by `ResourceFetcher` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("request for {path} failed with status {status}")]
    HttpStatus {
        path: String,
        status: reqwest::StatusCode,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `CacheManager::fetch`.
///
/// Cache read/write problems never surface here; they degrade to cache
/// misses. The only failure a caller sees is a resource that is available
/// neither from the network nor from the cache.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheServiceError {
    #[error("resource {path} unavailable: network failed and no cached copy exists")]
    Unavailable {
        path: String,
        #[source]
        source: FetchError,
    },
}

/// Errors emitted by the session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz already completed")]
    QuizCompleted,
    #[error("no questions available for quiz")]
    EmptyQuiz,
}

/// Errors emitted by the explicit update check.
///
/// `CheckFailed` is deliberately distinct from the `AlreadyCurrent` outcome:
/// a network failure during the check must never read as "no update".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UpdateCheckError {
    #[error("update check failed: {0}")]
    CheckFailed(#[source] FetchError),
    #[error("an update check is already running")]
    AlreadyRunning,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
