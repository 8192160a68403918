#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{CacheRepository, CacheStore, CachedResource, StorageError};
pub use sqlite::SqliteInitError;
