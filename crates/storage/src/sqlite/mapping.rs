use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{CachedResource, StorageError};

/// Maps one `cache_entries` row to the persisted resource shape.
pub(super) fn map_entry_row(row: &SqliteRow) -> Result<CachedResource, StorageError> {
    let path: String = row
        .try_get("path")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let body: Vec<u8> = row
        .try_get("body")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let etag: Option<String> = row
        .try_get("etag")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let content_type: Option<String> = row
        .try_get("content_type")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    let stored_at: DateTime<Utc> = row
        .try_get("stored_at")
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

    Ok(CachedResource {
        path,
        body,
        etag,
        content_type,
        stored_at,
    })
}
