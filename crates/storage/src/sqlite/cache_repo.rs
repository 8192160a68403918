use sqlx::Row;

use super::{SqliteRepository, mapping::map_entry_row};
use crate::repository::{CacheRepository, CachedResource, StorageError};

#[async_trait::async_trait]
impl CacheRepository for SqliteRepository {
    async fn put_entry(
        &self,
        version: &str,
        resource: &CachedResource,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO cache_entries (version, path, body, etag, content_type, stored_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(version, path) DO UPDATE SET
                body = excluded.body,
                etag = excluded.etag,
                content_type = excluded.content_type,
                stored_at = excluded.stored_at
            ",
        )
        .bind(version)
        .bind(&resource.path)
        .bind(&resource.body)
        .bind(&resource.etag)
        .bind(&resource.content_type)
        .bind(resource.stored_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_entry(
        &self,
        version: &str,
        path: &str,
    ) -> Result<Option<CachedResource>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT path, body, etag, content_type, stored_at
            FROM cache_entries
            WHERE version = ?1 AND path = ?2
            ",
        )
        .bind(version)
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_entry_row).transpose()
    }

    async fn list_versions(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT DISTINCT version FROM cache_entries ORDER BY version
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter()
            .map(|row| {
                row.try_get("version")
                    .map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .collect()
    }

    async fn delete_version(&self, version: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE version = ?1")
            .bind(version)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
