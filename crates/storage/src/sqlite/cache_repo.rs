use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, Sqlite, Transaction};

use super::SqliteCacheStore;
use super::mapping::{map_entry_row, status_to_i64};
use crate::repository::{CacheStore, CachedResponse, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

async fn ensure_cache(tx: &mut Transaction<'_, Sqlite>, name: &str) -> Result<i64, StorageError> {
    sqlx::query(
        r"
        INSERT INTO caches (name, created_at)
        VALUES (?1, ?2)
        ON CONFLICT(name) DO NOTHING
        ",
    )
    .bind(name)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(conn)?;

    let row = sqlx::query("SELECT id FROM caches WHERE name = ?1")
        .bind(name)
        .fetch_one(&mut **tx)
        .await
        .map_err(conn)?;
    row.try_get("id")
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

async fn upsert_entry(
    tx: &mut Transaction<'_, Sqlite>,
    cache_id: i64,
    response: CachedResponse,
) -> Result<(), StorageError> {
    sqlx::query(
        r"
        INSERT INTO cache_entries (cache_id, url, status, content_type, body, cached_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(cache_id, url) DO UPDATE SET
            status = excluded.status,
            content_type = excluded.content_type,
            body = excluded.body,
            cached_at = excluded.cached_at
        ",
    )
    .bind(cache_id)
    .bind(response.url)
    .bind(status_to_i64(response.status))
    .bind(response.content_type)
    .bind(response.body)
    .bind(response.cached_at)
    .execute(&mut **tx)
    .await
    .map_err(conn)?;
    Ok(())
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn open(&self, cache: &str) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        ensure_cache(&mut tx, cache).await?;
        tx.commit().await.map_err(conn)
    }

    async fn cache_names(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT name FROM caches ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        rows.iter()
            .map(|row| {
                row.try_get("name")
                    .map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .collect()
    }

    async fn delete_cache(&self, cache: &str) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        sqlx::query(
            r"
            DELETE FROM cache_entries
            WHERE cache_id IN (SELECT id FROM caches WHERE name = ?1)
            ",
        )
        .bind(cache)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;
        let res = sqlx::query("DELETE FROM caches WHERE name = ?1")
            .bind(cache)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        tx.commit().await.map_err(conn)?;
        Ok(res.rows_affected() > 0)
    }

    async fn match_request(&self, url: &str) -> Result<Option<CachedResponse>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT e.url, e.status, e.content_type, e.body, e.cached_at
            FROM cache_entries e
            JOIN caches c ON c.id = e.cache_id
            WHERE e.url = ?1
            ORDER BY c.id
            LIMIT 1
            ",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_entry_row).transpose()
    }

    async fn match_in(
        &self,
        cache: &str,
        url: &str,
    ) -> Result<Option<CachedResponse>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT e.url, e.status, e.content_type, e.body, e.cached_at
            FROM cache_entries e
            JOIN caches c ON c.id = e.cache_id
            WHERE c.name = ?1 AND e.url = ?2
            ",
        )
        .bind(cache)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_entry_row).transpose()
    }

    async fn put(&self, cache: &str, response: CachedResponse) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let cache_id = ensure_cache(&mut tx, cache).await?;
        upsert_entry(&mut tx, cache_id, response).await?;
        tx.commit().await.map_err(conn)
    }

    async fn put_all(
        &self,
        cache: &str,
        responses: Vec<CachedResponse>,
    ) -> Result<(), StorageError> {
        // Dropping the transaction on error rolls back every entry.
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let cache_id = ensure_cache(&mut tx, cache).await?;
        for response in responses {
            upsert_entry(&mut tx, cache_id, response).await?;
        }
        tx.commit().await.map_err(conn)
    }
}
