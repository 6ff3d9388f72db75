use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{CachedResponse, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn status_to_i64(status: u16) -> i64 {
    i64::from(status)
}

pub(crate) fn map_entry_row(row: &SqliteRow) -> Result<CachedResponse, StorageError> {
    let status: i64 = row.try_get("status").map_err(ser)?;
    let status = u16::try_from(status)
        .map_err(|_| StorageError::Serialization(format!("invalid status: {status}")))?;
    let cached_at: DateTime<Utc> = row.try_get("cached_at").map_err(ser)?;

    Ok(CachedResponse {
        url: row.try_get("url").map_err(ser)?,
        status,
        content_type: row.try_get("content_type").map_err(ser)?,
        body: row.try_get("body").map_err(ser)?,
        cached_at,
    })
}
