#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{CacheStore, CachedResponse, InMemoryCacheStore, Storage, StorageError};
pub use sqlite::{SqliteCacheStore, SqliteInitError};
