#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    ContentRepository, InMemoryRepository, ManifestEntry, ProgressKey, ProgressRepository,
    Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
