//! Persistence for saved requests, collections and history
//!
//! Backends:
//! - **SQLite** (default feature `sqlite`): single file under `~/.config/trext`
//! - **PostgreSQL** (feature `postgres`): connection string from `DATABASE_URL`,
//!   optionally loaded from a `.env` file

#[cfg(test)]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod migrator;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use crate::config::ConfigError;
use crate::models::{Collection, HistoryEntry, SavedRequest};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[cfg(feature = "postgres")]
    #[error("database: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[cfg(feature = "postgres")]
    #[error("DATABASE_URL is not set (export it or add it to a .env file)")]
    MissingDatabaseUrl,
    #[cfg(feature = "postgres")]
    #[error("the postgres store must be opened inside a tokio runtime")]
    NoRuntime,
    #[error("failed to create data directory: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// CRUD over the three tables. Upserts are keyed on id: 0 inserts, anything
/// else updates that row.
pub trait Store: Send {
    fn save_request(&mut self, request: &SavedRequest) -> Result<i64>;
    /// All saved requests, ordered by name
    fn get_all_requests(&self) -> Result<Vec<SavedRequest>>;
    /// Deleting an id that doesn't exist is not an error
    fn delete_request(&mut self, id: i64) -> Result<()>;

    fn get_collections(&self) -> Result<Vec<Collection>>;
    fn save_collection(&mut self, collection: &Collection) -> Result<i64>;

    fn add_to_history(&mut self, entry: &HistoryEntry) -> Result<i64>;
    /// Most recent first
    fn get_history(&self, limit: usize) -> Result<Vec<HistoryEntry>>;
    /// Drop all but the `keep` most recent history rows
    fn prune_history(&mut self, keep: usize) -> Result<()>;
}

/// Open the store for this build: Postgres when that feature is on,
/// otherwise the SQLite file in the app directory.
pub fn open_default() -> Result<Box<dyn Store>> {
    #[cfg(feature = "postgres")]
    {
        let store = PostgresStore::from_env()?;
        tracing::info!("Opened postgres store");
        return Ok(Box::new(store));
    }

    #[cfg(all(feature = "sqlite", not(feature = "postgres")))]
    {
        let dir = crate::config::app_dir()?;
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(crate::constants::DATA_FILE);
        let store = SqliteStore::open(&path)?;
        tracing::info!(path = %path.display(), "Opened sqlite store");
        return Ok(Box::new(store));
    }

    #[cfg(not(any(feature = "sqlite", feature = "postgres")))]
    compile_error!("enable at least one storage backend: `sqlite` or `postgres`");
}
