use std::future::Future;

use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbBackend, QueryResult, Statement, Value,
};
use sea_orm_migration::MigratorTrait;
use tokio::runtime::Handle;

use super::migrator::Migrator;
use super::{Result, Store, StoreError};
use crate::constants::DEFAULT_COLLECTION_ID;
use crate::models::{Collection, HistoryEntry, SavedRequest};

/// Postgres-backed store. The `Store` trait is synchronous, so each call
/// parks the current worker thread while the query runs on the runtime that
/// opened the connection (requires the multi-threaded runtime).
pub struct PostgresStore {
    db: DatabaseConnection,
    handle: Handle,
}

impl PostgresStore {
    /// Connect using `DATABASE_URL`. A `.env` file in the working directory
    /// is read first; variables already set in the environment win.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").map_err(|_| StoreError::MissingDatabaseUrl)?;
        Self::connect(&url)
    }

    pub fn connect(url: &str) -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        let db = tokio::task::block_in_place(|| {
            handle.block_on(async {
                let db = Database::connect(url).await?;
                tracing::info!("Running database migrations...");
                Migrator::up(&db, None).await?;
                Ok::<_, sea_orm::DbErr>(db)
            })
        })?;
        Ok(PostgresStore { db, handle })
    }

    fn block_on<F: Future>(&self, fut: F) -> F::Output {
        tokio::task::block_in_place(|| self.handle.block_on(fut))
    }

    fn statement(sql: &str, values: Vec<Value>) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }

    fn insert_returning_id(&self, sql: &str, values: Vec<Value>) -> Result<i64> {
        let row = self.block_on(self.db.query_one(Self::statement(sql, values)))?;
        match row {
            Some(row) => Ok(row.try_get("", "id")?),
            None => Err(StoreError::Database(sea_orm::DbErr::RecordNotInserted)),
        }
    }

    fn execute(&self, sql: &str, values: Vec<Value>) -> Result<u64> {
        let result = self.block_on(self.db.execute(Self::statement(sql, values)))?;
        Ok(result.rows_affected())
    }

    fn query_all(&self, sql: &str, values: Vec<Value>) -> Result<Vec<QueryResult>> {
        Ok(self.block_on(self.db.query_all(Self::statement(sql, values)))?)
    }
}

fn request_from_row(row: &QueryResult) -> Result<SavedRequest> {
    Ok(SavedRequest {
        id: row.try_get("", "id")?,
        name: row.try_get("", "name")?,
        url: row.try_get("", "url")?,
        method: row.try_get("", "method")?,
        headers: row.try_get("", "headers")?,
        body: row.try_get("", "body")?,
        collection_id: row.try_get("", "collection_id")?,
    })
}

fn history_from_row(row: &QueryResult) -> Result<HistoryEntry> {
    let status_code: i32 = row.try_get("", "status_code")?;
    Ok(HistoryEntry {
        id: row.try_get("", "id")?,
        url: row.try_get("", "url")?,
        method: row.try_get("", "method")?,
        status_code: u16::try_from(status_code).unwrap_or_default(),
        duration_ms: row.try_get("", "duration_ms")?,
        timestamp: row.try_get("", "timestamp")?,
    })
}

impl Store for PostgresStore {
    fn save_request(&mut self, request: &SavedRequest) -> Result<i64> {
        if request.id == 0 {
            return self.insert_returning_id(
                "INSERT INTO requests (name, url, method, headers, body, collection_id)
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
                vec![
                    request.name.clone().into(),
                    request.url.clone().into(),
                    request.method.clone().into(),
                    request.headers.clone().into(),
                    request.body.clone().into(),
                    request.collection_id.into(),
                ],
            );
        }

        self.execute(
            "UPDATE requests SET name = $1, url = $2, method = $3, headers = $4, body = $5, collection_id = $6
             WHERE id = $7",
            vec![
                request.name.clone().into(),
                request.url.clone().into(),
                request.method.clone().into(),
                request.headers.clone().into(),
                request.body.clone().into(),
                request.collection_id.into(),
                request.id.into(),
            ],
        )?;
        Ok(request.id)
    }

    fn get_all_requests(&self) -> Result<Vec<SavedRequest>> {
        self.query_all(
            "SELECT id, name, url, method, headers, body, COALESCE(collection_id, $1) AS collection_id
             FROM requests ORDER BY name, id",
            vec![DEFAULT_COLLECTION_ID.into()],
        )?
        .iter()
        .map(request_from_row)
        .collect()
    }

    fn delete_request(&mut self, id: i64) -> Result<()> {
        self.execute("DELETE FROM requests WHERE id = $1", vec![id.into()])?;
        Ok(())
    }

    fn get_collections(&self) -> Result<Vec<Collection>> {
        self.query_all(
            "SELECT id, name, description FROM collections ORDER BY id",
            Vec::new(),
        )?
        .iter()
        .map(|row| {
            Ok(Collection {
                id: row.try_get("", "id")?,
                name: row.try_get("", "name")?,
                description: row.try_get("", "description")?,
            })
        })
        .collect()
    }

    fn save_collection(&mut self, collection: &Collection) -> Result<i64> {
        if collection.id == 0 {
            return self.insert_returning_id(
                "INSERT INTO collections (name, description) VALUES ($1, $2) RETURNING id",
                vec![
                    collection.name.clone().into(),
                    collection.description.clone().into(),
                ],
            );
        }

        self.execute(
            "UPDATE collections SET name = $1, description = $2 WHERE id = $3",
            vec![
                collection.name.clone().into(),
                collection.description.clone().into(),
                collection.id.into(),
            ],
        )?;
        Ok(collection.id)
    }

    fn add_to_history(&mut self, entry: &HistoryEntry) -> Result<i64> {
        self.insert_returning_id(
            "INSERT INTO history (url, method, status_code, duration_ms, timestamp)
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
            vec![
                entry.url.clone().into(),
                entry.method.clone().into(),
                i32::from(entry.status_code).into(),
                entry.duration_ms.into(),
                entry.timestamp.into(),
            ],
        )
    }

    fn get_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.query_all(
            "SELECT id, url, method, status_code, duration_ms, timestamp
             FROM history ORDER BY timestamp DESC, id DESC LIMIT $1",
            vec![(limit as i64).into()],
        )?
        .iter()
        .map(history_from_row)
        .collect()
    }

    fn prune_history(&mut self, keep: usize) -> Result<()> {
        let removed = self.execute(
            "DELETE FROM history WHERE id NOT IN (
                SELECT id FROM history ORDER BY timestamp DESC, id DESC LIMIT $1
             )",
            vec![(keep as i64).into()],
        )?;
        if removed > 0 {
            tracing::debug!(removed, keep, "Pruned history");
        }
        Ok(())
    }
}
