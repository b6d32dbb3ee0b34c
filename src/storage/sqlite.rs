use std::path::Path;

use rusqlite::{params, Connection, Row};

use super::{Result, Store};
use crate::constants::DEFAULT_COLLECTION_ID;
use crate::models::{Collection, HistoryEntry, SavedRequest};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS collections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    method TEXT NOT NULL,
    headers TEXT NOT NULL DEFAULT '{}',
    body TEXT NOT NULL DEFAULT '',
    collection_id INTEGER REFERENCES collections(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    method TEXT NOT NULL,
    status_code INTEGER NOT NULL,
    duration_ms INTEGER NOT NULL,
    timestamp INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_timestamp ON history (timestamp);
";

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO collections (id, name, description) VALUES (?1, 'Default', 'Default collection')",
            [DEFAULT_COLLECTION_ID],
        )?;
        Ok(())
    }
}

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<SavedRequest> {
    Ok(SavedRequest {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        method: row.get(3)?,
        headers: row.get(4)?,
        body: row.get(5)?,
        collection_id: row.get(6)?,
    })
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        url: row.get(1)?,
        method: row.get(2)?,
        status_code: row.get(3)?,
        duration_ms: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

impl Store for SqliteStore {
    fn save_request(&mut self, request: &SavedRequest) -> Result<i64> {
        if request.id == 0 {
            self.conn.execute(
                "INSERT INTO requests (name, url, method, headers, body, collection_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    request.name,
                    request.url,
                    request.method,
                    request.headers,
                    request.body,
                    request.collection_id
                ],
            )?;
            return Ok(self.conn.last_insert_rowid());
        }

        self.conn.execute(
            "UPDATE requests SET name = ?1, url = ?2, method = ?3, headers = ?4, body = ?5, collection_id = ?6
             WHERE id = ?7",
            params![
                request.name,
                request.url,
                request.method,
                request.headers,
                request.body,
                request.collection_id,
                request.id
            ],
        )?;
        Ok(request.id)
    }

    fn get_all_requests(&self) -> Result<Vec<SavedRequest>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, url, method, headers, body, COALESCE(collection_id, ?1)
             FROM requests ORDER BY name, id",
        )?;
        let rows = stmt.query_map([DEFAULT_COLLECTION_ID], request_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn delete_request(&mut self, id: i64) -> Result<()> {
        self.conn.execute("DELETE FROM requests WHERE id = ?1", [id])?;
        Ok(())
    }

    fn get_collections(&self) -> Result<Vec<Collection>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description FROM collections ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Collection {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn save_collection(&mut self, collection: &Collection) -> Result<i64> {
        if collection.id == 0 {
            self.conn.execute(
                "INSERT INTO collections (name, description) VALUES (?1, ?2)",
                params![collection.name, collection.description],
            )?;
            return Ok(self.conn.last_insert_rowid());
        }

        self.conn.execute(
            "UPDATE collections SET name = ?1, description = ?2 WHERE id = ?3",
            params![collection.name, collection.description, collection.id],
        )?;
        Ok(collection.id)
    }

    fn add_to_history(&mut self, entry: &HistoryEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO history (url, method, status_code, duration_ms, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.url,
                entry.method,
                entry.status_code,
                entry.duration_ms,
                entry.timestamp
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, method, status_code, duration_ms, timestamp
             FROM history ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], history_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn prune_history(&mut self, keep: usize) -> Result<()> {
        let removed = self.conn.execute(
            "DELETE FROM history WHERE id NOT IN (
                SELECT id FROM history ORDER BY timestamp DESC, id DESC LIMIT ?1
             )",
            [keep as i64],
        )?;
        if removed > 0 {
            tracing::debug!(removed, keep, "Pruned history");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HttpMethod, Request};
    use tempfile::NamedTempFile;

    fn ping() -> SavedRequest {
        let mut request = Request::new();
        request.name = "Ping".to_string();
        request.method = HttpMethod::POST;
        request.url = "https://api.example.com/ping".to_string();
        request.headers.insert("Authorization".to_string(), "Bearer t".to_string());
        request.body = r#"{"a":1}"#.to_string();
        SavedRequest::from_request(&request, DEFAULT_COLLECTION_ID)
    }

    fn history(url: &str, timestamp: i64) -> HistoryEntry {
        HistoryEntry {
            url: url.to_string(),
            method: "GET".to_string(),
            status_code: 200,
            duration_ms: 12,
            timestamp,
            ..Default::default()
        }
    }

    #[test]
    fn default_collection_exists() {
        let store = SqliteStore::open_in_memory().unwrap();
        let collections = store.get_collections().unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].id, DEFAULT_COLLECTION_ID);
        assert_eq!(collections[0].name, "Default");
    }

    #[test]
    fn reopening_keeps_single_default_collection() {
        let file = NamedTempFile::new().unwrap();
        drop(SqliteStore::open(file.path()).unwrap());
        let store = SqliteStore::open(file.path()).unwrap();
        assert_eq!(store.get_collections().unwrap().len(), 1);
    }

    #[test]
    fn saved_request_reads_back_equal() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let request = ping();
        let id = store.save_request(&request).unwrap();
        assert_ne!(id, 0);

        let all = store.get_all_requests().unwrap();
        assert_eq!(all.len(), 1);
        let loaded = &all[0];
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.name, request.name);
        assert_eq!(loaded.url, request.url);
        assert_eq!(loaded.method, request.method);
        assert_eq!(loaded.body, request.body);
        assert_eq!(loaded.collection_id, DEFAULT_COLLECTION_ID);
        assert_eq!(loaded.header_map(), request.header_map());
    }

    #[test]
    fn saving_existing_id_updates_in_place() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut request = ping();
        request.id = store.save_request(&request).unwrap();

        request.url = "https://api.example.com/v2/ping".to_string();
        assert_eq!(store.save_request(&request).unwrap(), request.id);
        request.body = "second".to_string();
        assert_eq!(store.save_request(&request).unwrap(), request.id);

        let all = store.get_all_requests().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].url, "https://api.example.com/v2/ping");
        assert_eq!(all[0].body, "second");
    }

    #[test]
    fn requests_are_ordered_by_name() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for name in ["users", "auth", "orders"] {
            let mut request = ping();
            request.name = name.to_string();
            store.save_request(&request).unwrap();
        }
        let names: Vec<_> = store
            .get_all_requests()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["auth", "orders", "users"]);
    }

    #[test]
    fn deleting_missing_id_is_ok() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let id = store.save_request(&ping()).unwrap();

        store.delete_request(id + 100).unwrap();
        assert_eq!(store.get_all_requests().unwrap().len(), 1);

        store.delete_request(id).unwrap();
        assert!(store.get_all_requests().unwrap().is_empty());
    }

    #[test]
    fn collections_upsert() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut collection = Collection::new("Billing", "invoices api");
        collection.id = store.save_collection(&collection).unwrap();
        assert_ne!(collection.id, DEFAULT_COLLECTION_ID);

        collection.name = "Billing v2".to_string();
        store.save_collection(&collection).unwrap();

        let collections = store.get_collections().unwrap();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[1].name, "Billing v2");
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.add_to_history(&history("https://a", 100)).unwrap();
        store.add_to_history(&history("https://b", 300)).unwrap();
        store.add_to_history(&history("https://c", 200)).unwrap();

        let urls: Vec<_> = store
            .get_history(10)
            .unwrap()
            .into_iter()
            .map(|h| h.url)
            .collect();
        assert_eq!(urls, ["https://b", "https://c", "https://a"]);
        assert_eq!(store.get_history(1).unwrap().len(), 1);
    }

    #[test]
    fn prune_keeps_newest_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for i in 0..5 {
            store.add_to_history(&history(&format!("https://h/{i}"), 1000 + i)).unwrap();
        }

        store.prune_history(2).unwrap();
        let kept = store.get_history(10).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].url, "https://h/4");
        assert_eq!(kept[1].url, "https://h/3");
    }

    #[test]
    fn data_survives_reopen() {
        let file = NamedTempFile::new().unwrap();
        let id = {
            let mut store = SqliteStore::open(file.path()).unwrap();
            store.save_request(&ping()).unwrap()
        };
        let store = SqliteStore::open(file.path()).unwrap();
        let all = store.get_all_requests().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
    }
}
