//! Vec-backed store for unit tests of the App layer

use super::{Result, Store, StoreError};
use crate::models::{Collection, HistoryEntry, SavedRequest};

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub requests: Vec<SavedRequest>,
    pub collections: Vec<Collection>,
    pub history: Vec<HistoryEntry>,
    /// Every write fails while set
    pub fail_writes: bool,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            collections: vec![Collection {
                id: 1,
                name: "Default".to_string(),
                description: "Default collection".to_string(),
            }],
            next_id: 1,
            ..Default::default()
        }
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Store for MemoryStore {
    fn save_request(&mut self, request: &SavedRequest) -> Result<i64> {
        self.check_write()?;
        if request.id == 0 {
            let mut request = request.clone();
            request.id = self.allocate_id();
            let id = request.id;
            self.requests.push(request);
            return Ok(id);
        }
        if let Some(existing) = self.requests.iter_mut().find(|r| r.id == request.id) {
            *existing = request.clone();
        }
        Ok(request.id)
    }

    fn get_all_requests(&self) -> Result<Vec<SavedRequest>> {
        let mut all = self.requests.clone();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    fn delete_request(&mut self, id: i64) -> Result<()> {
        self.check_write()?;
        self.requests.retain(|r| r.id != id);
        Ok(())
    }

    fn get_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.collections.clone())
    }

    fn save_collection(&mut self, collection: &Collection) -> Result<i64> {
        self.check_write()?;
        if collection.id == 0 {
            let mut collection = collection.clone();
            collection.id = self.allocate_id();
            let id = collection.id;
            self.collections.push(collection);
            return Ok(id);
        }
        if let Some(existing) = self.collections.iter_mut().find(|c| c.id == collection.id) {
            *existing = collection.clone();
        }
        Ok(collection.id)
    }

    fn add_to_history(&mut self, entry: &HistoryEntry) -> Result<i64> {
        self.check_write()?;
        let mut entry = entry.clone();
        entry.id = self.allocate_id();
        let id = entry.id;
        self.history.push(entry);
        Ok(id)
    }

    fn get_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut all = self.history.clone();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        all.truncate(limit);
        Ok(all)
    }

    fn prune_history(&mut self, keep: usize) -> Result<()> {
        self.check_write()?;
        let kept = self.get_history(keep)?;
        self.history.retain(|h| kept.iter().any(|k| k.id == h.id));
        Ok(())
    }
}
