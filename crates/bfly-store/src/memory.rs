use std::sync::RwLock;

use bfly_types::{Collection, Record};
use tracing::debug;

use crate::document::StoreDocument;
use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// In-memory record store with no persistence.
///
/// Intended for tests and embedding. The document sits behind a `RwLock`;
/// records are cloned on the way in and out.
pub struct InMemoryStore {
    doc: RwLock<StoreDocument>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_document(StoreDocument::default())
    }

    /// Create a store pre-populated with `doc`.
    pub fn with_document(doc: StoreDocument) -> Self {
        Self {
            doc: RwLock::new(doc),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryStore {
    fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>> {
        let doc = self.doc.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(doc.find(collection, id))
    }

    fn filter(
        &self,
        collection: Collection,
        predicate: &dyn Fn(&Record) -> bool,
    ) -> StoreResult<Vec<Record>> {
        let doc = self.doc.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(doc.filter(collection, predicate))
    }

    fn append(&self, record: Record) -> StoreResult<Record> {
        let mut doc = self.doc.write().map_err(|_| StoreError::LockPoisoned)?;
        doc.push(record.clone())?;
        debug!(collection = %record.collection(), id = %record.id(), "appended record");
        Ok(record)
    }

    fn count(&self, collection: Collection) -> StoreResult<usize> {
        let doc = self.doc.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(doc.len(collection))
    }

    fn snapshot(&self) -> StoreResult<StoreDocument> {
        let doc = self.doc.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(doc.clone())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.doc.read().map(|d| d.total()).unwrap_or_default();
        f.debug_struct("InMemoryStore")
            .field("record_count", &total)
            .finish()
    }
}
