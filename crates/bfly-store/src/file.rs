use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use bfly_types::{Collection, IdGenerator, Record, ShortIdGenerator};
use tracing::{debug, info, warn};

use crate::document::StoreDocument;
use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// Record store backed by a single JSON document on disk.
///
/// The whole document is loaded at open time and rewritten in full on
/// every append. The rewrite goes to a temporary file in the same directory
/// which is then renamed over the target, so readers of the file never see
/// a half-written document.
pub struct JsonFileStore {
    path: PathBuf,
    doc: RwLock<StoreDocument>,
}

impl JsonFileStore {
    /// Load the store at `path`.
    ///
    /// A missing file is created holding an empty document. A file that
    /// exists but does not parse is an error.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_ids(path, &ShortIdGenerator)
    }

    /// Like [`JsonFileStore::open`], drawing ids for records stored without
    /// one from `ids`. The file is rewritten when any id was filled in.
    pub fn open_with_ids(path: impl AsRef<Path>, ids: &dyn IdGenerator) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let mut doc: StoreDocument =
                serde_json::from_str(&raw).map_err(|e| StoreError::Malformed {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            let assigned = doc.assign_missing_ids(ids);
            if assigned > 0 {
                write_document(&path, &doc)?;
                info!(path = %path.display(), assigned, "assigned ids to stored records");
            }
            info!(
                path = %path.display(),
                butterflies = doc.butterflies.len(),
                users = doc.users.len(),
                ratings = doc.ratings.len(),
                "loaded store"
            );
            doc
        } else {
            warn!(path = %path.display(), "store file missing; starting empty");
            let doc = StoreDocument::default();
            write_document(&path, &doc)?;
            doc
        };

        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    /// Replace whatever is at `path` with `doc` and open it.
    pub fn create(path: impl AsRef<Path>, doc: StoreDocument) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        write_document(&path, &doc)?;
        info!(path = %path.display(), records = doc.total(), "created store");
        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Atomically replace the file at `path` with the pretty-printed `doc`.
fn write_document(path: &Path, doc: &StoreDocument) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let data =
        serde_json::to_vec_pretty(doc).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(&data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    debug!(path = %path.display(), bytes = data.len(), "persisted store");
    Ok(())
}

impl RecordStore for JsonFileStore {
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
        let collection = record.collection();
        // The write guard spans mutate + persist: appends are serialized.
        let mut doc = self.doc.write().map_err(|_| StoreError::LockPoisoned)?;
        doc.push(record.clone())?;

        if let Err(e) = write_document(&self.path, &doc) {
            doc.pop(collection);
            warn!(collection = %collection, id = %record.id(), error = %e, "persist failed; append rolled back");
            return Err(e);
        }

        debug!(collection = %collection, id = %record.id(), "appended record");
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

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish()
    }
}
