use std::sync::Arc;

use bfly_store::RecordStore;
use bfly_types::{IdGenerator, ShortIdGenerator};

/// Shared handler state: the record store and the id source.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub ids: Arc<dyn IdGenerator>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// State with random short ids.
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self::new(store, Arc::new(ShortIdGenerator))
    }
}
