use std::sync::Arc;

use datepoll_core::{DatepollResult, EventBook, EventStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // No cached copy: the document is reloaded on every request so edits made
    // to the file while the server runs are picked up
    store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(store: impl EventStore + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &dyn EventStore {
        self.store.as_ref()
    }

    pub async fn book(&self) -> DatepollResult<EventBook> {
        EventBook::load(self.store()).await
    }

    pub async fn save(&self, book: &EventBook) -> DatepollResult<()> {
        book.save(self.store()).await
    }
}
