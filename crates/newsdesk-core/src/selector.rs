use std::sync::Arc;

use newsdesk_storage::{KeyValueStore, StorageError};

/// Storage key holding the id of the active desk.
pub const CURRENT_DESK_KEY: &str = "desks:currentDeskId";

/// Remembers which desk is active across sessions.
#[derive(Clone)]
pub struct CurrentDeskSelector {
    store: Arc<dyn KeyValueStore>,
}

impl CurrentDeskSelector {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The persisted desk id. An absent or empty value means none is selected.
    pub async fn current_desk_id(&self) -> Result<Option<String>, StorageError> {
        let value = self.store.get_item(CURRENT_DESK_KEY).await?;
        Ok(value.filter(|id| !id.is_empty()))
    }

    /// Persist `desk_id`, replacing any previous selection. `None` clears it.
    pub async fn set_current_desk_id(&self, desk_id: Option<&str>) -> Result<(), StorageError> {
        match desk_id.filter(|id| !id.is_empty()) {
            Some(id) => self.store.set_item(CURRENT_DESK_KEY, id).await,
            None => self.store.remove_item(CURRENT_DESK_KEY).await,
        }
    }
}
