//! Cookie-session backed [`SelectionStorage`].

use actix_session::Session;
use serde_json::Value;

use crate::store::storage::{STORE_NAME, SelectionStorage, StorageError};

/// Stores the selection record in the user's session under [`STORE_NAME`].
pub struct SessionStorage<'a> {
    session: &'a Session,
}

impl<'a> SessionStorage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }
}

impl SelectionStorage for SessionStorage<'_> {
    fn load(&self) -> Result<Option<Value>, StorageError> {
        self.session
            .get::<Value>(STORE_NAME)
            .map_err(|e| StorageError::Read(e.to_string()))
    }

    fn save(&self, value: Value) -> Result<(), StorageError> {
        self.session
            .insert(STORE_NAME, value)
            .map_err(|e| StorageError::Write(e.to_string()))
    }
}
