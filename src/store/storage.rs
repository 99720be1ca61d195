//! Persisted form of the selection and the storage seam it is written through.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::types::ClientId;
use crate::store::selection::ClientSelection;

/// Key under which the selection record is stored.
pub const STORE_NAME: &str = "recovery-admin.active-client";

/// Current layout of [`SelectionRecord`].
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("failed to read stored selection: {0}")]
    Read(String),
    #[error("failed to write stored selection: {0}")]
    Write(String),
    #[error("stored selection is incompatible: {0}")]
    Incompatible(String),
}

/// Serialized selection. Clients are referenced by id and re-read on load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    pub version: u32,
    pub active_client: Option<ClientId>,
    #[serde(default)]
    pub recent_clients: Vec<ClientId>,
}

impl SelectionRecord {
    pub fn from_selection(selection: &ClientSelection) -> Self {
        Self {
            version: STORE_VERSION,
            active_client: selection.active_client().map(|c| c.id.clone()),
            recent_clients: selection
                .recent_clients()
                .iter()
                .map(|c| c.id.clone())
                .collect(),
        }
    }

    pub fn to_value(&self) -> Result<Value, StorageError> {
        serde_json::to_value(self).map_err(|e| StorageError::Write(e.to_string()))
    }

    /// Parses a stored value, rejecting other versions and malformed shapes.
    pub fn decode(value: Value) -> Result<Self, StorageError> {
        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| StorageError::Incompatible("missing version".to_string()))?;
        if version != u64::from(STORE_VERSION) {
            return Err(StorageError::Incompatible(format!(
                "unsupported version {version}"
            )));
        }
        serde_json::from_value(value).map_err(|e| StorageError::Incompatible(e.to_string()))
    }
}

/// Where the selection record lives between requests.
pub trait SelectionStorage {
    fn load(&self) -> Result<Option<Value>, StorageError>;
    fn save(&self, value: Value) -> Result<(), StorageError>;
}

impl<T: SelectionStorage + ?Sized> SelectionStorage for &T {
    fn load(&self) -> Result<Option<Value>, StorageError> {
        (**self).load()
    }

    fn save(&self, value: Value) -> Result<(), StorageError> {
        (**self).save(value)
    }
}

/// Storage keeping the raw JSON text in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    raw: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with arbitrary stored text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|raw| raw.clone())
    }
}

impl SelectionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Value>, StorageError> {
        let raw = self
            .raw
            .lock()
            .map_err(|e| StorageError::Read(e.to_string()))?;
        raw.as_deref()
            .map(|text| serde_json::from_str(text).map_err(|e| StorageError::Read(e.to_string())))
            .transpose()
    }

    fn save(&self, value: Value) -> Result<(), StorageError> {
        let mut raw = self
            .raw
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        *raw = Some(value.to_string());
        Ok(())
    }
}
