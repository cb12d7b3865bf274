//! JSON-file-backed document store.
//!
//! An in-memory mirror persisted to `presets.json` under the data
//! directory after every mutation, so the CLI works standalone without a
//! remote store. Watch semantics are identical to [`MemoryStore`].

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use super::document::{DocumentFields, DocumentStore, RawDocument};
use super::memory::MemoryStore;
use crate::error::StoreError;
use crate::storage::data_dir;

const PRESETS_FILE: &str = "presets.json";

pub struct LocalStore {
    mirror: MemoryStore,
    path: PathBuf,
}

impl LocalStore {
    /// Open the store at the default location.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::Backend(e.to_string()))?;
        Self::open_at(dir.join(PRESETS_FILE))
    }

    /// Open the store at a specific path (used by tests).
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mirror = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let collections = serde_json::from_str(&content)
                    .map_err(|e| StoreError::Backend(format!("corrupt {}: {e}", path.display())))?;
                MemoryStore::from_collections(collections)
            }
            Err(_) => MemoryStore::new(),
        };
        Ok(Self { mirror, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&self.mirror.export())
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| StoreError::Backend(format!("cannot write {}: {e}", self.path.display())))
    }
}

impl DocumentStore for LocalStore {
    async fn add(&self, user_id: &str, fields: DocumentFields) -> Result<String, StoreError> {
        let id = self.mirror.add(user_id, fields).await?;
        self.persist()?;
        Ok(id)
    }

    async fn update(&self, user_id: &str, id: &str, fields: DocumentFields) -> Result<(), StoreError> {
        self.mirror.update(user_id, id, fields).await?;
        self.persist()
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        self.mirror.delete(user_id, id).await?;
        self.persist()
    }

    fn watch(&self, user_id: &str) -> mpsc::UnboundedReceiver<Result<Vec<RawDocument>, StoreError>> {
        self.mirror.watch(user_id)
    }
}
