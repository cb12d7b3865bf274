//! In-memory document store backend.
//!
//! Insertion-ordered collections with uuid document ids and watcher
//! fan-out. Stands in for the external per-user document store in tests
//! and demos; [`super::local::LocalStore`] layers file persistence on top.

use std::collections::HashMap;
use std::sync::Mutex;

use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::document::{DocumentFields, DocumentStore, RawDocument};
use crate::error::StoreError;

type Collections = HashMap<String, IndexMap<String, DocumentFields>>;
type Watcher = mpsc::UnboundedSender<Result<Vec<RawDocument>, StoreError>>;

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    collections: Collections,
    watchers: HashMap<String, Vec<Watcher>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_collections(collections: Collections) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                collections,
                watchers: HashMap::new(),
            }),
        }
    }

    pub(crate) fn export(&self) -> Collections {
        self.lock().collections.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn snapshot(inner: &MemoryInner, user_id: &str) -> Vec<RawDocument> {
    inner
        .collections
        .get(user_id)
        .map(|docs| {
            docs.iter()
                .map(|(id, fields)| RawDocument {
                    id: id.clone(),
                    fields: Value::Object(fields.clone()),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn notify(inner: &mut MemoryInner, user_id: &str) {
    let docs = snapshot(inner, user_id);
    if let Some(watchers) = inner.watchers.get_mut(user_id) {
        watchers.retain(|tx| tx.send(Ok(docs.clone())).is_ok());
    }
}

impl DocumentStore for MemoryStore {
    async fn add(&self, user_id: &str, fields: DocumentFields) -> Result<String, StoreError> {
        let mut inner = self.lock();
        let id = Uuid::new_v4().to_string();
        inner
            .collections
            .entry(user_id.to_string())
            .or_default()
            .insert(id.clone(), fields);
        notify(&mut inner, user_id);
        Ok(id)
    }

    async fn update(&self, user_id: &str, id: &str, fields: DocumentFields) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let slot = inner
            .collections
            .get_mut(user_id)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::Backend(format!("no document with id {id}")))?;
        *slot = fields;
        notify(&mut inner, user_id);
        Ok(())
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let removed = inner
            .collections
            .get_mut(user_id)
            .and_then(|docs| docs.shift_remove(id))
            .is_some();
        if removed {
            notify(&mut inner, user_id);
        }
        Ok(())
    }

    fn watch(&self, user_id: &str) -> mpsc::UnboundedReceiver<Result<Vec<RawDocument>, StoreError>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        let _ = tx.send(Ok(snapshot(&inner, user_id)));
        inner
            .watchers
            .entry(user_id.to_string())
            .or_default()
            .push(tx);
        rx
    }
}
