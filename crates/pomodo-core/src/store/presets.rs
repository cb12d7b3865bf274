//! Live-synced preset collection for the current user.
//!
//! One instance is shared process-wide; every consumer opens its own
//! subscription instead of its own upstream listener. Mutations go to the
//! document store and come back through the live stream, which is the
//! source of truth for store-assigned ids.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::document::{DocumentFields, DocumentStore, IdentityProvider, RawDocument};
use crate::error::StoreError;
use crate::timer::TimerPreset;

pub struct PresetSyncStore<S, I> {
    backend: Arc<S>,
    identity: Arc<I>,
}

impl<S, I> Clone for PresetSyncStore<S, I> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            identity: Arc::clone(&self.identity),
        }
    }
}

impl<S, I> PresetSyncStore<S, I>
where
    S: DocumentStore,
    I: IdentityProvider,
{
    pub fn new(backend: Arc<S>, identity: Arc<I>) -> Self {
        Self { backend, identity }
    }

    fn user_id(&self) -> Result<String, StoreError> {
        self.identity.current_user_id().ok_or(StoreError::Unauthenticated)
    }

    /// Open a live subscription to the user's preset collection.
    ///
    /// Without an authenticated identity the stream emits a single empty
    /// collection and then stays open, silent, until released. A backend
    /// stream error is forwarded once and terminates the sequence; the
    /// consumer decides whether to re-subscribe or surface a degraded
    /// state. Dropping the subscription releases the upstream listener.
    pub fn subscribe(&self) -> PresetSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = match self.identity.current_user_id() {
            None => tokio::spawn(async move {
                let _ = tx.send(Ok(Vec::new()));
                tx.closed().await;
            }),
            Some(user_id) => {
                let mut updates = self.backend.watch(&user_id);
                tokio::spawn(async move {
                    while let Some(update) = updates.recv().await {
                        match update {
                            Ok(docs) => {
                                if tx.send(Ok(decode_collection(docs))).is_err() {
                                    break;
                                }
                            }
                            Err(err) => {
                                let _ = tx.send(Err(err));
                                break;
                            }
                        }
                    }
                })
            }
        };
        PresetSubscription { rx, task }
    }

    /// Persist a new preset. The body is submitted without an id; the
    /// assigned id arrives through the live subscription.
    pub async fn create(&self, preset: &TimerPreset) -> Result<(), StoreError> {
        let user_id = self.user_id()?;
        self.backend.add(&user_id, document_fields(preset)).await?;
        Ok(())
    }

    /// Overwrite a persisted preset. Requires `preset.id`.
    pub async fn update(&self, preset: &TimerPreset) -> Result<(), StoreError> {
        let user_id = self.user_id()?;
        let id = preset
            .id
            .as_deref()
            .ok_or_else(|| StoreError::InvalidArgument("preset id is required for update".into()))?;
        self.backend.update(&user_id, id, document_fields(preset)).await
    }

    /// Remove a persisted preset. Deleting an id that no longer exists is
    /// not an error.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let user_id = self.user_id()?;
        self.backend.delete(&user_id, id).await
    }
}

/// A live, ordered sequence of preset collections. Dropping it (or calling
/// [`close`](Self::close)) stops the upstream work.
pub struct PresetSubscription {
    rx: mpsc::UnboundedReceiver<Result<Vec<TimerPreset>, StoreError>>,
    task: JoinHandle<()>,
}

impl PresetSubscription {
    /// Next emission, or `None` once the stream has terminated.
    pub async fn next(&mut self) -> Option<Result<Vec<TimerPreset>, StoreError>> {
        self.rx.recv().await
    }

    /// Explicitly release the subscription. Equivalent to dropping it.
    pub fn close(self) {}
}

impl Drop for PresetSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Encode the wire body the way the store schema expects it. The id is a
/// document property, never part of the body.
fn document_fields(preset: &TimerPreset) -> DocumentFields {
    let mut fields = DocumentFields::new();
    fields.insert("name".into(), Value::from(preset.name.clone()));
    fields.insert("focusMinutes".into(), Value::from(preset.focus_minutes));
    fields.insert("shortBreakMinutes".into(), Value::from(preset.short_break_minutes));
    fields
}

/// Decode a collection snapshot, skipping records that fail to decode.
/// A malformed record must not starve consumers of its valid siblings.
fn decode_collection(docs: Vec<RawDocument>) -> Vec<TimerPreset> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value::<TimerPreset>(doc.fields) {
            Ok(mut preset) => {
                preset.id = Some(doc.id);
                Some(preset)
            }
            Err(err) => {
                tracing::warn!(document_id = %doc.id, error = %err, "skipping malformed preset record");
                None
            }
        })
        .collect()
}
