//! Collaborator traits for the preset sync store.
//!
//! The external identity provider and document store are modeled as trait
//! seams so the core never depends on a concrete backend. A backend keeps
//! one document collection per user and pushes full-collection snapshots,
//! in store order, to every open watch channel.

use std::future::Future;

use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::error::StoreError;

/// Field map of a document body.
pub type DocumentFields = Map<String, Value>;

/// A raw record from the document store: store-assigned id plus the
/// undecoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub fields: Value,
}

/// Supplies the opaque identifier of the authenticated user, if any.
/// Absence means "not authenticated".
pub trait IdentityProvider: Send + Sync + 'static {
    fn current_user_id(&self) -> Option<String>;
}

/// A fixed identity, wired from configuration or a test.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn new(user_id: Option<String>) -> Self {
        Self(user_id)
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self(Some(user_id.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Per-user document collection with a live change subscription.
pub trait DocumentStore: Send + Sync + 'static {
    /// Add a document and return its store-assigned id.
    fn add(
        &self,
        user_id: &str,
        fields: DocumentFields,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Overwrite the body of an existing document.
    fn update(
        &self,
        user_id: &str,
        id: &str,
        fields: DocumentFields,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove a document. Removing an id that does not exist is not an
    /// error.
    fn delete(&self, user_id: &str, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Open a live channel of full-collection snapshots for the user. The
    /// current collection is delivered immediately, then again after every
    /// change, until the receiver is dropped.
    fn watch(&self, user_id: &str) -> mpsc::UnboundedReceiver<Result<Vec<RawDocument>, StoreError>>;
}
