//! Preset synchronization layer.
//!
//! [`PresetSyncStore`] keeps a live, ordered collection of the current
//! user's timer presets, fed by the document store's change subscription.
//! Backends implement [`DocumentStore`]; identity comes from an
//! [`IdentityProvider`].

mod document;
mod local;
mod memory;
mod presets;

pub use document::{DocumentFields, DocumentStore, IdentityProvider, RawDocument, StaticIdentity};
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use presets::{PresetSubscription, PresetSyncStore};
