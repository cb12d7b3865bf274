//! # Pomodo Core Library
//!
//! Core business logic for the Pomodo Pomodoro timer: the countdown state
//! machine, live preset synchronization against a per-user document
//! store, and scheduled local notifications. The CLI binary is a thin
//! presentation adapter over this library; a GUI would sit on the same
//! seam.
//!
//! ## Architecture
//!
//! - **Timer**: [`TimerEngine`] is a pure state machine; [`TimerService`]
//!   drives it with a cancellable one-second countdown task and publishes
//!   snapshots through watch channels
//! - **Store**: [`PresetSyncStore`] keeps the user's named presets in
//!   sync through a live document-store subscription
//! - **Notify**: [`NotificationScheduler`] owns deferred interval alerts,
//!   at most one pending per alert id
//! - **Storage**: TOML configuration under `~/.config/pomodo/`

pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod store;
pub mod timer;

pub use error::{ConfigError, CoreError, NotifyError, StoreError};
pub use events::Event;
pub use notify::{Alert, AlertId, AlertSink, NotificationScheduler, BREAK_ENDED_ALERT, FOCUS_ENDED_ALERT};
pub use storage::Config;
pub use store::{
    DocumentStore, IdentityProvider, LocalStore, MemoryStore, PresetSubscription, PresetSyncStore,
    RawDocument, StaticIdentity,
};
pub use timer::{
    TimerEngine, TimerMode, TimerPhase, TimerPreset, TimerService, TimerSnapshot,
};
