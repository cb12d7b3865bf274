pub mod auth;
pub mod config;
pub mod preset;
pub mod timer;

use std::sync::Arc;

use pomodo_core::{Config, LocalStore, PresetSyncStore, StaticIdentity};

/// The shared preset store: local JSON backend, identity from config.
pub fn open_preset_store(
    config: &Config,
) -> Result<PresetSyncStore<LocalStore, StaticIdentity>, Box<dyn std::error::Error>> {
    let backend = LocalStore::open()?;
    let identity = StaticIdentity::new(config.account.user_id.clone());
    Ok(PresetSyncStore::new(Arc::new(backend), Arc::new(identity)))
}
