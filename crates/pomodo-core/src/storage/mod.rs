mod config;

pub use config::{AccountConfig, Config, NotificationsConfig, TimerConfig, UiConfig};

use std::path::PathBuf;

/// Returns `~/.config/pomodo[-dev]/` based on POMODO_ENV.
///
/// Set POMODO_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMODO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomodo-dev")
    } else {
        base_dir.join("pomodo")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
