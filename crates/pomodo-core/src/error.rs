//! Core error types for pomodo-core.
//!
//! Each component owns a small error enum; `CoreError` is the umbrella
//! type re-exported at the crate root.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomodo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Preset store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Notification scheduling errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the preset sync store.
///
/// `Unauthenticated` and `InvalidArgument` surface to the caller of the
/// mutating operation; `Subscription` terminates a live stream and leaves
/// re-subscription to the consumer. None of these are fatal to the process.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No authenticated identity is available for a store operation.
    #[error("no authenticated user")]
    Unauthenticated,

    /// The operation was given an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The live subscription stream failed and has ended.
    #[error("preset subscription failed: {0}")]
    Subscription(String),

    /// The underlying document store rejected the operation.
    #[error("document store error: {0}")]
    Backend(String),
}

/// Errors from the local notification collaborator.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The platform refused exact alert scheduling (e.g. permission
    /// revoked). Recoverable: the scheduler degrades to a no-op.
    #[error("alert scheduling denied: {0}")]
    SchedulingDenied(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to resolve the configuration directory
    #[error("failed to resolve configuration directory: {0}")]
    Dir(String),

    /// Unknown configuration key
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
