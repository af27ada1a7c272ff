//! Core error types for dayledger-core.
//!
//! This module defines the error hierarchy using thiserror. Note that the
//! vault deliberately swallows its own errors at the public surface; its
//! callers never see a failure. `VaultError` exists for the internal
//! backend layer and for logging.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dayledger-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Vault backend errors
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Vault backend errors. Internal to the storage layer -- the `Vault`
/// facade catches these, logs them, and degrades instead of propagating.
#[derive(Error, Debug)]
pub enum VaultError {
    /// The durable directory could not be acquired
    #[error("Failed to acquire vault directory at {path}: {source}")]
    AcquireFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key-value store error
    #[error("Key-value store error: {0}")]
    KeyValue(#[from] rusqlite::Error),

    /// A resource name that cannot be used as a vault key
    #[error("Invalid vault name: {0}")]
    InvalidName(String),

    /// Raw IO failure on the durable tier
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted envelope could not be decoded
    #[error("Malformed stored entry for '{name}': {message}")]
    Malformed { name: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors. These abort the operation with no partial state
/// change and are surfaced to the user as-is.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time window ordering
    #[error("Invalid time window: start ({start}) must be before end ({end})")]
    InvalidTimeWindow { start: String, end: String },

    /// A time-of-day string that is not HH:MM
    #[error("Invalid time of day '{0}': expected HH:MM")]
    InvalidTimeOfDay(String),

    /// A date key that is not YYYY-MM-DD
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Empty required input
    #[error("Required field '{0}' is empty")]
    EmptyField(String),

    /// Name collision on a uniquely named entity
    #[error("{field} '{value}' already exists")]
    AlreadyExists { field: String, value: String },

    /// Negative or non-finite money amount
    #[error("Invalid amount for '{field}': {message}")]
    InvalidAmount { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
