//! Core error types for learnstreak-core.
//!
//! Domain guards (logging a day twice, logging after the goal ended, freezing
//! with an empty budget) are not errors: engine operations report them as
//! `Ok(None)`. Everything here is an infrastructure failure.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for learnstreak-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Goal state could not be written to or read from its store
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors raised while persisting or hydrating the goal record.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The in-memory state could not be encoded
    #[error("Failed to encode goal record: {0}")]
    Encode(String),

    /// The stored record exists but cannot be decoded
    #[error("Failed to decode goal record: {0}")]
    Decode(String),

    /// The storage layer rejected the write
    #[error("Failed to write goal record: {0}")]
    Write(String),

    /// The storage layer rejected the delete
    #[error("Failed to delete goal record: {0}")]
    Delete(String),

    /// The storage layer could not be read
    #[error("Failed to read goal record: {0}")]
    Read(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked
                    || err.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
