use rusqlite;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandshakeError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to initialize database: {0}")]
    DatabaseInitializationError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Referential integrity error: {0}")]
    ReferentialError(String),
    #[error("Input stream closed while reading {0}")]
    InputClosed(String),
    #[error("Not found: {0}")]
    NotFound(String),
}
