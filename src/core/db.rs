use crate::core::error::HandshakeError;
use rusqlite::Connection;
use std::env;
use std::path::{Path, PathBuf};

/// Default store filename, resolved against the working directory.
pub const DEFAULT_DB_NAME: &str = "handshakeos.sqlite3";

/// Environment override for the store location, checked after the CLI flag.
pub const DB_PATH_ENV: &str = "HANDSHAKEOS_DB";

/// Resolve the store path: explicit flag, then environment, then default.
pub fn resolve_db_path(cli_value: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_value {
        return path.to_path_buf();
    }
    if let Ok(env_value) = env::var(DB_PATH_ENV) {
        if !env_value.is_empty() {
            return PathBuf::from(env_value);
        }
    }
    PathBuf::from(DEFAULT_DB_NAME)
}

pub fn db_connect(db_path: &Path) -> Result<Connection, HandshakeError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(HandshakeError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(HandshakeError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(HandshakeError::RusqliteError)?;
    Ok(conn)
}
