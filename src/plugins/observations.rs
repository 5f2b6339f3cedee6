//! Observation log: a small free-form CRUD journal, independent of the
//! capture chain. One table, timestamp-ordered listing, explicit
//! confirmation before delete.

use crate::core::db;
use crate::core::error::HandshakeError;
use crate::core::schemas;
use clap::{Parser, Subcommand};
use rusqlite::{params, params_from_iter, types::Value as SqlValue, Connection};
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[clap(name = "obs", about = "Keep a free-form observation log.")]
pub struct ObsCli {
    #[clap(subcommand)]
    command: ObsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ObsCommand {
    /// Add a new log entry.
    Add {
        /// Entry content (positional argument)
        #[clap(value_name = "CONTENT")]
        content: String,
        /// Comma-separated tags.
        #[clap(long)]
        tags: Option<String>,
        /// Location string.
        #[clap(long)]
        location: Option<String>,
        /// Unix timestamp (defaults to now).
        #[clap(long)]
        timestamp: Option<i64>,
    },
    /// List entries, newest first.
    List {
        #[clap(long, default_value = "20")]
        limit: i64,
        #[clap(long, default_value = "0")]
        offset: i64,
    },
    /// Update fields of an existing entry.
    Update {
        /// Entry id.
        id: i64,
        #[clap(long)]
        content: Option<String>,
        #[clap(long)]
        tags: Option<String>,
        #[clap(long)]
        location: Option<String>,
        #[clap(long)]
        timestamp: Option<i64>,
    },
    /// Delete an entry.
    Delete {
        /// Entry id.
        id: i64,
        /// Delete without confirmation.
        #[clap(long)]
        force: bool,
    },
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: i64,
    pub content: String,
    pub tags: Option<String>,
    pub location: Option<String>,
}

pub fn ensure_schema(conn: &Connection) -> Result<(), HandshakeError> {
    conn.execute(schemas::OBSERVATION_LOG_SCHEMA, [])?;
    conn.execute(schemas::OBSERVATION_LOG_SCHEMA_INDEX_TIMESTAMP, [])?;
    conn.execute(schemas::OBSERVATION_LOG_SCHEMA_INDEX_LOCATION, [])?;
    Ok(())
}

fn now_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

pub fn add_entry(
    conn: &Connection,
    content: &str,
    tags: Option<&str>,
    location: Option<&str>,
    timestamp: Option<i64>,
) -> Result<LogEntry, HandshakeError> {
    let timestamp = timestamp.unwrap_or_else(now_unix_secs);
    conn.execute(
        "INSERT INTO observation_log (timestamp, content, tags, location)
         VALUES (?1, ?2, ?3, ?4)",
        params![timestamp, content, tags, location],
    )?;
    Ok(LogEntry {
        id: conn.last_insert_rowid(),
        timestamp,
        content: content.to_string(),
        tags: tags.map(str::to_string),
        location: location.map(str::to_string),
    })
}

pub fn list_entries(
    conn: &Connection,
    limit: i64,
    offset: i64,
) -> Result<Vec<LogEntry>, HandshakeError> {
    let mut stmt = conn.prepare(
        "SELECT id, timestamp, content, tags, location
         FROM observation_log
         ORDER BY timestamp DESC, id DESC
         LIMIT ?1 OFFSET ?2",
    )?;
    let rows = stmt.query_map(params![limit, offset], |row| {
        Ok(LogEntry {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            content: row.get(2)?,
            tags: row.get(3)?,
            location: row.get(4)?,
        })
    })?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

pub fn update_entry(
    conn: &Connection,
    id: i64,
    content: Option<&str>,
    tags: Option<&str>,
    location: Option<&str>,
    timestamp: Option<i64>,
) -> Result<(), HandshakeError> {
    let mut assignments: Vec<&str> = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();
    if let Some(content) = content {
        assignments.push("content = ?");
        values.push(SqlValue::Text(content.to_string()));
    }
    if let Some(tags) = tags {
        assignments.push("tags = ?");
        values.push(SqlValue::Text(tags.to_string()));
    }
    if let Some(location) = location {
        assignments.push("location = ?");
        values.push(SqlValue::Text(location.to_string()));
    }
    if let Some(timestamp) = timestamp {
        assignments.push("timestamp = ?");
        values.push(SqlValue::Integer(timestamp));
    }
    if assignments.is_empty() {
        return Err(HandshakeError::ValidationError(
            "No fields provided for update.".to_string(),
        ));
    }
    values.push(SqlValue::Integer(id));
    let sql = format!(
        "UPDATE observation_log SET {} WHERE id = ?",
        assignments.join(", ")
    );
    let changed = conn.execute(&sql, params_from_iter(values))?;
    if changed == 0 {
        return Err(HandshakeError::NotFound(format!("observation {id}")));
    }
    Ok(())
}

pub fn delete_entry(conn: &Connection, id: i64) -> Result<(), HandshakeError> {
    let changed = conn.execute("DELETE FROM observation_log WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(HandshakeError::NotFound(format!("observation {id}")));
    }
    Ok(())
}

pub fn run_obs_cli(db_path: &Path, cli: ObsCli) -> Result<(), HandshakeError> {
    let conn = db::db_connect(db_path)?;
    ensure_schema(&conn)?;
    match cli.command {
        ObsCommand::Add {
            content,
            tags,
            location,
            timestamp,
        } => {
            let entry = add_entry(
                &conn,
                &content,
                tags.as_deref(),
                location.as_deref(),
                timestamp,
            )?;
            println!("Added observation {} at {}.", entry.id, entry.timestamp);
        }
        ObsCommand::List { limit, offset } => {
            let entries = list_entries(&conn, limit, offset)?;
            if entries.is_empty() {
                println!("No observations found.");
                return Ok(());
            }
            for entry in entries {
                println!(
                    "{} | {} | {} | tags={} | location={}",
                    entry.id,
                    entry.timestamp,
                    entry.content,
                    entry.tags.as_deref().unwrap_or("-"),
                    entry.location.as_deref().unwrap_or("-")
                );
            }
        }
        ObsCommand::Update {
            id,
            content,
            tags,
            location,
            timestamp,
        } => {
            update_entry(
                &conn,
                id,
                content.as_deref(),
                tags.as_deref(),
                location.as_deref(),
                timestamp,
            )?;
            println!("Updated observation {id}.");
        }
        ObsCommand::Delete { id, force } => {
            if !force && !confirm_delete(id, std::io::stdin().lock(), std::io::stdout())? {
                println!("Delete cancelled.");
                return Ok(());
            }
            delete_entry(&conn, id)?;
            println!("Deleted observation {id}.");
        }
    }
    Ok(())
}

fn confirm_delete<R: BufRead, W: Write>(
    id: i64,
    mut input: R,
    mut output: W,
) -> Result<bool, HandshakeError> {
    write!(output, "Delete observation {id}? Type 'yes' to confirm: ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
