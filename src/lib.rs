//! HandshakeOS-E: reasoning capture for operators who want their
//! conclusions to carry their evidence.
//!
//! The core is the interactive capture pipeline: one session records an
//! intent, an observation, three to seven competing hypotheses, a test
//! of one hypothesis, an outcome concluding that test, and a pattern
//! seed generalizing it. Identifiers thread forward through the chain
//! and the whole session commits as a single SQLite transaction, so a
//! session either lands in full or leaves no trace.
//!
//! # Layout
//!
//! - [`core`]: error taxonomy, store access, schemas, typed records,
//!   the input collector, and the pipeline.
//! - [`plugins`]: secondary subcommand groups (observation log,
//!   provenance text).
//!
//! # Usage
//!
//! ```bash
//! # Run a capture session against the default store
//! handshakeos
//!
//! # Same, explicit store
//! handshakeos --db ./captures.sqlite3 capture
//!
//! # Initialize all schemas without capturing
//! handshakeos init
//!
//! # Keep a free-form observation log
//! handshakeos obs add "spike at 14:00" --tags latency
//! handshakeos obs list --limit 10
//! ```

pub mod core;
pub mod plugins;

use crate::core::capture::{run_capture, CaptureStore};
use crate::core::collect::Collector;
use crate::core::db;
use crate::core::error::HandshakeError;
use crate::core::schemas;
use crate::plugins::{about, observations};

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "handshakeos",
    version = env!("CARGO_PKG_VERSION"),
    about = "Reasoning capture: intent, observation, hypotheses, test, outcome, pattern seed."
)]
struct Cli {
    /// Path to the SQLite store (env: HANDSHAKEOS_DB).
    #[clap(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an interactive capture session (the default).
    Capture,
    /// Create or upgrade all schemas at the store path.
    Init,
    /// Show version, provenance, and store location.
    About,
    /// Show the full imprint statement.
    Imprint,
    /// Observation log (add/list/update/delete).
    Obs(observations::ObsCli),
}

/// Parse arguments, dispatch, and run to completion. The binary maps an
/// `Err` here to a non-zero exit code.
pub fn run() -> Result<(), HandshakeError> {
    let cli = Cli::parse();
    let db_path = db::resolve_db_path(cli.db.as_deref());

    match cli.command.unwrap_or(Command::Capture) {
        Command::Capture => {
            let mut store = CaptureStore::open(&db_path)?;
            let stdin = io::stdin();
            let mut collector = Collector::new(stdin.lock(), io::stdout());
            let receipt = run_capture(&mut store, &mut collector)?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Command::Init => {
            let conn = db::db_connect(&db_path)?;
            observations::ensure_schema(&conn)?;
            let store = CaptureStore::from_connection(conn);
            store.ensure_schema()?;
            println!(
                "Initialized database at {} (schema v{}).",
                db_path.display(),
                schemas::SCHEMA_VERSION
            );
        }
        Command::About => about::run_about(&db_path),
        Command::Imprint => about::run_imprint(),
        Command::Obs(obs_cli) => observations::run_obs_cli(&db_path, obs_cli)?,
    }
    Ok(())
}
