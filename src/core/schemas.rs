//! Centralized database schema definitions for the handshakeos store.
//!
//! One SQLite file holds two independent surfaces:
//! 1. The capture chain: intents, observations, hypotheses, tests,
//!    outcomes, pattern_seeds (append-only, foreign-key linked).
//! 2. The observation log: a single free-form CRUD table.
//!
//! Every statement is `IF NOT EXISTS` so setup is idempotent.

/// Highest schema version this build understands. Stored in `meta` under
/// the `schema_version` key; a store recording a higher number is refused.
pub const SCHEMA_VERSION: u32 = 1;

pub const META_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
";

// --- Capture chain ---

pub const CAPTURE_SCHEMA_INTENTS: &str = "
    CREATE TABLE IF NOT EXISTS intents (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        goal TEXT NOT NULL,
        constraints TEXT NOT NULL,
        success_signal TEXT NOT NULL,
        confidence REAL NOT NULL
    )
";

pub const CAPTURE_SCHEMA_OBSERVATIONS: &str = "
    CREATE TABLE IF NOT EXISTS observations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        intent_id INTEGER NOT NULL,
        description TEXT NOT NULL,
        domain_signature TEXT NOT NULL,
        FOREIGN KEY(intent_id) REFERENCES intents(id)
    )
";

pub const CAPTURE_SCHEMA_HYPOTHESES: &str = "
    CREATE TABLE IF NOT EXISTS hypotheses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        observation_id INTEGER NOT NULL,
        model_type TEXT NOT NULL,
        probability REAL NOT NULL,
        falsifiers TEXT NOT NULL,
        domain_signature TEXT NOT NULL,
        FOREIGN KEY(observation_id) REFERENCES observations(id)
    )
";

pub const CAPTURE_SCHEMA_TESTS: &str = "
    CREATE TABLE IF NOT EXISTS tests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        hypothesis_id INTEGER NOT NULL,
        description TEXT NOT NULL,
        result TEXT NOT NULL,
        evidence TEXT NOT NULL,
        FOREIGN KEY(hypothesis_id) REFERENCES hypotheses(id)
    )
";

pub const CAPTURE_SCHEMA_OUTCOMES: &str = "
    CREATE TABLE IF NOT EXISTS outcomes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        observation_id INTEGER NOT NULL,
        hypothesis_id INTEGER NOT NULL,
        summary TEXT NOT NULL,
        evidence_refs TEXT NOT NULL,
        FOREIGN KEY(observation_id) REFERENCES observations(id),
        FOREIGN KEY(hypothesis_id) REFERENCES hypotheses(id)
    )
";

pub const CAPTURE_SCHEMA_PATTERN_SEEDS: &str = "
    CREATE TABLE IF NOT EXISTS pattern_seeds (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        outcome_id INTEGER NOT NULL,
        trigger TEXT NOT NULL,
        invariant TEXT NOT NULL,
        counterexample TEXT NOT NULL,
        best_response TEXT NOT NULL,
        domain_signature TEXT NOT NULL,
        evidence_refs TEXT NOT NULL,
        FOREIGN KEY(outcome_id) REFERENCES outcomes(id)
    )
";

pub const CAPTURE_SCHEMA_INDEX_OBSERVATIONS_INTENT: &str =
    "CREATE INDEX IF NOT EXISTS idx_observations_intent ON observations(intent_id)";
pub const CAPTURE_SCHEMA_INDEX_HYPOTHESES_OBSERVATION: &str =
    "CREATE INDEX IF NOT EXISTS idx_hypotheses_observation ON hypotheses(observation_id)";
pub const CAPTURE_SCHEMA_INDEX_OUTCOMES_OBSERVATION: &str =
    "CREATE INDEX IF NOT EXISTS idx_outcomes_observation ON outcomes(observation_id)";

/// All capture-chain statements in creation order. `META_SCHEMA` is not
/// listed here: `ensure_schema` creates it first so the version guard
/// can run before any other DDL.
pub const CAPTURE_SCHEMA: &[&str] = &[
    CAPTURE_SCHEMA_INTENTS,
    CAPTURE_SCHEMA_OBSERVATIONS,
    CAPTURE_SCHEMA_HYPOTHESES,
    CAPTURE_SCHEMA_TESTS,
    CAPTURE_SCHEMA_OUTCOMES,
    CAPTURE_SCHEMA_PATTERN_SEEDS,
    CAPTURE_SCHEMA_INDEX_OBSERVATIONS_INTENT,
    CAPTURE_SCHEMA_INDEX_HYPOTHESES_OBSERVATION,
    CAPTURE_SCHEMA_INDEX_OUTCOMES_OBSERVATION,
];

// --- Observation log ---

pub const OBSERVATION_LOG_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS observation_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp INTEGER NOT NULL,
        content TEXT NOT NULL,
        tags TEXT,
        location TEXT
    )
";

pub const OBSERVATION_LOG_SCHEMA_INDEX_TIMESTAMP: &str =
    "CREATE INDEX IF NOT EXISTS idx_observation_log_timestamp ON observation_log(timestamp)";
pub const OBSERVATION_LOG_SCHEMA_INDEX_LOCATION: &str =
    "CREATE INDEX IF NOT EXISTS idx_observation_log_location ON observation_log(location)";
