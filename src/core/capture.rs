//! The reasoning-capture store and pipeline.
//!
//! A capture session persists a strictly ordered chain: one intent, one
//! observation, N hypotheses (3..=7), one test of a chosen hypothesis,
//! one outcome concluding that test, and one pattern seed. Foreign keys
//! only ever point backwards in the chain. The whole session is a single
//! SQLite transaction: the operator sees nothing durable until the final
//! commit, and killing the process mid-prompt leaves no partial rows.

use crate::core::collect::Collector;
use crate::core::db;
use crate::core::error::HandshakeError;
use crate::core::model::{
    test_ref, CaptureReceipt, HypothesisInput, IntentInput, ModelType, ObservationInput,
    OutcomeInput, PatternSeedInput, TestInput,
};
use crate::core::schemas;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::io::{BufRead, Write};
use std::path::Path;

pub const MIN_HYPOTHESES: i64 = 3;
pub const MAX_HYPOTHESES: i64 = 7;

/// Owns the store connection for the lifetime of one invocation.
pub struct CaptureStore {
    conn: Connection,
}

impl CaptureStore {
    pub fn open(db_path: &Path) -> Result<Self, HandshakeError> {
        let conn = db::db_connect(db_path)?;
        Ok(CaptureStore { conn })
    }

    /// Wrap an existing connection (tests, in-memory stores).
    pub fn from_connection(conn: Connection) -> Self {
        CaptureStore { conn }
    }

    /// Create the capture tables if absent. Idempotent; refuses a store
    /// whose recorded schema version is newer than this build supports.
    pub fn ensure_schema(&self) -> Result<(), HandshakeError> {
        self.conn.execute(schemas::META_SCHEMA, [])?;
        let recorded: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(raw) = recorded {
            let version: u32 = raw.parse().map_err(|_| {
                HandshakeError::DatabaseInitializationError(format!(
                    "unreadable schema_version {raw:?}"
                ))
            })?;
            if version > schemas::SCHEMA_VERSION {
                return Err(HandshakeError::DatabaseInitializationError(format!(
                    "store schema version {version} is newer than supported {}",
                    schemas::SCHEMA_VERSION
                )));
            }
        }
        for statement in schemas::CAPTURE_SCHEMA {
            self.conn.execute(statement, [])?;
        }
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
            params![schemas::SCHEMA_VERSION.to_string()],
        )?;
        Ok(())
    }

    /// Begin a capture session. All inserts go through the returned
    /// handle; dropping it without `commit()` rolls everything back.
    pub fn session(&mut self) -> Result<CaptureSession<'_>, HandshakeError> {
        let tx = self.conn.transaction()?;
        Ok(CaptureSession { tx })
    }
}

/// One in-flight capture session: a transaction plus identifier
/// allocation. Identifiers are SQLite rowids, assigned at insert time.
pub struct CaptureSession<'conn> {
    tx: Transaction<'conn>,
}

fn map_insert_error(err: rusqlite::Error) -> HandshakeError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        if failure.code == rusqlite::ErrorCode::ConstraintViolation
            && message.contains("FOREIGN KEY")
        {
            return HandshakeError::ReferentialError(message.clone());
        }
    }
    HandshakeError::RusqliteError(err)
}

impl CaptureSession<'_> {
    pub fn insert_intent(&self, input: &IntentInput) -> Result<i64, HandshakeError> {
        self.tx
            .execute(
                "INSERT INTO intents (goal, constraints, success_signal, confidence)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    input.goal,
                    input.constraints,
                    input.success_signal,
                    input.confidence
                ],
            )
            .map_err(map_insert_error)?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn insert_observation(&self, input: &ObservationInput) -> Result<i64, HandshakeError> {
        self.tx
            .execute(
                "INSERT INTO observations (intent_id, description, domain_signature)
                 VALUES (?1, ?2, ?3)",
                params![
                    input.intent_id,
                    input.description,
                    serde_json::to_string(&input.domain_signature)?
                ],
            )
            .map_err(map_insert_error)?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn insert_hypothesis(&self, input: &HypothesisInput) -> Result<i64, HandshakeError> {
        self.tx
            .execute(
                "INSERT INTO hypotheses
                     (observation_id, model_type, probability, falsifiers, domain_signature)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    input.observation_id,
                    input.model_type.as_str(),
                    input.probability,
                    input.falsifiers,
                    serde_json::to_string(&input.domain_signature)?
                ],
            )
            .map_err(map_insert_error)?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn insert_test(&self, input: &TestInput) -> Result<i64, HandshakeError> {
        self.tx
            .execute(
                "INSERT INTO tests (hypothesis_id, description, result, evidence)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    input.hypothesis_id,
                    input.description,
                    input.result,
                    input.evidence
                ],
            )
            .map_err(map_insert_error)?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn insert_outcome(&self, input: &OutcomeInput) -> Result<i64, HandshakeError> {
        self.tx
            .execute(
                "INSERT INTO outcomes (observation_id, hypothesis_id, summary, evidence_refs)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    input.observation_id,
                    input.hypothesis_id,
                    input.summary,
                    serde_json::to_string(&input.evidence_refs)?
                ],
            )
            .map_err(map_insert_error)?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn insert_pattern_seed(&self, input: &PatternSeedInput) -> Result<i64, HandshakeError> {
        self.tx
            .execute(
                "INSERT INTO pattern_seeds
                     (outcome_id, trigger, invariant, counterexample, best_response,
                      domain_signature, evidence_refs)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    input.outcome_id,
                    input.trigger,
                    input.invariant,
                    input.counterexample,
                    input.best_response,
                    serde_json::to_string(&input.domain_signature)?,
                    serde_json::to_string(&input.evidence_refs)?
                ],
            )
            .map_err(map_insert_error)?;
        Ok(self.tx.last_insert_rowid())
    }

    pub fn commit(self) -> Result<(), HandshakeError> {
        self.tx.commit()?;
        Ok(())
    }
}

/// Run the full seven-stage capture pipeline against an open store,
/// driving prompts through `collector`. Returns the generated
/// identifiers once the session transaction has committed.
pub fn run_capture<R: BufRead, W: Write>(
    store: &mut CaptureStore,
    collector: &mut Collector<R, W>,
) -> Result<CaptureReceipt, HandshakeError> {
    store.ensure_schema()?;
    let session = store.session()?;

    let intent = IntentInput {
        goal: collector.text("Intent goal", false)?,
        constraints: collector.text("Intent constraints", false)?,
        success_signal: collector.text("Intent success signal", false)?,
        confidence: collector.float("Intent confidence", 0.0, 1.0)?,
    };
    let intent_id = session.insert_intent(&intent)?;

    let observation = ObservationInput {
        intent_id,
        description: collector.text("Observation description", false)?,
        domain_signature: collector.mixture("Observation domain signature mixture")?,
    };
    let observation_id = session.insert_observation(&observation)?;

    let hypothesis_count =
        collector.integer("Number of hypotheses", MIN_HYPOTHESES, MAX_HYPOTHESES)?;
    let mut hypothesis_ids: Vec<i64> = Vec::with_capacity(hypothesis_count as usize);
    let model_labels = ModelType::labels();
    for index in 1..=hypothesis_count {
        let model_index =
            collector.choice(&format!("Hypothesis {index} model type"), &model_labels)?;
        let hypothesis = HypothesisInput {
            observation_id,
            model_type: ModelType::ALL[model_index],
            probability: collector.float(&format!("Hypothesis {index} probability"), 0.0, 1.0)?,
            falsifiers: collector.text(&format!("Hypothesis {index} falsifiers"), false)?,
            domain_signature: collector
                .mixture(&format!("Hypothesis {index} domain signature mixture"))?,
        };
        hypothesis_ids.push(session.insert_hypothesis(&hypothesis)?);
    }

    collector.line("Captured hypotheses:")?;
    for (index, hypothesis_id) in hypothesis_ids.iter().enumerate() {
        collector.line(&format!("  {}. hypothesis_id={}", index + 1, hypothesis_id))?;
    }

    let chosen = collector.integer(
        "Choose hypothesis to test (index)",
        1,
        hypothesis_ids.len() as i64,
    )?;
    let tested_hypothesis_id = hypothesis_ids[(chosen - 1) as usize];
    let test = TestInput {
        hypothesis_id: tested_hypothesis_id,
        description: collector.text("Test description", false)?,
        result: collector.text("Test result", false)?,
        evidence: collector.text("Test evidence", false)?,
    };
    let test_id = session.insert_test(&test)?;

    collector.line(&format!(
        "Provide outcome evidence refs. Include the test reference (e.g., {}).",
        test_ref(test_id)
    ))?;
    let summary = collector.text("Outcome summary", false)?;
    let mut evidence_refs = collector.evidence_refs("Outcome evidence refs")?;
    let token = test_ref(test_id);
    if !evidence_refs.contains(&token) {
        evidence_refs.push(token);
    }
    let outcome = OutcomeInput {
        observation_id,
        hypothesis_id: tested_hypothesis_id,
        summary,
        evidence_refs,
    };
    let outcome_id = session.insert_outcome(&outcome)?;

    collector.line("Capture pattern seed.")?;
    let pattern_seed = PatternSeedInput {
        outcome_id,
        trigger: collector.text("Pattern trigger", false)?,
        invariant: collector.text("Pattern invariant", false)?,
        counterexample: collector.text("Pattern counterexample", false)?,
        best_response: collector.text("Pattern best response", false)?,
        domain_signature: collector.mixture("Pattern domain signature mixture")?,
        evidence_refs: collector.evidence_refs("Pattern evidence refs")?,
    };
    session.insert_pattern_seed(&pattern_seed)?;

    session.commit()?;
    Ok(CaptureReceipt {
        intent_id,
        observation_id,
        hypothesis_ids,
        test_id,
        outcome_id,
    })
}
