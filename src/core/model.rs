//! Typed records for the capture chain.
//!
//! Every entity is append-only: a record is built once from collected
//! input, inserted, and never mutated. Foreign keys are plain `i64`
//! rowids threaded forward by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of explanatory model types for a hypothesis.
///
/// Kept as an enum so an invalid model type is a construction error,
/// not a runtime string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Me,
    We,
    They,
    System,
}

impl ModelType {
    pub const ALL: [ModelType; 4] = [
        ModelType::Me,
        ModelType::We,
        ModelType::They,
        ModelType::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Me => "me",
            ModelType::We => "we",
            ModelType::They => "they",
            ModelType::System => "system",
        }
    }

    /// Display labels for all variants, in `ALL` order.
    pub fn labels() -> [&'static str; 4] {
        [
            ModelType::Me.as_str(),
            ModelType::We.as_str(),
            ModelType::They.as_str(),
            ModelType::System.as_str(),
        ]
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(domain, weight)` pair of a mixture vector.
///
/// Weights are free-form: there is no requirement that they sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureComponent {
    pub domain: String,
    pub weight: f64,
}

/// Ordered mixture vector; may be empty.
pub type MixtureVector = Vec<MixtureComponent>;

#[derive(Debug, Clone)]
pub struct IntentInput {
    pub goal: String,
    pub constraints: String,
    pub success_signal: String,
    /// In [0.0, 1.0], enforced at collection time.
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct ObservationInput {
    pub intent_id: i64,
    pub description: String,
    pub domain_signature: MixtureVector,
}

#[derive(Debug, Clone)]
pub struct HypothesisInput {
    pub observation_id: i64,
    pub model_type: ModelType,
    /// In [0.0, 1.0], enforced at collection time.
    pub probability: f64,
    pub falsifiers: String,
    pub domain_signature: MixtureVector,
}

#[derive(Debug, Clone)]
pub struct TestInput {
    pub hypothesis_id: i64,
    pub description: String,
    pub result: String,
    pub evidence: String,
}

#[derive(Debug, Clone)]
pub struct OutcomeInput {
    pub observation_id: i64,
    pub hypothesis_id: i64,
    pub summary: String,
    pub evidence_refs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PatternSeedInput {
    pub outcome_id: i64,
    pub trigger: String,
    pub invariant: String,
    pub counterexample: String,
    pub best_response: String,
    pub domain_signature: MixtureVector,
    pub evidence_refs: Vec<String>,
}

/// Identifiers generated by one committed capture session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureReceipt {
    pub intent_id: i64,
    pub observation_id: i64,
    /// In capture order; the operator-facing listing is 1-indexed.
    pub hypothesis_ids: Vec<i64>,
    pub test_id: i64,
    pub outcome_id: i64,
}

/// Evidence-reference token for a generated test record.
pub fn test_ref(test_id: i64) -> String {
    format!("test:{test_id}")
}
