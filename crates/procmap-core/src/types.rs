use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form fields carried through a record untouched.
pub type Details = Map<String, Value>;

/// One directed transition between two activities with its observed frequency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeObservation {
    pub source_event: String,
    pub target_event: String,
    pub occurrence: i64,
}

impl EdgeObservation {
    pub fn new(source: impl Into<String>, target: impl Into<String>, occurrence: i64) -> Self {
        Self {
            source_event: source.into(),
            target_event: target.into(),
            occurrence,
        }
    }
}

/// A statistically computed deviation measure tied to a subset of cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRecord {
    pub effect_size: f64,
    pub cases_within: u64,
    #[serde(flatten)]
    pub details: Details,
}

impl InsightRecord {
    pub fn new(effect_size: f64, cases_within: u64) -> Self {
        Self {
            effect_size,
            cases_within,
            details: Details::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Share of the case population this insight touches.
    pub fn coverage(&self, context: &ReferenceContext) -> Option<f64> {
        context
            .is_valid()
            .then(|| self.cases_within as f64 / context.num_traces as f64)
    }
}

/// Event-log statistics used as the reference population for coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceContext {
    pub num_traces: i64,
    #[serde(flatten)]
    pub details: Details,
}

impl ReferenceContext {
    pub fn new(num_traces: i64) -> Self {
        Self {
            num_traces,
            details: Details::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.num_traces > 0
    }
}

/// A named deviation pattern grouping one or more backend conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactResult {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub num_affected_cases: u64,
    #[serde(default)]
    pub conditions: Vec<Value>,
    #[serde(flatten)]
    pub details: Details,
}
