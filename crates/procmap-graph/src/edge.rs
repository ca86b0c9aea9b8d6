use serde::{Deserialize, Serialize};

/// One observed transition between two nodes, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source_id: String,
    pub target_id: String,
    pub weight: i64,
}

impl GraphEdge {
    pub fn new(source_id: String, target_id: String) -> Self {
        Self {
            source_id,
            target_id,
            weight: 1,
        }
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = weight;
        self
    }
}
