use crate::{GraphEdge, GraphNode, NodeRole};
use procmap_core::ProcMapError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Irregularity noticed while assembling a process map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildDiagnostic {
    /// `label` sanitizes to an id already owned by `existing`; it was given `assigned` instead.
    IdCollision {
        id: String,
        label: String,
        existing: String,
        assigned: String,
    },
    NegativeOccurrence {
        index: usize,
        source_event: String,
        target_event: String,
        occurrence: i64,
    },
}

impl BuildDiagnostic {
    pub fn into_error(self) -> ProcMapError {
        match self {
            BuildDiagnostic::IdCollision {
                id,
                label,
                existing,
                ..
            } => ProcMapError::IdCollision {
                id,
                label,
                existing,
            },
            BuildDiagnostic::NegativeOccurrence {
                index,
                source_event,
                target_event,
                occurrence,
            } => ProcMapError::NegativeOccurrence {
                index,
                source_event,
                target_event,
                occurrence,
            },
        }
    }
}

impl fmt::Display for BuildDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildDiagnostic::IdCollision {
                id,
                label,
                existing,
                assigned,
            } => write!(
                f,
                "label '{}' collides with '{}' on id '{}', assigned '{}'",
                label, existing, id, assigned
            ),
            BuildDiagnostic::NegativeOccurrence {
                index,
                source_event,
                target_event,
                occurrence,
            } => write!(
                f,
                "edge #{} {} -> {} has negative occurrence {}",
                index, source_event, target_event, occurrence
            ),
        }
    }
}

/// Deduplicated node/edge model handed to the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessMap {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<BuildDiagnostic>,
}

impl ProcessMap {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |n| n.role == role)
    }

    pub fn total_weight(&self) -> i64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Element list in the shape graph-drawing libraries (cytoscape and
    /// friends) consume: `data` payloads plus a highlight style on sentinels.
    pub fn to_elements(&self) -> Value {
        let nodes: Vec<Value> = self
            .nodes
            .iter()
            .map(|node| {
                let mut element = json!({ "data": { "id": node.id, "label": node.label } });
                if let Some(color) = node.role.highlight_color() {
                    element["style"] = json!({ "backgroundColor": color });
                }
                element
            })
            .collect();

        let edges: Vec<Value> = self
            .edges
            .iter()
            .map(|edge| {
                json!({
                    "data": {
                        "source": edge.source_id,
                        "target": edge.target_id,
                        "occurrence": edge.weight,
                        "edgeWeight": edge.weight,
                    }
                })
            })
            .collect();

        json!({ "nodes": nodes, "edges": edges })
    }
}
