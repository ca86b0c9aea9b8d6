use crate::{BuildDiagnostic, GraphEdge, GraphNode, NodeRole, ProcessMap};
use procmap_core::{EdgeObservation, GraphConfig, IdStrategy, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Turns edge observations into a [`ProcessMap`].
///
/// Nodes appear in order of first sight (source before target, edges in input
/// order). Every observation yields exactly one edge; parallel edges are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMapBuilder {
    start_label: String,
    end_label: String,
    id_strategy: IdStrategy,
}

impl Default for ProcessMapBuilder {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

impl ProcessMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GraphConfig) -> Self {
        Self {
            start_label: config.start_label.clone(),
            end_label: config.end_label.clone(),
            id_strategy: config.id_strategy,
        }
    }

    pub fn with_start_label(mut self, label: impl Into<String>) -> Self {
        self.start_label = label.into();
        self
    }

    pub fn with_end_label(mut self, label: impl Into<String>) -> Self {
        self.end_label = label.into();
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    pub fn end_label(&self) -> &str {
        &self.end_label
    }

    pub fn role_of(&self, label: &str) -> NodeRole {
        if label == self.start_label {
            NodeRole::Start
        } else if label == self.end_label {
            NodeRole::End
        } else {
            NodeRole::Regular
        }
    }

    /// Build the map. Never fails; irregular input is reported through
    /// [`ProcessMap::diagnostics`].
    pub fn build(&self, edges: &[EdgeObservation]) -> ProcessMap {
        let mut assembly = Assembly::new(self);

        for (index, observation) in edges.iter().enumerate() {
            let source_id = assembly.intern(&observation.source_event);
            let target_id = assembly.intern(&observation.target_event);

            if observation.occurrence < 0 {
                assembly.report(BuildDiagnostic::NegativeOccurrence {
                    index,
                    source_event: observation.source_event.clone(),
                    target_event: observation.target_event.clone(),
                    occurrence: observation.occurrence,
                });
            }

            assembly
                .edges
                .push(GraphEdge::new(source_id, target_id).with_weight(observation.occurrence));
        }

        let map = assembly.finish();
        debug!(
            nodes = map.nodes.len(),
            edges = map.edges.len(),
            diagnostics = map.diagnostics.len(),
            "built process map"
        );
        map
    }

    /// Like [`ProcessMapBuilder::build`] but rejects input that produced a diagnostic.
    pub fn try_build(&self, edges: &[EdgeObservation]) -> Result<ProcessMap> {
        let mut map = self.build(edges);
        if map.diagnostics.is_empty() {
            return Ok(map);
        }
        Err(map.diagnostics.swap_remove(0).into_error())
    }
}

/// Node id derived from a label by dropping all whitespace.
pub fn sanitize_label(label: &str) -> String {
    label.chars().filter(|c| !c.is_whitespace()).collect()
}

struct Assembly<'a> {
    builder: &'a ProcessMapBuilder,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    diagnostics: Vec<BuildDiagnostic>,
    // label -> index into `nodes`
    by_label: HashMap<String, usize>,
    // id -> index into `nodes`
    by_id: HashMap<String, usize>,
}

impl<'a> Assembly<'a> {
    fn new(builder: &'a ProcessMapBuilder) -> Self {
        Self {
            builder,
            nodes: Vec::new(),
            edges: Vec::new(),
            diagnostics: Vec::new(),
            by_label: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Id of the node for `label`, creating the node on first sight.
    fn intern(&mut self, label: &str) -> String {
        if let Some(&index) = self.by_label.get(label) {
            return self.nodes[index].id.clone();
        }

        let id = match self.builder.id_strategy {
            IdStrategy::Sanitized => self.sanitized_id(label),
            IdStrategy::Surrogate => format!("n{}", self.nodes.len()),
        };

        let index = self.nodes.len();
        self.nodes.push(
            GraphNode::new(id.clone(), label.to_string()).with_role(self.builder.role_of(label)),
        );
        self.by_label.insert(label.to_string(), index);
        self.by_id.insert(id.clone(), index);
        id
    }

    fn sanitized_id(&mut self, label: &str) -> String {
        let id = sanitize_label(label);
        let Some(&owner) = self.by_id.get(&id) else {
            return id;
        };

        let assigned = (1..)
            .map(|k| format!("{}~{}", id, k))
            .find(|candidate| !self.by_id.contains_key(candidate))
            .unwrap_or_else(|| format!("{}~{}", id, self.nodes.len()));

        let existing = self.nodes[owner].label.clone();
        self.report(BuildDiagnostic::IdCollision {
            id,
            label: label.to_string(),
            existing,
            assigned: assigned.clone(),
        });
        assigned
    }

    fn report(&mut self, diagnostic: BuildDiagnostic) {
        warn!("process map: {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn finish(self) -> ProcessMap {
        ProcessMap {
            nodes: self.nodes,
            edges: self.edges,
            diagnostics: self.diagnostics,
        }
    }
}
