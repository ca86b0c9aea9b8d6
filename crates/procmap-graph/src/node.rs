use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural role of an activity in the process map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Start,
    End,
    #[default]
    Regular,
}

impl NodeRole {
    /// Background colour the renderer uses to highlight sentinel nodes.
    pub fn highlight_color(&self) -> Option<&'static str> {
        match self {
            NodeRole::Start => Some("#00cc66"),
            NodeRole::End => Some("#ff3300"),
            NodeRole::Regular => None,
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeRole::Start => "start",
            NodeRole::End => "end",
            NodeRole::Regular => "regular",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub role: NodeRole,
}

impl GraphNode {
    pub fn new(id: String, label: String) -> Self {
        Self {
            id,
            label,
            role: NodeRole::Regular,
        }
    }

    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = role;
        self
    }
}
