/// Node registry for the pipe leak monitoring service.
///
/// Defines the sensor nodes the monitor tracks and the display label for
/// each. Nodes are listed in the order the dashboard shows them; that same
/// order is used when the audit log walks every node's history.

use serde::Deserialize;

/// Label shown for a node id that is not in the registry.
pub const UNKNOWN_NODE_LABEL: &str = "Unknown Node";

/// A single monitored sensor node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Node {
    /// Feed path segment for this node, e.g. `pipe_1`.
    pub id: String,
    /// Human-readable name shown on the dashboard.
    pub label: String,
}

impl Node {
    pub fn new(id: &str, label: &str) -> Self {
        Node {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// The built-in three-node deployment.
pub static DEFAULT_NODES: &[(&str, &str)] = &[
    ("pipe_1", "Sensor #1"),
    ("pipe_2", "Sensor #2"),
    ("pipe_3", "Sensor #3"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        NodeRegistry {
            nodes: DEFAULT_NODES
                .iter()
                .map(|(id, label)| Node::new(id, label))
                .collect(),
        }
    }
}

impl NodeRegistry {
    pub fn new(nodes: Vec<Node>) -> Self {
        NodeRegistry { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node ids in registry order.
    pub fn ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Looks up a node by id. Returns `None` if not found.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Display label for a node, falling back to `UNKNOWN_NODE_LABEL`.
    pub fn label_for(&self, id: &str) -> &str {
        self.find(id)
            .map(|n| n.label.as_str())
            .unwrap_or(UNKNOWN_NODE_LABEL)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
