//! Relationship (edge) in the overlap graph.

use serde::{Deserialize, Serialize};
use super::NodeId;

/// Opaque relationship identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelId(pub usize);

impl std::fmt::Display for RelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An undirected edge. Parallel edges between the same endpoints are told
/// apart by `key`, which counts earlier edges over the same unordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelId,
    pub src: NodeId,
    pub dst: NodeId,
    pub key: usize,
}

impl Relationship {
    pub fn new(id: RelId, src: NodeId, dst: NodeId, key: usize) -> Self {
        Self {
            id,
            src,
            dst,
            key,
        }
    }

    /// The "other" end of the relationship from the given node.
    pub fn other_node(&self, from: NodeId) -> Option<NodeId> {
        if from == self.src { Some(self.dst) }
        else if from == self.dst { Some(self.src) }
        else { None }
    }

    /// Whether the edge joins `a` and `b`, in either orientation.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.src == a && self.dst == b) || (self.src == b && self.dst == a)
    }
}
