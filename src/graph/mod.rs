//! # Overlap Graph
//!
//! Tripartite undirected multigraph: entities, overlap events, locations.
//!
//! ```text
//!   (entity A) ──┐
//!                ├── (event {A, B} @ L #i {duration}) ── (location L)
//!   (entity B) ──┘
//! ```
//!
//! Nodes are addressed by [`NodeKey`] and stored densely in insertion order.
//! Adding a node whose key already exists is a no-op; adding an edge always
//! creates a new one, so the same pair of nodes may be joined several times.

pub mod builder;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::model::*;

pub use builder::{build_graph, make_overlap_graph, OverlapGraphBuilder};

/// Property name of the shared time carried by event nodes.
pub const DURATION: &str = "duration";

type Adjacency = SmallVec<[RelId; 4]>;

// ============================================================================
// OverlapGraph
// ============================================================================

/// In-memory overlap multigraph.
#[derive(Debug, Clone)]
pub struct OverlapGraph<E, L> {
    nodes: Vec<Node<E, L>>,
    relationships: Vec<Relationship>,
    /// key → node id
    index: HashMap<NodeKey<E, L>, NodeId>,
    /// node id → incident relationship ids (a self-loop appears once)
    adjacency: Vec<Adjacency>,
}

impl<E, L> Default for OverlapGraph<E, L> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            relationships: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
        }
    }
}

impl<E, L> OverlapGraph<E, L>
where
    E: Clone + Eq + std::hash::Hash,
    L: Clone + Eq + std::hash::Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Counts
    // ========================================================================

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn class_count(&self, class: NodeClass) -> usize {
        self.nodes.iter().filter(|n| n.class == class).count()
    }

    // ========================================================================
    // Node access
    // ========================================================================

    pub fn contains_key(&self, key: &NodeKey<E, L>) -> bool {
        self.index.contains_key(key)
    }

    pub fn node_id(&self, key: &NodeKey<E, L>) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<E, L>> {
        self.nodes.get(id.0)
    }

    pub fn node_by_key(&self, key: &NodeKey<E, L>) -> Option<&Node<E, L>> {
        self.node_id(key).and_then(|id| self.node(id))
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<E, L>> {
        self.nodes.iter()
    }

    pub fn nodes_of_class(&self, class: NodeClass) -> impl Iterator<Item = &Node<E, L>> {
        self.nodes.iter().filter(move |n| n.class == class)
    }

    // ========================================================================
    // Node insertion
    // ========================================================================

    /// Returns the id for `key`, inserting a bare node if it is new.
    /// An existing node keeps its properties.
    pub fn ensure_node(&mut self, key: NodeKey<E, L>) -> NodeId {
        self.ensure_node_with(key, PropertyMap::new)
    }

    /// Like [`ensure_node`](Self::ensure_node); `props` only runs for a new key.
    pub fn ensure_node_with(
        &mut self,
        key: NodeKey<E, L>,
        props: impl FnOnce() -> PropertyMap,
    ) -> NodeId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(id, key.clone());
        node.properties = props();
        self.nodes.push(node);
        self.adjacency.push(Adjacency::new());
        self.index.insert(key, id);
        id
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Adds an undirected edge. Returns `None` if either endpoint is unknown.
    pub fn add_relationship(&mut self, a: NodeId, b: NodeId) -> Option<RelId> {
        if a.0 >= self.nodes.len() || b.0 >= self.nodes.len() {
            return None;
        }
        let key = self.edges_between(a, b).count();
        let id = RelId(self.relationships.len());
        self.relationships.push(Relationship::new(id, a, b, key));

        self.adjacency[a.0].push(id);
        if a != b {
            self.adjacency[b.0].push(id);
        }
        Some(id)
    }

    pub fn relationship(&self, id: RelId) -> Option<&Relationship> {
        self.relationships.get(id.0)
    }

    /// Relationships in insertion order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    /// Relationships incident to `node`.
    pub fn relationships_of(&self, node: NodeId) -> impl Iterator<Item = &Relationship> {
        self.adjacency
            .get(node.0)
            .into_iter()
            .flat_map(|rels| rels.iter())
            .filter_map(|rid| self.relationships.get(rid.0))
    }

    /// Parallel edges joining `a` and `b`, in either orientation.
    pub fn edges_between(&self, a: NodeId, b: NodeId) -> impl Iterator<Item = &Relationship> {
        self.relationships_of(a).filter(move |rel| rel.connects(a, b))
    }

    /// Neighbour ids of `node`, one per incident edge.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.relationships_of(node).filter_map(move |rel| rel.other_node(node))
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(node.0).map_or(0, |rels| rels.len())
    }
}
