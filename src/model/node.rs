//! Node in the overlap graph.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value};

/// Dense node index, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three disjoint node classes of the tripartite graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeClass {
    Entity,
    Event,
    Location,
}

impl NodeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::Entity => "entity",
            NodeClass::Event => "event",
            NodeClass::Location => "location",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of an overlap-event node: the sorted entity pair, where they met,
/// and a disambiguation index that keeps repeated meetings apart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventKey<E, L> {
    pub pair: (E, E),
    pub location: L,
    pub index: usize,
}

impl<E: Ord, L> EventKey<E, L> {
    /// Builds a key with the pair normalised so `pair.0 <= pair.1`.
    pub fn new(a: E, b: E, location: L, index: usize) -> Self {
        let pair = if a <= b { (a, b) } else { (b, a) };
        Self { pair, location, index }
    }
}

/// Identity of a node. Entity and location identifiers live in separate
/// namespaces even when they share a representation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKey<E, L> {
    Entity(E),
    Location(L),
    Event(EventKey<E, L>),
}

impl<E, L> NodeKey<E, L> {
    pub fn class(&self) -> NodeClass {
        match self {
            NodeKey::Entity(_) => NodeClass::Entity,
            NodeKey::Location(_) => NodeClass::Location,
            NodeKey::Event(_) => NodeClass::Event,
        }
    }
}

/// A node in the overlap graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<E, L> {
    pub id: NodeId,
    pub key: NodeKey<E, L>,
    pub class: NodeClass,
    pub properties: PropertyMap,
}

impl<E, L> Node<E, L> {
    pub fn new(id: NodeId, key: NodeKey<E, L>) -> Self {
        let class = key.class();
        Self { id, key, class, properties: PropertyMap::new() }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Shared time recorded on an event node.
    pub fn duration(&self) -> Option<f64> {
        self.get(crate::graph::DURATION).and_then(Value::as_float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key_sorts_pair() {
        let k1 = EventKey::new("B", "A", "_Z", 0);
        let k2 = EventKey::new("A", "B", "_Z", 0);
        assert_eq!(k1, k2);
        assert_eq!(k1.pair, ("A", "B"));
    }

    #[test]
    fn test_key_namespaces_are_distinct() {
        let entity: NodeKey<&str, &str> = NodeKey::Entity("A");
        let location: NodeKey<&str, &str> = NodeKey::Location("A");
        assert_ne!(entity, location);
        assert_eq!(entity.class(), NodeClass::Entity);
        assert_eq!(location.class(), NodeClass::Location);
    }

    #[test]
    fn test_node_class_from_key() {
        let node = Node::new(NodeId(7), NodeKey::Event(EventKey::new(1u32, 2, 'x', 0)))
            .with_property("duration", 2.5);
        assert_eq!(node.class, NodeClass::Event);
        assert_eq!(node.duration(), Some(2.5));
        assert_eq!(node.class.to_string(), "event");
    }
}
