//! Residence map → overlap graph.
//!
//! Every `(entity, location, co-occupant, duration)` entry becomes one event
//! node plus three edges:
//!
//! ```text
//! entity ── event      co-occupant ── event      event ── location
//! ```
//!
//! Event keys are `(sorted pair, location, index)`. The index is the smallest
//! one not already present in the graph, so building the same residence map
//! twice into one graph yields events `#0` and `#1` instead of colliding.

use std::hash::Hash;

use tracing::{debug, trace};

use crate::config::OverlapConfig;
use crate::model::*;
use crate::sweep::ResidenceMap;
use crate::{Error, Result};
use super::{OverlapGraph, DURATION};

/// Accumulates residence maps into an [`OverlapGraph`].
#[derive(Debug, Clone)]
pub struct OverlapGraphBuilder<E, L> {
    graph: OverlapGraph<E, L>,
    probe_limit: Option<usize>,
}

impl<E, L> Default for OverlapGraphBuilder<E, L> {
    fn default() -> Self {
        Self { graph: OverlapGraph::default(), probe_limit: None }
    }
}

impl<E, L> OverlapGraphBuilder<E, L>
where
    E: Clone + Ord + Hash,
    L: Clone + Ord + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue building on top of an existing graph.
    pub fn from_graph(graph: OverlapGraph<E, L>) -> Self {
        Self { graph, probe_limit: None }
    }

    pub fn with_config(mut self, config: &OverlapConfig) -> Self {
        self.probe_limit = config.probe_limit;
        self
    }

    /// Cap the disambiguation index. Probing never terminates early without
    /// one, but it always terminates: the graph holds finitely many keys.
    pub fn with_probe_limit(mut self, limit: Option<usize>) -> Self {
        self.probe_limit = limit;
        self
    }

    pub fn graph(&self) -> &OverlapGraph<E, L> {
        &self.graph
    }

    /// Add every overlap of `residence` to the graph.
    ///
    /// All-or-nothing: on error the builder's graph is left exactly as it was.
    pub fn add_residence(&mut self, residence: &ResidenceMap<E, L>) -> Result<&mut Self> {
        let mut scratch = self.graph.clone();
        let mut events = 0usize;

        for (entity, locations) in residence {
            let entity_id = scratch.ensure_node(NodeKey::Entity(entity.clone()));
            for (location, others) in locations {
                let location_id = scratch.ensure_node(NodeKey::Location(location.clone()));
                for (other, &duration) in others {
                    let other_id = scratch.ensure_node(NodeKey::Entity(other.clone()));
                    let key = next_event_key(&scratch, self.probe_limit, entity, other, location)?;
                    trace!(index = key.index, duration, "event node");

                    let event_id = scratch.ensure_node_with(NodeKey::Event(key), || {
                        PropertyMap::from([(DURATION.to_string(), Value::Float(duration))])
                    });
                    link(&mut scratch, entity_id, event_id);
                    link(&mut scratch, other_id, event_id);
                    link(&mut scratch, event_id, location_id);
                    events += 1;
                }
            }
        }

        debug!(
            new_nodes = scratch.node_count() - self.graph.node_count(),
            events,
            relationships = scratch.relationship_count(),
            "residence map added to overlap graph"
        );
        self.graph = scratch;
        Ok(self)
    }

    pub fn finish(self) -> OverlapGraph<E, L> {
        self.graph
    }
}

/// First free `(sorted pair, location, i)` key in `graph`, probing `i = 0, 1, ...`.
fn next_event_key<E, L>(
    graph: &OverlapGraph<E, L>,
    probe_limit: Option<usize>,
    a: &E,
    b: &E,
    location: &L,
) -> Result<EventKey<E, L>>
where
    E: Clone + Ord + Hash,
    L: Clone + Ord + Hash,
{
    let mut key = EventKey::new(a.clone(), b.clone(), location.clone(), 0);
    while graph.contains_key(&NodeKey::Event(key.clone())) {
        if let Some(limit) = probe_limit.filter(|&limit| key.index >= limit) {
            return Err(Error::ProbeLimitExceeded { limit });
        }
        key.index += 1;
    }
    Ok(key)
}

fn link<E, L>(graph: &mut OverlapGraph<E, L>, a: NodeId, b: NodeId)
where
    E: Clone + Eq + Hash,
    L: Clone + Eq + Hash,
{
    let linked = graph.add_relationship(a, b);
    debug_assert!(linked.is_some(), "endpoints {a} and {b} come from ensure_node on this graph");
}

// ============================================================================
// Entry points
// ============================================================================

/// Build a fresh overlap graph with unbounded probing.
///
/// An empty residence map yields an empty graph.
pub fn make_overlap_graph<E, L>(residence: &ResidenceMap<E, L>) -> Result<OverlapGraph<E, L>>
where
    E: Clone + Ord + Hash,
    L: Clone + Ord + Hash,
{
    build_graph(residence, &OverlapConfig::default())
}

/// Build a fresh overlap graph honouring `config.probe_limit`.
pub fn build_graph<E, L>(
    residence: &ResidenceMap<E, L>,
    config: &OverlapConfig,
) -> Result<OverlapGraph<E, L>>
where
    E: Clone + Ord + Hash,
    L: Clone + Ord + Hash,
{
    let mut builder = OverlapGraphBuilder::new().with_config(config);
    builder.add_residence(residence)?;
    Ok(builder.finish())
}
