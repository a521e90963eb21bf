//! # overlap-residence — Shared Residence Times as a Tripartite Graph
//!
//! Given stay records `(entity, location, start, end)` sorted by start time,
//! find who shared which location with whom and for how long, then lay the
//! result out as an entity / event / location multigraph for export.
//!
//! ## Design Principles
//!
//! 1. **Values in, values out**: the sweep and the builder are pure
//!    functions over owned working state; nothing survives a call
//! 2. **Tagged keys**: entity, location and event nodes never share a
//!    namespace, whatever the identifier types look like
//! 3. **Permissive by default**: preconditions are documented, and checking
//!    them is opt-in through [`OverlapConfig`]
//!
//! ## Quick Start
//!
//! ```rust
//! use overlap_residence::{compute_shared_residence_times, make_overlap_graph, NodeClass};
//!
//! # fn example() -> overlap_residence::Result<()> {
//! let residence = compute_shared_residence_times(vec![
//!     ("A", "_Z", 0.0, 6.0),
//!     ("B", "_Z", 4.0, 9.0),
//!     ("A", "_Y", 6.0, 10.0),
//!     ("C", "_Y", 8.0, 12.0),
//! ]);
//! assert_eq!(residence.duration(&"B", &"_Z", &"A"), Some(2.0));
//!
//! let graph = make_overlap_graph(&residence)?;
//! assert_eq!(graph.class_count(NodeClass::Event), 2);
//!
//! let mut gml = Vec::new();
//! overlap_residence::export::write_gml(&graph, &mut gml)?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! Collapsing the graph onto a single node class (e.g. an entity–entity
//! contact graph) is not provided; build it from [`OverlapGraph::nodes_of_class`]
//! and [`OverlapGraph::neighbors`].

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod sweep;
pub mod graph;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Interval, StayRecord, Node, NodeId, NodeKey, NodeClass, EventKey,
    Relationship, RelId, Value, PropertyMap,
};

// ============================================================================
// Re-exports: Pipeline
// ============================================================================

pub use config::{OrderingPolicy, OverlapConfig};
pub use sweep::{compute_shared_residence_times, run_sweep, ResidenceMap};
pub use graph::{build_graph, make_overlap_graph, OverlapGraph, OverlapGraphBuilder};

use std::hash::Hash;

/// Sweep `records` and build the overlap graph in one call, applying `config`
/// to both stages.
pub fn residence_graph<E, L, I, R>(records: I, config: &OverlapConfig) -> Result<OverlapGraph<E, L>>
where
    E: Clone + Ord + Hash,
    L: Clone + Ord + Hash,
    I: IntoIterator<Item = R>,
    R: Into<StayRecord<E, L>>,
{
    let residence = run_sweep(records, config)?;
    build_graph(&residence, config)
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsorted input at record {index}: start {start} precedes previous start {previous}")]
    UnsortedInput { index: usize, start: f64, previous: f64 },

    #[error("NaN timestamp at record {index}: start {start}, end {end}")]
    NanTimestamp { index: usize, start: f64, end: f64 },

    #[error("Inverted interval at record {index}: start {start} is after end {end}")]
    InvertedInterval { index: usize, start: f64, end: f64 },

    #[error("Disambiguation index exceeded probe limit {limit}")]
    ProbeLimitExceeded { limit: usize },

    #[error("Duplicate node label in export: {0}")]
    DuplicateLabel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
