//! End-to-end tests for overlap graph construction.
//!
//! Tests the pipeline: stay records → residence map → tripartite multigraph.

use overlap_residence::graph::DURATION;
use overlap_residence::{
    compute_shared_residence_times, make_overlap_graph, residence_graph, Error, EventKey,
    NodeClass, NodeKey, OverlapConfig, OverlapGraph, OverlapGraphBuilder, ResidenceMap, Value,
};
use pretty_assertions::assert_eq;

type Key = NodeKey<&'static str, &'static str>;

fn reference_graph() -> OverlapGraph<&'static str, &'static str> {
    let residence = compute_shared_residence_times(vec![
        ("A", "_Z", 0.0, 6.0),
        ("B", "_Z", 4.0, 9.0),
        ("A", "_Y", 6.0, 10.0),
        ("C", "_Y", 8.0, 12.0),
    ]);
    make_overlap_graph(&residence).unwrap()
}

fn event(a: &'static str, b: &'static str, loc: &'static str, index: usize) -> Key {
    NodeKey::Event(EventKey::new(a, b, loc, index))
}

// ============================================================================
// 1. Shape
// ============================================================================

#[test]
fn test_empty_map_gives_empty_graph() {
    let graph = make_overlap_graph(&ResidenceMap::<String, String>::new()).unwrap();
    assert_eq!(graph.node_count(), 0);
    assert_eq!(graph.relationship_count(), 0);
    assert!(graph.is_empty());
}

#[test]
fn test_single_triple_gives_four_nodes_three_edges() {
    let residence: ResidenceMap<&str, &str> = [("B", "_Z", "A", 2.0)].into_iter().collect();
    let graph = make_overlap_graph(&residence).unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.class_count(NodeClass::Entity), 2);
    assert_eq!(graph.class_count(NodeClass::Location), 1);
    assert_eq!(graph.class_count(NodeClass::Event), 1);
    assert_eq!(graph.relationship_count(), 3);

    let ev = graph.node_by_key(&event("A", "B", "_Z", 0)).unwrap();
    assert_eq!(ev.get(DURATION), Some(&Value::Float(2.0)));
}

#[test]
fn test_reference_graph_shape() {
    let graph = reference_graph();
    assert_eq!(graph.class_count(NodeClass::Entity), 3);
    assert_eq!(graph.class_count(NodeClass::Location), 2);
    assert_eq!(graph.class_count(NodeClass::Event), 2);
    assert_eq!(graph.relationship_count(), 6);
}

#[test]
fn test_insertion_order_follows_residence_map() {
    let graph = reference_graph();
    let keys: Vec<Key> = graph.nodes().map(|n| n.key.clone()).collect();
    assert_eq!(
        keys,
        vec![
            NodeKey::Entity("B"),
            NodeKey::Location("_Z"),
            NodeKey::Entity("A"),
            event("A", "B", "_Z", 0),
            NodeKey::Entity("C"),
            NodeKey::Location("_Y"),
            event("A", "C", "_Y", 0),
        ]
    );
}

// ============================================================================
// 2. Edges
// ============================================================================

#[test]
fn test_event_connects_both_entities_and_location() {
    let graph = reference_graph();
    let ev = graph.node_id(&event("A", "B", "_Z", 0)).unwrap();
    let a = graph.node_id(&NodeKey::Entity("A")).unwrap();
    let b = graph.node_id(&NodeKey::Entity("B")).unwrap();
    let z = graph.node_id(&NodeKey::Location("_Z")).unwrap();

    let mut neighbors: Vec<_> = graph.neighbors(ev).collect();
    neighbors.sort();
    let mut expected = vec![a, b, z];
    expected.sort();
    assert_eq!(neighbors, expected);
}

#[test]
fn test_entities_never_touch_locations_directly() {
    let graph = reference_graph();
    for rel in graph.relationships() {
        let classes = (
            graph.node(rel.src).unwrap().class,
            graph.node(rel.dst).unwrap().class,
        );
        assert!(
            matches!(
                classes,
                (NodeClass::Entity, NodeClass::Event) | (NodeClass::Event, NodeClass::Location)
            ),
            "unexpected edge classes {classes:?}"
        );
    }
}

#[test]
fn test_shared_entity_has_one_node_many_edges() {
    let graph = reference_graph();
    let a = graph.node_id(&NodeKey::Entity("A")).unwrap();
    assert_eq!(graph.degree(a), 2);
}

// ============================================================================
// 3. Disambiguation
// ============================================================================

#[test]
fn test_union_of_two_builds_has_distinct_event_keys() {
    let residence: ResidenceMap<&str, &str> =
        [("B", "_Z", "A", 2.0), ("C", "_Y", "A", 2.0)].into_iter().collect();

    let first = make_overlap_graph(&residence).unwrap();
    let mut builder = OverlapGraphBuilder::from_graph(first);
    builder.add_residence(&residence).unwrap();
    let union = builder.finish();

    assert_eq!(union.class_count(NodeClass::Event), 4);
    for (pair, loc) in [(("A", "B"), "_Z"), (("A", "C"), "_Y")] {
        assert!(union.contains_key(&event(pair.0, pair.1, loc, 0)));
        assert!(union.contains_key(&event(pair.0, pair.1, loc, 1)));
        assert!(!union.contains_key(&event(pair.0, pair.1, loc, 2)));
    }
    // Entities and locations are shared, edges are additive.
    assert_eq!(union.class_count(NodeClass::Entity), 3);
    assert_eq!(union.class_count(NodeClass::Location), 2);
    assert_eq!(union.relationship_count(), 12);
}

#[test]
fn test_reversed_pair_shares_root_key() {
    // A→B at L and B→A at L sort to the same pair.
    let residence: ResidenceMap<&str, &str> =
        [("A", "L", "B", 1.0), ("B", "L", "A", 5.0)].into_iter().collect();
    let graph = make_overlap_graph(&residence).unwrap();

    let first = graph.node_by_key(&event("A", "B", "L", 0)).unwrap();
    let second = graph.node_by_key(&event("A", "B", "L", 1)).unwrap();
    assert_eq!(first.duration(), Some(1.0));
    assert_eq!(second.duration(), Some(5.0));
}

#[test]
fn test_index_cap_from_config() {
    let residence: ResidenceMap<&str, &str> =
        [("A", "L", "B", 1.0), ("B", "L", "A", 5.0)].into_iter().collect();
    let config = OverlapConfig::default().with_probe_limit(0);
    let err = overlap_residence::build_graph(&residence, &config).unwrap_err();
    assert!(matches!(err, Error::ProbeLimitExceeded { limit: 0 }));

    let relaxed = OverlapConfig::default().with_probe_limit(1);
    assert!(overlap_residence::build_graph(&residence, &relaxed).is_ok());
}

// ============================================================================
// 4. One-shot pipeline
// ============================================================================

#[test]
fn test_residence_graph_pipeline() {
    let graph = residence_graph(
        vec![("A", "_Z", 0, 6), ("B", "_Z", 4, 9), ("A", "_Y", 6, 10), ("C", "_Y", 8, 12)],
        &OverlapConfig::strict(),
    )
    .unwrap();
    assert_eq!(graph.class_count(NodeClass::Event), 2);
}

#[test]
fn test_residence_graph_rejects_unsorted_in_strict_mode() {
    let err = residence_graph(
        vec![("A", "L", 3.0, 4.0), ("B", "L", 1.0, 5.0)],
        &OverlapConfig::strict(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsortedInput { .. }));
}
