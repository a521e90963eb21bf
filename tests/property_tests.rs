//! Property tests for interval predicates, the sweep and the builder.

use overlap_residence::{
    compute_shared_residence_times, make_overlap_graph, Interval, NodeClass, OverlapGraphBuilder,
};
use proptest::prelude::*;

fn stay() -> impl Strategy<Value = (f64, f64)> {
    (0.0f64..100.0, 0.0f64..50.0).prop_map(|(start, len)| (start, start + len))
}

/// Sorted stays over a handful of entities and locations.
fn records() -> impl Strategy<Value = Vec<(u8, u8, f64, f64)>> {
    prop::collection::vec((0u8..5, 0u8..3, stay()), 0..40).prop_map(|rows| {
        let mut rows: Vec<_> = rows
            .into_iter()
            .map(|(entity, location, (start, end))| (entity, location, start, end))
            .collect();
        rows.sort_by(|a, b| a.2.total_cmp(&b.2));
        rows
    })
}

proptest! {
    #[test]
    fn overlaps_is_symmetric((s1, e1) in stay(), (s2, e2) in stay(), same in any::<bool>()) {
        let a = Interval::new(s1, e1, 0u8, 0u8);
        let b = Interval::new(s2, e2, 1u8, if same { 0 } else { 1 });
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn overlap_duration_is_symmetric_when_overlapping((s1, e1) in stay(), (s2, e2) in stay()) {
        let a = Interval::new(s1, e1, 0u8, 0u8);
        let b = Interval::new(s2, e2, 1u8, 0u8);
        prop_assume!(a.overlaps(&b));
        // The formula is min(x, y) with x and y swapped between directions.
        prop_assert_eq!(a.overlap_duration(&b), b.overlap_duration(&a));
        prop_assert!(a.overlap_duration(&b) >= 0.0);
    }

    #[test]
    fn overlap_duration_never_below_true_intersection((s1, e1) in stay(), (s2, e2) in stay()) {
        let a = Interval::new(s1, e1, 0u8, 0u8);
        let b = Interval::new(s2, e2, 1u8, 0u8);
        prop_assume!(a.overlaps(&b));
        let intersection = e1.min(e2) - s1.max(s2);
        prop_assert!(a.overlap_duration(&b) >= intersection);
    }

    #[test]
    fn contains_matches_bounds((s, e) in stay(), t in -10.0f64..160.0) {
        let a = Interval::new(s, e, 0u8, 0u8);
        prop_assert_eq!(a.contains(t), s <= t && t <= e);
    }

    #[test]
    fn sweep_never_records_self_overlap(rows in records()) {
        let residence = compute_shared_residence_times(rows);
        for (entity, _, other, duration) in residence.triples() {
            prop_assert_ne!(entity, other);
            prop_assert!(duration >= 0.0);
        }
    }

    #[test]
    fn graph_has_one_event_and_three_edges_per_entry(rows in records()) {
        let residence = compute_shared_residence_times(rows);
        let graph = make_overlap_graph(&residence).unwrap();
        let entries = residence.entry_count();
        prop_assert_eq!(graph.class_count(NodeClass::Event), entries);
        prop_assert_eq!(graph.relationship_count(), 3 * entries);
        prop_assert_eq!(graph.is_empty(), residence.is_empty());
    }

    #[test]
    fn repeated_builds_never_collide(rows in records(), repeats in 1usize..4) {
        let residence = compute_shared_residence_times(rows);
        let mut builder = OverlapGraphBuilder::new();
        for _ in 0..repeats {
            builder.add_residence(&residence).unwrap();
        }
        let graph = builder.finish();
        prop_assert_eq!(
            graph.class_count(NodeClass::Event),
            repeats * residence.entry_count()
        );
    }
}
