//! Stay intervals: one entity occupying one location over `[start, end]`.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// An entity's tenure of stay at a location over the closed range `[start, end]`.
///
/// `start <= end` is assumed, never checked here. Intervals order by
/// `(start, end, entity_id, location_id)`; timestamps are compared with
/// [`f64::total_cmp`] so the ordering is total and agrees with `Eq` and `Hash`.
/// `-0.0` and `0.0` are the same instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval<E, L> {
    pub start: f64,
    pub end: f64,
    pub entity_id: E,
    pub location_id: L,
}

impl<E, L> Interval<E, L> {
    pub fn new(start: f64, end: f64, entity_id: E, location_id: L) -> Self {
        Self { start, end, entity_id, location_id }
    }

    /// Whether `value` falls inside the closed time range.
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value <= self.end
    }

    /// Whether the stay finished strictly before `t`.
    pub fn ends_before(&self, t: f64) -> bool {
        self.end < t
    }

    /// Amount of time shared with `other`: `min(other.end - start, end - other.start)`.
    ///
    /// The caller must have checked [`overlaps`](Self::overlaps) first. Nothing
    /// is guarded: disjoint pairs give a negative number, pairs touching at an
    /// endpoint give `0.0`, and a nested pair gives the larger of the two
    /// boundary gaps rather than the inner interval's length.
    pub fn overlap_duration(&self, other: &Self) -> f64 {
        (other.end - self.start).min(self.end - other.start)
    }
}

impl<E, L: PartialEq> Interval<E, L> {
    /// Whether the two stays intersect in time *and* share a location.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end && self.location_id == other.location_id
    }

    /// [`overlap_duration`](Self::overlap_duration) when the intervals overlap, `0.0` otherwise.
    pub fn overlap_time(&self, other: &Self) -> f64 {
        if self.overlaps(other) {
            self.overlap_duration(other)
        } else {
            0.0
        }
    }
}

// ============================================================================
// Ordering / equality / hashing
// ============================================================================

/// Folds `-0.0` into `0.0` so signed zeros compare and hash alike.
fn canonical(t: f64) -> f64 {
    if t == 0.0 { 0.0 } else { t }
}

impl<E: Ord, L: Ord> Ord for Interval<E, L> {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical(self.start)
            .total_cmp(&canonical(other.start))
            .then_with(|| canonical(self.end).total_cmp(&canonical(other.end)))
            .then_with(|| self.entity_id.cmp(&other.entity_id))
            .then_with(|| self.location_id.cmp(&other.location_id))
    }
}

impl<E: Ord, L: Ord> PartialOrd for Interval<E, L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Ord, L: Ord> PartialEq for Interval<E, L> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E: Ord, L: Ord> Eq for Interval<E, L> {}

impl<E: Hash, L: Hash> Hash for Interval<E, L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // total_cmp equality is bit equality once zeros are folded.
        canonical(self.start).to_bits().hash(state);
        canonical(self.end).to_bits().hash(state);
        self.entity_id.hash(state);
        self.location_id.hash(state);
    }
}

// ============================================================================
// Stay records (sweep input)
// ============================================================================

/// One input row of the sweep: `(entity_id, location_id, start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StayRecord<E, L> {
    pub entity_id: E,
    pub location_id: L,
    pub start: f64,
    pub end: f64,
}

impl<E, L> StayRecord<E, L> {
    pub fn new(entity_id: E, location_id: L, start: f64, end: f64) -> Self {
        Self { entity_id, location_id, start, end }
    }

    pub fn into_interval(self) -> Interval<E, L> {
        Interval::new(self.start, self.end, self.entity_id, self.location_id)
    }
}

impl<E, L, T: Into<f64>> From<(E, L, T, T)> for StayRecord<E, L> {
    fn from((entity_id, location_id, start, end): (E, L, T, T)) -> Self {
        Self::new(entity_id, location_id, start.into(), end.into())
    }
}

impl<E, L> From<StayRecord<E, L>> for Interval<E, L> {
    fn from(record: StayRecord<E, L>) -> Self {
        record.into_interval()
    }
}
