//! Shared residence times: a sweep over start-ordered stay records.
//!
//! ```text
//! records (sorted by start) ──► active set ──► residence[entity][location][other] = duration
//! ```
//!
//! Each incoming stay is compared against every stay still active. A match
//! is recorded only under the *incoming* entity's key; the earlier entity
//! gets no mirrored entry. Stays that ended before the incoming start are
//! retired from the active set, since no later record can reach them.
//!
//! Sortedness is the caller's job. With [`OrderingPolicy::Permissive`] an
//! unsorted stream is processed as-is and quietly misses overlaps; use
//! [`OrderingPolicy::Strict`] to have it rejected instead.

use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map;

use tracing::{debug, trace, warn};

use crate::config::{OrderingPolicy, OverlapConfig};
use crate::model::{Interval, StayRecord};
use crate::{Error, Result};

/// Co-occupant → shared duration.
pub type CoOccupants<E> = BTreeMap<E, f64>;

/// Location → co-occupants met there.
pub type LocationOverlaps<E, L> = BTreeMap<L, CoOccupants<E>>;

// ============================================================================
// ResidenceMap
// ============================================================================

/// `entity → location → co-occupant → shared duration`.
///
/// Sparse: an entity that never met anyone has no key at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidenceMap<E, L> {
    inner: BTreeMap<E, LocationOverlaps<E, L>>,
}

impl<E, L> Default for ResidenceMap<E, L> {
    fn default() -> Self {
        Self { inner: BTreeMap::new() }
    }
}

impl<E: Ord, L: Ord> ResidenceMap<E, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the time `entity` shared with `other` at `location`.
    pub fn insert(&mut self, entity: E, location: L, other: E, duration: f64) -> Option<f64> {
        self.inner
            .entry(entity)
            .or_default()
            .entry(location)
            .or_default()
            .insert(other, duration)
    }

    pub fn get(&self, entity: &E) -> Option<&LocationOverlaps<E, L>> {
        self.inner.get(entity)
    }

    /// Shared duration recorded under `entity` for `other` at `location`.
    pub fn duration(&self, entity: &E, location: &L, other: &E) -> Option<f64> {
        self.inner.get(entity)?.get(location)?.get(other).copied()
    }

    pub fn contains_entity(&self, entity: &E) -> bool {
        self.inner.contains_key(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = &E> {
        self.inner.keys()
    }

    /// Locations at which `entity` met someone.
    pub fn locations<'a>(&'a self, entity: &E) -> impl Iterator<Item = &'a L> + 'a {
        self.inner.get(entity).into_iter().flat_map(|locs| locs.keys())
    }

    pub fn iter(&self) -> btree_map::Iter<'_, E, LocationOverlaps<E, L>> {
        self.inner.iter()
    }

    /// Flattened `(entity, location, co-occupant, duration)` view.
    pub fn triples(&self) -> impl Iterator<Item = (&E, &L, &E, f64)> {
        self.inner.iter().flat_map(|(entity, locs)| {
            locs.iter().flat_map(move |(location, others)| {
                others.iter().map(move |(other, duration)| (entity, location, other, *duration))
            })
        })
    }

    /// Number of entities with at least one overlap.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Total number of `(entity, location, co-occupant)` entries.
    pub fn entry_count(&self) -> usize {
        self.inner.values().flat_map(BTreeMap::values).map(BTreeMap::len).sum()
    }
}

impl<'a, E, L> IntoIterator for &'a ResidenceMap<E, L> {
    type Item = (&'a E, &'a LocationOverlaps<E, L>);
    type IntoIter = btree_map::Iter<'a, E, LocationOverlaps<E, L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<E: Ord, L: Ord> FromIterator<(E, L, E, f64)> for ResidenceMap<E, L> {
    fn from_iter<I: IntoIterator<Item = (E, L, E, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (entity, location, other, duration) in iter {
            map.insert(entity, location, other, duration);
        }
        map
    }
}

// ============================================================================
// Sweep state
// ============================================================================

/// Working state of one sweep call. Never outlives the call.
struct ResidenceSweep<E, L> {
    active: BTreeSet<Interval<E, L>>,
    residence: ResidenceMap<E, L>,
    last_start: Option<f64>,
    processed: usize,
}

impl<E: Ord + Clone, L: Ord + Clone> ResidenceSweep<E, L> {
    fn new() -> Self {
        Self {
            active: BTreeSet::new(),
            residence: ResidenceMap::new(),
            last_start: None,
            processed: 0,
        }
    }

    fn check_order(&self, record: &StayRecord<E, L>) -> Result<()> {
        // NaN fails every comparison below, so it has to be caught first.
        if record.start.is_nan() || record.end.is_nan() {
            warn!(index = self.processed, start = record.start, end = record.end, "rejecting NaN stay");
            return Err(Error::NanTimestamp {
                index: self.processed,
                start: record.start,
                end: record.end,
            });
        }
        if record.start > record.end {
            warn!(index = self.processed, start = record.start, end = record.end, "rejecting inverted stay");
            return Err(Error::InvertedInterval {
                index: self.processed,
                start: record.start,
                end: record.end,
            });
        }
        if let Some(previous) = self.last_start {
            if record.start < previous {
                warn!(index = self.processed, start = record.start, previous, "rejecting unsorted stay");
                return Err(Error::UnsortedInput {
                    index: self.processed,
                    start: record.start,
                    previous,
                });
            }
        }
        Ok(())
    }

    fn push(&mut self, record: StayRecord<E, L>) {
        let current = record.into_interval();

        for other in &self.active {
            if other.entity_id != current.entity_id && other.overlaps(&current) {
                let duration = other.overlap_duration(&current);
                trace!(index = self.processed, duration, "overlap");
                self.residence.insert(
                    current.entity_id.clone(),
                    current.location_id.clone(),
                    other.entity_id.clone(),
                    duration,
                );
            }
        }
        self.active.retain(|other| !other.ends_before(current.start));

        self.last_start = Some(current.start);
        self.active.insert(current);
        self.processed += 1;
    }

    fn finish(self) -> ResidenceMap<E, L> {
        debug!(
            records = self.processed,
            still_active = self.active.len(),
            entities = self.residence.len(),
            entries = self.residence.entry_count(),
            "residence sweep complete"
        );
        self.residence
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Compute shared residence times from records sorted ascending by start.
///
/// Precondition violations are not detected; see [`run_sweep`] for a
/// checked variant.
pub fn compute_shared_residence_times<E, L, I, R>(records: I) -> ResidenceMap<E, L>
where
    E: Ord + Clone,
    L: Ord + Clone,
    I: IntoIterator<Item = R>,
    R: Into<StayRecord<E, L>>,
{
    let mut sweep = ResidenceSweep::new();
    for record in records {
        sweep.push(record.into());
    }
    sweep.finish()
}

/// [`compute_shared_residence_times`] honouring `config.ordering`.
pub fn run_sweep<E, L, I, R>(records: I, config: &OverlapConfig) -> Result<ResidenceMap<E, L>>
where
    E: Ord + Clone,
    L: Ord + Clone,
    I: IntoIterator<Item = R>,
    R: Into<StayRecord<E, L>>,
{
    let mut sweep = ResidenceSweep::new();
    for record in records {
        let record = record.into();
        if config.ordering == OrderingPolicy::Strict {
            sweep.check_order(&record)?;
        }
        sweep.push(record);
    }
    Ok(sweep.finish())
}
