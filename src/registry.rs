//! Loop registries.
//!
//! A registry maps a positive loop id to the ordered boundary of a simple
//! cycle. The order matters for the polygon tests; set semantics are used for
//! every comparison between loops.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::board::Coord;

/// Registry key. Ids start at 1.
pub type LoopId = u32;

/// Id → boundary mapping with the subset merge rule of [`LoopRegistry::register`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoopRegistry {
    entries: BTreeMap<LoopId, Vec<Coord>>,
}

/// Set view of a boundary.
pub fn point_set(points: &[Coord]) -> HashSet<Coord> {
    points.iter().copied().collect()
}

impl LoopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: LoopId) -> Option<&[Coord]> {
        self.entries.get(&id).map(Vec::as_slice)
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (LoopId, &[Coord])> {
        self.entries.iter().map(|(&id, pts)| (id, pts.as_slice()))
    }

    /// Set views of all entries, in ascending id order.
    pub fn point_sets(&self) -> Vec<HashSet<Coord>> {
        self.entries.values().map(|pts| point_set(pts)).collect()
    }

    /// Id a genuinely new entry would receive.
    pub fn next_id(&self) -> LoopId {
        self.entries.keys().next_back().map_or(1, |&id| id + 1)
    }

    /// Merge `points` into the registry and return the id that now covers it.
    ///
    /// - `points` is a subset of an existing entry: unchanged, that entry's id.
    /// - an existing entry is a subset of `points`: the entry is replaced in place.
    /// - otherwise: a new entry under [`LoopRegistry::next_id`].
    pub fn register(&mut self, points: Vec<Coord>) -> LoopId {
        let new_set = point_set(&points);
        for (&id, existing) in self.entries.iter_mut() {
            let existing_set = point_set(existing);
            if new_set.is_subset(&existing_set) {
                return id;
            }
            if existing_set.is_subset(&new_set) {
                *existing = points;
                return id;
            }
        }

        let id = self.next_id();
        self.entries.insert(id, points);
        id
    }

    /// Store an entry under an explicit id, bypassing the merge rule.
    ///
    /// Used when hydrating a stored board.
    pub fn insert(&mut self, id: LoopId, points: Vec<Coord>) -> Option<Vec<Coord>> {
        self.entries.insert(id, points)
    }

    pub fn remove(&mut self, id: LoopId) -> Option<Vec<Coord>> {
        self.entries.remove(&id)
    }
}

impl From<BTreeMap<LoopId, Vec<Coord>>> for LoopRegistry {
    fn from(entries: BTreeMap<LoopId, Vec<Coord>>) -> Self {
        Self { entries }
    }
}

impl From<LoopRegistry> for BTreeMap<LoopId, Vec<Coord>> {
    fn from(registry: LoopRegistry) -> Self {
        registry.entries
    }
}
