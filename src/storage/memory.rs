//! In-memory breakpoint store backed by a `BTreeMap`

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use crate::core::{Coord, MemberSet};
use crate::storage::BreakpointStore;

/// In-memory [`BreakpointStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    breakpoints: BTreeMap<Coord, MemberSet>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl BreakpointStore for MemoryStore {
    fn len(&self) -> usize {
        self.breakpoints.len()
    }

    fn get(&self, at: Coord) -> Option<&MemberSet> {
        self.breakpoints.get(&at)
    }

    fn insert(&mut self, at: Coord, members: MemberSet) -> Option<MemberSet> {
        self.breakpoints.insert(at, members)
    }

    fn delete(&mut self, at: Coord) -> Option<MemberSet> {
        self.breakpoints.remove(&at)
    }

    fn floor(&self, at: Coord) -> Option<(Coord, &MemberSet)> {
        self.breakpoints
            .range(..=at)
            .next_back()
            .map(|(c, m)| (*c, m))
    }

    fn ceil(&self, at: Coord) -> Option<(Coord, &MemberSet)> {
        self.breakpoints.range(at..).next().map(|(c, m)| (*c, m))
    }

    fn predecessor(&self, at: Coord) -> Option<(Coord, &MemberSet)> {
        self.breakpoints
            .range(..at)
            .next_back()
            .map(|(c, m)| (*c, m))
    }

    fn successor(&self, at: Coord) -> Option<(Coord, &MemberSet)> {
        self.breakpoints
            .range((Bound::Excluded(at), Bound::Unbounded))
            .next()
            .map(|(c, m)| (*c, m))
    }

    fn first(&self) -> Option<(Coord, &MemberSet)> {
        self.breakpoints.first_key_value().map(|(c, m)| (*c, m))
    }

    fn last(&self) -> Option<(Coord, &MemberSet)> {
        self.breakpoints.last_key_value().map(|(c, m)| (*c, m))
    }

    fn add_member(&mut self, at: Coord, member: &Arc<str>) -> bool {
        self.breakpoints
            .get_mut(&at)
            .is_some_and(|members| members.insert(Arc::clone(member)))
    }

    fn remove_member(&mut self, at: Coord, member: &str) -> bool {
        self.breakpoints
            .get_mut(&at)
            .is_some_and(|members| members.remove(member))
    }

    fn coords_in(&self, lower: Bound<Coord>, upper: Bound<Coord>) -> Vec<Coord> {
        if is_empty_window(lower, upper) {
            return Vec::new();
        }
        self.breakpoints
            .range((lower, upper))
            .map(|(c, _)| *c)
            .collect()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (Coord, &MemberSet)> + '_> {
        Box::new(self.breakpoints.iter().map(|(c, m)| (*c, m)))
    }

    fn clear(&mut self) {
        self.breakpoints.clear();
    }
}

/// `BTreeMap::range` panics on inverted windows and on `(x, x)` with both ends
/// excluded, so those are filtered out up front.
fn is_empty_window(lower: Bound<Coord>, upper: Bound<Coord>) -> bool {
    match (lower, upper) {
        (Bound::Included(lo), Bound::Included(hi)) => lo > hi,
        (Bound::Included(lo), Bound::Excluded(hi))
        | (Bound::Excluded(lo), Bound::Included(hi))
        | (Bound::Excluded(lo), Bound::Excluded(hi)) => lo >= hi,
        _ => false,
    }
}
