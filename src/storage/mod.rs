//! Storage module for breakpoints
//!
//! The engines only need an ordered map from coordinate to member set with
//! neighbour queries. [`BreakpointStore`] captures that contract so another
//! backing store can stand in for the in-memory one.

use std::ops::Bound;
use std::sync::Arc;

use crate::core::{Coord, MemberSet};

pub mod memory;

// Re-export key types
pub use memory::MemoryStore;

/// Ordered coordinate -> member set map
///
/// Neighbour queries (`floor`, `ceil`, `predecessor`, `successor`) are expected
/// to be O(log n). Mutual exclusion is not this trait's concern; callers hold
/// the store's exclusive section across a whole operation.
pub trait BreakpointStore {
    /// Number of breakpoints
    fn len(&self) -> usize;

    /// Whether the store holds no breakpoints
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members at exactly `at`
    fn get(&self, at: Coord) -> Option<&MemberSet>;

    /// Whether a breakpoint exists at exactly `at`
    fn contains(&self, at: Coord) -> bool {
        self.get(at).is_some()
    }

    /// Insert or replace the breakpoint at `at`
    fn insert(&mut self, at: Coord, members: MemberSet) -> Option<MemberSet>;

    /// Delete the breakpoint at `at`
    fn delete(&mut self, at: Coord) -> Option<MemberSet>;

    /// Greatest breakpoint `<= at`
    fn floor(&self, at: Coord) -> Option<(Coord, &MemberSet)>;

    /// Least breakpoint `>= at`
    fn ceil(&self, at: Coord) -> Option<(Coord, &MemberSet)>;

    /// Greatest breakpoint `< at`
    fn predecessor(&self, at: Coord) -> Option<(Coord, &MemberSet)>;

    /// Least breakpoint `> at`
    fn successor(&self, at: Coord) -> Option<(Coord, &MemberSet)>;

    /// Smallest breakpoint
    fn first(&self) -> Option<(Coord, &MemberSet)>;

    /// Largest breakpoint
    fn last(&self) -> Option<(Coord, &MemberSet)>;

    /// Add `member` to an existing breakpoint
    ///
    /// Returns `false` if there is no breakpoint at `at` or the member was
    /// already present.
    fn add_member(&mut self, at: Coord, member: &Arc<str>) -> bool;

    /// Remove `member` from an existing breakpoint
    ///
    /// Returns `false` if there is no breakpoint at `at` or the member was
    /// absent.
    fn remove_member(&mut self, at: Coord, member: &str) -> bool;

    /// Coordinates of the breakpoints within the given bounds, ascending
    fn coords_in(&self, lower: Bound<Coord>, upper: Bound<Coord>) -> Vec<Coord>;

    /// All breakpoints in ascending order
    fn iter(&self) -> Box<dyn Iterator<Item = (Coord, &MemberSet)> + '_>;

    /// Drop every breakpoint
    fn clear(&mut self);
}
