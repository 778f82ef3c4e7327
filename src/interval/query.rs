//! Stabbing queries
//!
//! The store samples a piecewise-constant function at its breakpoints. A probe
//! that hits a breakpoint reads it directly; a probe between two breakpoints
//! is answered from its neighbours according to the policy.

use crate::core::{Coord, MemberSet};
use crate::policy::Policy;
use crate::storage::BreakpointStore;

/// Members covering `at`
///
/// Outside `[first, last]` the index has no information and reports nothing.
pub(crate) fn stab<S: BreakpointStore + ?Sized>(store: &S, policy: Policy, at: Coord) -> MemberSet {
    let Some((floor_at, floor)) = store.floor(at) else {
        return MemberSet::new();
    };
    if floor_at == at {
        return floor.clone();
    }
    match store.ceil(at) {
        Some((_, ceil)) => policy.interior(floor, ceil),
        None => MemberSet::new(),
    }
}
