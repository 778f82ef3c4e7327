//! Range deletion and lazy boundary pruning
//!
//! Removing a range takes the member out of every breakpoint the range covers
//! and then looks at the breakpoints sitting exactly on the two bounds. Each of
//! those is dropped if it has become redundant. Nothing else in the store is
//! re-examined, so the store stays consistent but is not globally minimal.

use tracing::trace;

use crate::core::{Coord, Span};
use crate::policy::Policy;
use crate::storage::BreakpointStore;

/// What a deletion did to the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DeleteOutcome {
    /// Breakpoints that lost the member
    pub shrunk: usize,
    /// Boundary breakpoints pruned afterwards
    pub pruned: usize,
}

/// Drop the breakpoint at `at` if it is redundant, returning `true` if dropped
pub(crate) fn prune<S: BreakpointStore + ?Sized>(store: &mut S, policy: Policy, at: Coord) -> bool {
    let Some(members) = store.get(at) else {
        return false;
    };
    let prev = store.predecessor(at).map(|(_, m)| m);
    let next = store.successor(at).map(|(_, m)| m);
    if !policy.is_redundant(members, prev, next) {
        return false;
    }
    trace!(at = %at, "pruning redundant breakpoint");
    store.delete(at);
    true
}

/// Remove `member` over `span`
///
/// Missing breakpoints inside the span are ignored, so removing a range the
/// member never fully covered is not an error.
pub(crate) fn delete_range<S: BreakpointStore + ?Sized>(
    store: &mut S,
    policy: Policy,
    member: &str,
    span: Span,
    prune_bounds: bool,
) -> DeleteOutcome {
    let mut outcome = DeleteOutcome::default();

    let (lower, upper) = policy.affected(span);
    for at in store.coords_in(lower, upper) {
        if store.remove_member(at, member) {
            outcome.shrunk += 1;
        }
    }

    if !prune_bounds {
        return outcome;
    }

    // min first; the max candidate is judged against the store as it stands
    // after that decision
    if prune(store, policy, span.min) {
        outcome.pruned += 1;
    }
    if !span.is_point() && prune(store, policy, span.max) {
        outcome.pruned += 1;
    }

    outcome
}
